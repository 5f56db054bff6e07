//! Elevation coverage provider abstraction
//!
//! This module provides the HTTP client seam and the WCS GetCoverage
//! provider used to download georeferenced elevation rasters.
//!
//! # Testability
//!
//! The [`HttpClient`] trait allows a mock client to be injected in tests,
//! so request construction and failure mapping can be verified without a
//! live coverage service:
//!
//! ```ignore
//! use terratile::config::WcsConfig;
//! use terratile::provider::{ReqwestClient, WcsCoverageProvider};
//!
//! let client = ReqwestClient::new()?;
//! let provider = WcsCoverageProvider::new(client, WcsConfig::default());
//! let bytes = provider.get_coverage(&request).await?;
//! ```

mod http;
mod types;
mod wcs;

pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use types::ProviderError;
pub use wcs::WcsCoverageProvider;

#[cfg(test)]
pub use http::tests::MockHttpClient;
