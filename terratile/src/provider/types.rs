//! Provider types and errors

use std::fmt;

/// Errors that can occur while requesting a coverage raster.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The request could not be issued or the transport failed.
    HttpError(String),
    /// The coverage service answered with a non-success status.
    ///
    /// Carries the upstream status code and response body text so the
    /// failure can be surfaced to callers verbatim.
    UpstreamStatus { status: u16, body: String },
    /// A requested raster dimension was zero, negative, or not finite.
    InvalidDimension { name: &'static str, value: f64 },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::UpstreamStatus { status, body } => {
                write!(
                    f,
                    "coverage service returned status {}: {}",
                    status,
                    body.trim()
                )
            }
            ProviderError::InvalidDimension { name, value } => {
                write!(f, "invalid raster {}: {}", name, value)
            }
        }
    }
}

impl std::error::Error for ProviderError {}
