//! WCS GetCoverage provider for the national elevation model.
//!
//! Downloads a georeferenced GeoTIFF raster for a bounding box from a
//! Web Coverage Service endpoint.
//!
//! # URL Pattern
//!
//! `{endpoint}?SERVICE=WCS&VERSION=1.0.0&REQUEST=GetCoverage&FORMAT=GeoTIFF`
//! `&COVERAGE={coverage}&BBOX={minX,minY,maxX,maxY}&CRS={source}`
//! `&RESPONSE_CRS={response}&WIDTH={w}&HEIGHT={h}`
//!
//! WIDTH and HEIGHT are each clamped to the endpoint's configured maximum
//! before the request leaves this module. The upstream service rejects
//! oversized rasters, so the clamp is a hard invariant of every outgoing
//! request, not a suggestion.

use tracing::debug;

use crate::config::WcsConfig;
use crate::raster::RasterRequest;

use super::http::HttpClient;
use super::types::ProviderError;

/// Protocol identifier sent with every request.
const WCS_SERVICE: &str = "WCS";

/// Protocol version the coverage endpoint speaks.
const WCS_VERSION: &str = "1.0.0";

/// Operation name for raster retrieval.
const WCS_REQUEST: &str = "GetCoverage";

/// Raster format requested from the service.
const COVERAGE_FORMAT: &str = "GeoTIFF";

/// WCS elevation coverage provider.
///
/// Generic over the HTTP client so tests can inject a mock and verify the
/// outgoing request without a live service.
pub struct WcsCoverageProvider<C: HttpClient> {
    http_client: C,
    config: WcsConfig,
}

impl<C: HttpClient> WcsCoverageProvider<C> {
    /// Creates a new coverage provider.
    pub fn new(http_client: C, config: WcsConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// The endpoint configuration this provider was built with.
    pub fn config(&self) -> &WcsConfig {
        &self.config
    }

    /// The underlying HTTP client.
    pub fn http_client(&self) -> &C {
        &self.http_client
    }

    /// Builds the GetCoverage URL for the given request.
    ///
    /// Width and height are clamped independently to the configured
    /// maximum dimension.
    pub fn build_coverage_url(&self, request: &RasterRequest) -> String {
        let width = clamp_dimension(request.width, self.config.max_dimension);
        let height = clamp_dimension(request.height, self.config.max_dimension);

        format!(
            "{}?SERVICE={}&VERSION={}&REQUEST={}&FORMAT={}&COVERAGE={}&BBOX={}&CRS={}&RESPONSE_CRS={}&WIDTH={}&HEIGHT={}",
            self.config.endpoint,
            WCS_SERVICE,
            WCS_VERSION,
            WCS_REQUEST,
            COVERAGE_FORMAT,
            self.config.coverage,
            request.bounds,
            self.config.source_crs,
            self.config.response_crs,
            width,
            height,
        )
    }

    /// Downloads the coverage raster for the given request.
    ///
    /// # Errors
    ///
    /// - `ProviderError::InvalidDimension` if width or height is not a
    ///   positive finite number
    /// - `ProviderError::UpstreamStatus` if the service answers with a
    ///   non-success status (the upstream body text is preserved)
    /// - `ProviderError::HttpError` on network failure or timeout
    pub async fn get_coverage(&self, request: &RasterRequest) -> Result<Vec<u8>, ProviderError> {
        for (name, value) in [("width", request.width), ("height", request.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProviderError::InvalidDimension { name, value });
            }
        }

        let url = self.build_coverage_url(request);
        debug!(url = %url, "requesting coverage raster");

        let response = self.http_client.get(&url).await?;
        if !response.is_success() {
            return Err(ProviderError::UpstreamStatus {
                status: response.status,
                body: response.body_text(),
            });
        }

        Ok(response.body)
    }
}

/// Clamps a requested raster dimension to the service maximum.
fn clamp_dimension(requested: f64, max: f64) -> f64 {
    requested.min(max)
}
