//! Raster acquisition and persistence.
//!
//! Fetches a georeferenced GeoTIFF coverage for a bounding box and writes
//! it to a destination path for downstream tile building. The raster file
//! belongs to the pipeline run that fetched it; nothing here guarantees it
//! survives beyond that run.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::coord::BoundingBox;
use crate::provider::{HttpClient, ProviderError, WcsCoverageProvider};

/// A request for a coverage raster.
///
/// Carries the raw requested dimensions; clamping to the service maximum
/// happens when the outgoing request is built, so failures can still
/// report what the caller asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterRequest {
    pub bounds: BoundingBox,
    pub width: f64,
    pub height: f64,
}

impl RasterRequest {
    pub fn new(bounds: BoundingBox, width: f64, height: f64) -> Self {
        Self {
            bounds,
            width,
            height,
        }
    }
}

/// A fetched raster persisted on disk, together with the request that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterAsset {
    pub path: PathBuf,
    pub request: RasterRequest,
    /// Size of the persisted raster in bytes.
    pub bytes: u64,
}

/// Errors that can occur while fetching and persisting a raster.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The coverage service request failed.
    #[error("coverage request failed: {0}")]
    Provider(#[from] ProviderError),

    /// The destination directory could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    /// The raster body could not be written to disk.
    #[error("failed to write raster to {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Fetches coverage rasters and persists them for tile building.
pub struct RasterFetcher<C: HttpClient> {
    provider: WcsCoverageProvider<C>,
}

impl<C: HttpClient> RasterFetcher<C> {
    /// Creates a new fetcher on top of a coverage provider.
    pub fn new(provider: WcsCoverageProvider<C>) -> Self {
        Self { provider }
    }

    /// The underlying coverage provider.
    pub fn provider(&self) -> &WcsCoverageProvider<C> {
        &self.provider
    }

    /// Fetches the raster for `request` and writes it to `dest`.
    ///
    /// Any prior file at `dest` is overwritten. On success the returned
    /// asset references `dest`; on any failure no asset exists and the
    /// caller must not proceed to tile building.
    pub async fn fetch(
        &self,
        request: RasterRequest,
        dest: &Path,
    ) -> Result<RasterAsset, FetchError> {
        let body = self.provider.get_coverage(&request).await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| FetchError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(dest, &body)
            .await
            .map_err(|source| FetchError::Write {
                path: dest.to_path_buf(),
                source,
            })?;

        info!(
            path = %dest.display(),
            bytes = body.len(),
            bbox = %request.bounds,
            "coverage raster persisted"
        );

        Ok(RasterAsset {
            path: dest.to_path_buf(),
            request,
            bytes: body.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WcsConfig;
    use crate::provider::MockHttpClient;

    fn sample_request() -> RasterRequest {
        let bounds = BoundingBox::new(272669.0, 7037582.0, 273109.0, 7038148.0).unwrap();
        RasterRequest::new(bounds, 440.0, 566.0)
    }

    fn fetcher_with(mock: MockHttpClient) -> RasterFetcher<MockHttpClient> {
        RasterFetcher::new(WcsCoverageProvider::new(mock, WcsConfig::default()))
    }

    #[tokio::test]
    async fn test_fetch_writes_body_to_dest() {
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("run-1").join("terrain.tif");

        let fetcher = fetcher_with(MockHttpClient::ok(200, b"tiff-body"));
        let asset = fetcher.fetch(sample_request(), &dest).await.unwrap();

        assert_eq!(asset.path, dest);
        assert_eq!(asset.bytes, 9);
        assert_eq!(std::fs::read(&dest).unwrap(), b"tiff-body");
    }

    #[tokio::test]
    async fn test_fetch_overwrites_existing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("terrain.tif");
        std::fs::write(&dest, b"stale").unwrap();

        let fetcher = fetcher_with(MockHttpClient::ok(200, b"fresh"));
        fetcher.fetch(sample_request(), &dest).await.unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn test_fetch_upstream_failure_writes_nothing() {
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("terrain.tif");

        let fetcher = fetcher_with(MockHttpClient::ok(500, b"boom"));
        let result = fetcher.fetch(sample_request(), &dest).await;

        assert!(matches!(
            result,
            Err(FetchError::Provider(ProviderError::UpstreamStatus {
                status: 500,
                ..
            }))
        ));
        assert!(!dest.exists());
    }
}
