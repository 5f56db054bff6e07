//! Configuration for the terrain pipeline.
//!
//! Typed configuration structs with builder-style setters, plus INI config
//! file handling in [`file`]. Defaults target the national elevation
//! coverage the pipeline was built for; every value can be overridden via
//! `~/.terratile/config.ini` or programmatically.

mod file;

pub use file::{config_directory, config_file_path, ConfigFileError};

use std::path::PathBuf;

use crate::builder::{DEFAULT_IMAGE, DEFAULT_STAGE_TIMEOUT_SECS};
use crate::publisher::DEFAULT_BASE_URL;

/// Default WCS coverage endpoint.
pub const DEFAULT_WCS_ENDPOINT: &str = "https://wcs.geonorge.no/skwms1/wcs.hoyde-dtm-nhm-25833";

/// Default coverage identifier requested from the endpoint.
pub const DEFAULT_COVERAGE: &str = "nhm_dtm_topo_25833";

/// Coordinate reference system of the source coverage.
pub const DEFAULT_SOURCE_CRS: &str = "EPSG:25833";

/// Coordinate reference system requested for the response raster.
pub const DEFAULT_RESPONSE_CRS: &str = "EPSG:4326";

/// Maximum raster dimension the coverage endpoint accepts.
pub const DEFAULT_MAX_DIMENSION: f64 = 2850.0;

/// Default coverage request timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// WCS coverage endpoint configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct WcsConfig {
    /// Base URL of the GetCoverage endpoint.
    pub endpoint: String,

    /// Coverage identifier to request.
    pub coverage: String,

    /// CRS the bounding box is expressed in.
    pub source_crs: String,

    /// CRS requested for the response raster.
    pub response_crs: String,

    /// Upper bound applied to requested raster width and height.
    pub max_dimension: f64,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for WcsConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_WCS_ENDPOINT.to_string(),
            coverage: DEFAULT_COVERAGE.to_string(),
            source_crs: DEFAULT_SOURCE_CRS.to_string(),
            response_crs: DEFAULT_RESPONSE_CRS.to_string(),
            max_dimension: DEFAULT_MAX_DIMENSION,
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

/// Tile-building tool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Container image holding the tile-building tool.
    pub image: String,

    /// Bound on each sub-stage wait in seconds.
    pub stage_timeout_secs: u64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            stage_timeout_secs: DEFAULT_STAGE_TIMEOUT_SECS,
        }
    }
}

/// Tileset publication configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Base address under which the workspace is served.
    pub base_url: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub wcs: WcsConfig,
    pub builder: BuilderConfig,
    pub publish: PublishConfig,

    /// Root directory for per-run raster and tile artifacts.
    pub workspace_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            wcs: WcsConfig::default(),
            builder: BuilderConfig::default(),
            publish: PublishConfig::default(),
            workspace_dir: std::env::temp_dir().join("terratile"),
        }
    }
}

impl PipelineConfig {
    /// Set the workspace directory.
    pub fn with_workspace_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workspace_dir = dir.into();
        self
    }

    /// Set the published base address.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.publish.base_url = base_url.into();
        self
    }

    /// Set the tile tool container image.
    pub fn with_builder_image(mut self, image: impl Into<String>) -> Self {
        self.builder.image = image.into();
        self
    }

    /// Set the per-sub-stage timeout.
    pub fn with_stage_timeout_secs(mut self, secs: u64) -> Self {
        self.builder.stage_timeout_secs = secs;
        self
    }

    /// Set the coverage request timeout.
    pub fn with_fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.wcs.timeout_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.wcs.endpoint, DEFAULT_WCS_ENDPOINT);
        assert_eq!(config.wcs.max_dimension, 2850.0);
        assert_eq!(config.wcs.timeout_secs, 10);
        assert_eq!(config.builder.image, "cesium-terrain-builder");
        assert_eq!(config.publish.base_url, "http://localhost:8080/tilesets");
        assert!(config.workspace_dir.ends_with("terratile"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = PipelineConfig::default()
            .with_workspace_dir("/var/lib/terratile")
            .with_base_url("https://tiles.example/sets")
            .with_builder_image("ctb:2")
            .with_stage_timeout_secs(120)
            .with_fetch_timeout_secs(5);

        assert_eq!(config.workspace_dir, PathBuf::from("/var/lib/terratile"));
        assert_eq!(config.publish.base_url, "https://tiles.example/sets");
        assert_eq!(config.builder.image, "ctb:2");
        assert_eq!(config.builder.stage_timeout_secs, 120);
        assert_eq!(config.wcs.timeout_secs, 5);
    }
}
