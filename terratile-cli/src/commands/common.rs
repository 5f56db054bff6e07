//! Shared helpers for CLI commands.

use std::path::Path;

use terratile::config::PipelineConfig;
use terratile::coord::BoundingBox;

use crate::error::CliError;

/// Load pipeline configuration from an explicit path or the default
/// location (~/.terratile/config.ini).
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, CliError> {
    let result = match path {
        Some(p) => PipelineConfig::load_from(p),
        None => PipelineConfig::load(),
    };
    result.map_err(|e| CliError::Config(e.to_string()))
}

/// Parse a bounding box in the wire form `minX,minY,maxX,maxY`.
pub fn parse_bounds(input: &str) -> Result<BoundingBox, CliError> {
    input
        .parse::<BoundingBox>()
        .map_err(|e| CliError::InvalidInput(e.to_string()))
}
