//! Terratile - terrain tileset generation from national elevation coverage
//!
//! This library turns a bounding box into a renderable terrain tileset in
//! three stages: fetch a GeoTIFF elevation raster from a WCS coverage
//! service, convert it into mesh tiles plus a `layer.json` manifest with an
//! external containerized tile-building tool, and publish the resulting
//! tileset directory under a configured base address.
//!
//! # High-Level API
//!
//! The [`pipeline`] module provides the coordinator that wires the stages
//! together:
//!
//! ```ignore
//! use terratile::config::PipelineConfig;
//! use terratile::coord::BoundingBox;
//! use terratile::pipeline::TerrainPipeline;
//!
//! let config = PipelineConfig::default();
//! let pipeline = TerrainPipeline::from_config(&config)?;
//!
//! let bounds: BoundingBox = "272669,7037582,273109,7038148".parse()?;
//! let published = pipeline.run(bounds, 440.0, 566.0).await?;
//! println!("{}", published.tile_set_url);
//! ```

pub mod builder;
pub mod config;
pub mod coord;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod publisher;
pub mod raster;
pub mod telemetry;

/// Version of the Terratile library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
