//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`fetch`] - Fetch an elevation raster for a bounding box
//! - [`build`] - Convert a raster into a terrain tileset
//! - [`run`] - Full pipeline: fetch, build, publish
//! - [`clean`] - Remove aged run directories from the workspace

pub mod build;
pub mod clean;
pub mod common;
pub mod fetch;
pub mod run;
