//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use terratile::builder::BuildError;
use terratile::pipeline::PipelineError;
use terratile::raster::FetchError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Invalid command-line input (bounding box, dimensions)
    InvalidInput(String),
    /// Failed to fetch the coverage raster
    Fetch(FetchError),
    /// Failed to build the tileset
    Build(BuildError),
    /// Full pipeline run failed
    Pipeline(PipelineError),
    /// Filesystem operation failed
    Io { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Build(BuildError::Tool { .. })
            | CliError::Pipeline(PipelineError::Build(BuildError::Tool { .. })) => {
                eprintln!();
                eprintln!("The tile-building container could not be run. Make sure:");
                eprintln!("  1. Docker is installed and the daemon is running");
                eprintln!("  2. The tool image is available: docker pull cesium-terrain-builder");
                eprintln!("  3. The workspace directory is mountable by Docker");
            }
            CliError::Fetch(_) | CliError::Pipeline(PipelineError::Fetch(_)) => {
                eprintln!();
                eprintln!("The coverage service request failed. Make sure:");
                eprintln!("  1. The endpoint in config.ini is reachable from this host");
                eprintln!("  2. The bounding box lies inside the coverage area");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Fetch(e) => write!(f, "Failed to fetch coverage raster: {}", e),
            CliError::Build(e) => write!(f, "Failed to build tileset: {}", e),
            CliError::Pipeline(e) => write!(f, "Pipeline run failed: {}", e),
            CliError::Io { path, error } => {
                write!(f, "Filesystem error at '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Fetch(e) => Some(e),
            CliError::Build(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            CliError::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}

impl From<BuildError> for CliError {
    fn from(e: BuildError) -> Self {
        CliError::Build(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}
