//! Terratile CLI - Command-line interface
//!
//! This binary drives the terrain pipeline library: fetch an elevation
//! raster, build a tileset from it, run the full pipeline, or clean up
//! accumulated run directories.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{build, clean, fetch, run};
use error::CliError;

#[derive(Parser)]
#[command(name = "terratile")]
#[command(about = "Generate renderable terrain tilesets from national elevation coverage", long_about = None)]
#[command(version = terratile::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an elevation raster for a bounding box
    Fetch {
        /// Bounding box as minX,minY,maxX,maxY
        #[arg(long)]
        bbox: String,

        /// Requested raster width in pixels (clamped to the service maximum)
        #[arg(long)]
        width: f64,

        /// Requested raster height in pixels (clamped to the service maximum)
        #[arg(long)]
        height: f64,

        /// Output file path (defaults to a fresh run directory in the workspace)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Path to an alternative config.ini
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Convert a fetched raster into a terrain tileset
    Build {
        /// Path to the input GeoTIFF raster
        #[arg(long)]
        input: PathBuf,

        /// Tile output directory (defaults to "tiles" next to the input)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Path to an alternative config.ini
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run the full pipeline and print the published tileset address
    Run {
        /// Bounding box as minX,minY,maxX,maxY
        #[arg(long)]
        bbox: String,

        /// Requested raster width in pixels (clamped to the service maximum)
        #[arg(long)]
        width: f64,

        /// Requested raster height in pixels (clamped to the service maximum)
        #[arg(long)]
        height: f64,

        /// Path to an alternative config.ini
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Remove aged run directories from the workspace
    Clean {
        /// Remove every run directory
        #[arg(long, conflicts_with = "older_than_days")]
        all: bool,

        /// Remove run directories older than this many days
        #[arg(long)]
        older_than_days: Option<u64>,

        /// Path to an alternative config.ini
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let _logging_guard = match terratile::logging::init_logging(
        terratile::logging::default_log_dir(),
        terratile::logging::default_log_file(),
    ) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    tracing::info!(version = terratile::VERSION, "terratile starting");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => CliError::Config(format!("failed to create runtime: {}", e)).exit(),
    };

    let result = match cli.command {
        Commands::Fetch {
            bbox,
            width,
            height,
            output,
            config,
        } => runtime.block_on(fetch::run(fetch::FetchArgs {
            bbox,
            width,
            height,
            output,
            config,
        })),
        Commands::Build {
            input,
            output,
            config,
        } => runtime.block_on(build::run(build::BuildArgs {
            input,
            output,
            config,
        })),
        Commands::Run {
            bbox,
            width,
            height,
            config,
        } => runtime.block_on(run::run(run::RunArgs {
            bbox,
            width,
            height,
            config,
        })),
        Commands::Clean {
            all,
            older_than_days,
            config,
        } => clean::run(clean::CleanArgs {
            all,
            older_than_days,
            config,
        }),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from([
            "terratile",
            "run",
            "--bbox",
            "272669,7037582,273109,7038148",
            "--width",
            "440",
            "--height",
            "566",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                bbox,
                width,
                height,
                config,
            } => {
                assert_eq!(bbox, "272669,7037582,273109,7038148");
                assert_eq!(width, 440.0);
                assert_eq!(height, 566.0);
                assert!(config.is_none());
            }
            _ => panic!("Expected run subcommand"),
        }
    }

    #[test]
    fn test_parse_clean_rejects_conflicting_flags() {
        let result = Cli::try_parse_from([
            "terratile",
            "clean",
            "--all",
            "--older-than-days",
            "7",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_fetch_requires_dimensions() {
        let result = Cli::try_parse_from(["terratile", "fetch", "--bbox", "1,2,3,4"]);
        assert!(result.is_err());
    }
}
