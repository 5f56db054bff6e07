//! Build command - convert a fetched raster into a terrain tileset.

use std::path::PathBuf;
use std::time::Duration;

use terratile::builder::{DockerRunner, TileBuildJob, TileBuilder};
use terratile::publisher::TilesetPublisher;

use super::common::load_config;
use crate::error::CliError;

/// Arguments for the build command.
pub struct BuildArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Run the build command.
pub async fn run(args: BuildArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;

    // Default the output next to the input raster, mirroring the run
    // directory layout.
    let output_dir = match args.output {
        Some(path) => path,
        None => args
            .input
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("tiles"),
    };

    println!("Building tileset:");
    println!("  Input:  {}", args.input.display());
    println!("  Output: {}", output_dir.display());
    println!("  Image:  {}", config.builder.image);
    println!();

    let runner = DockerRunner::new(
        config.builder.image,
        Duration::from_secs(config.builder.stage_timeout_secs),
    );
    let builder = TileBuilder::new(runner);
    let job = TileBuildJob::new(args.input, output_dir);

    let start = std::time::Instant::now();
    let manifest = builder.build(&job).await?;
    let elapsed = start.elapsed();

    println!("Tileset built in {:.2}s", elapsed.as_secs_f64());
    println!("Manifest at {}", manifest.manifest_path.display());

    // When the tileset landed inside the served workspace, print the
    // address it is reachable under; a standalone output directory has no
    // public address.
    let publisher = TilesetPublisher::new(config.publish.base_url, &config.workspace_dir);
    if let Ok(published) = publisher.publish(&manifest) {
        match serde_json::to_string(&published) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("{}", published.tile_set_url),
        }
    }

    Ok(())
}
