//! Run command - full pipeline: fetch, build, publish.

use std::path::PathBuf;

use terratile::pipeline::TerrainPipeline;

use super::common::{load_config, parse_bounds};
use crate::error::CliError;

/// Arguments for the run command.
pub struct RunArgs {
    pub bbox: String,
    pub width: f64,
    pub height: f64,
    pub config: Option<PathBuf>,
}

/// Run the full pipeline and print the published payload.
pub async fn run(args: RunArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let bounds = parse_bounds(&args.bbox)?;

    println!("Running terrain pipeline:");
    println!("  Bounding box: {}", bounds);
    println!("  Dimensions:   {} x {}", args.width, args.height);
    println!("  Workspace:    {}", config.workspace_dir.display());
    println!();

    let pipeline =
        TerrainPipeline::from_config(&config).map_err(|e| CliError::Config(e.to_string()))?;

    let start = std::time::Instant::now();
    let published = pipeline.run(bounds, args.width, args.height).await?;
    let elapsed = start.elapsed();

    println!("Pipeline completed in {:.2}s", elapsed.as_secs_f64());
    println!();

    // The payload the viewer consumes, on its own line for piping.
    match serde_json::to_string(&published) {
        Ok(json) => println!("{}", json),
        Err(_) => println!("{}", published.tile_set_url),
    }

    Ok(())
}
