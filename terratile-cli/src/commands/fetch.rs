//! Fetch command - download an elevation raster for a bounding box.

use std::path::PathBuf;
use std::time::Duration;

use terratile::pipeline::RunWorkspace;
use terratile::provider::{ReqwestClient, WcsCoverageProvider};
use terratile::raster::{RasterFetcher, RasterRequest};

use super::common::{load_config, parse_bounds};
use crate::error::CliError;

/// Arguments for the fetch command.
pub struct FetchArgs {
    pub bbox: String,
    pub width: f64,
    pub height: f64,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Run the fetch command.
pub async fn run(args: FetchArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let bounds = parse_bounds(&args.bbox)?;
    let request = RasterRequest::new(bounds, args.width, args.height);

    // Explicit output path wins; otherwise allocate a run directory the
    // same way the full pipeline would.
    let dest = match args.output {
        Some(path) => path,
        None => {
            let workspace = RunWorkspace::new(&config.workspace_dir);
            workspace.allocate(&request).raster_path
        }
    };

    println!("Fetching coverage raster for:");
    println!("  Bounding box: {}", bounds);
    println!("  Dimensions:   {} x {}", args.width, args.height);
    println!();

    let client = ReqwestClient::with_timeout(Duration::from_secs(config.wcs.timeout_secs))
        .map_err(|e| CliError::Config(e.to_string()))?;
    let fetcher = RasterFetcher::new(WcsCoverageProvider::new(client, config.wcs));

    let start = std::time::Instant::now();
    let asset = fetcher.fetch(request, &dest).await?;
    let elapsed = start.elapsed();

    println!("Fetched successfully in {:.2}s", elapsed.as_secs_f64());
    println!("Raster written to {}", asset.path.display());

    Ok(())
}
