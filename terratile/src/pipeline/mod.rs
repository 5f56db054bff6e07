//! Pipeline coordination: fetch, build, publish.
//!
//! A run moves through `Fetching -> Building -> Publishing -> Done`; any
//! stage failure transitions directly to a terminal failure tagged with
//! that stage. There are no retries and no rollback: artifacts of a failed
//! run are left in place for diagnostics.
//!
//! Each run works in its own directory under the workspace root (see
//! [`RunWorkspace`]), so concurrent runs do not share raster or tile
//! paths. If the caller drops the run future mid-build, any in-flight tool
//! container is killed with it.

mod error;
mod workspace;

pub use error::{PipelineError, PipelineStage};
pub use workspace::{RunPaths, RunWorkspace, RASTER_FILENAME, TILES_DIRNAME};

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::builder::{DockerRunner, TileBuildJob, TileBuilder, ToolRunner};
use crate::config::PipelineConfig;
use crate::coord::BoundingBox;
use crate::provider::{HttpClient, ProviderError, ReqwestClient, WcsCoverageProvider};
use crate::publisher::{PublishedTileset, TilesetPublisher};
use crate::raster::{RasterFetcher, RasterRequest};
use crate::telemetry::PipelineMetrics;

/// Coordinates the fetch, build, and publish stages of one terrain run.
pub struct TerrainPipeline<C: HttpClient, R: ToolRunner> {
    fetcher: RasterFetcher<C>,
    builder: TileBuilder<R>,
    publisher: TilesetPublisher,
    workspace: RunWorkspace,
    metrics: Arc<PipelineMetrics>,
}

impl TerrainPipeline<ReqwestClient, DockerRunner> {
    /// Builds a pipeline with the real HTTP client and Docker runner from
    /// configuration.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ProviderError> {
        let client = ReqwestClient::with_timeout(Duration::from_secs(config.wcs.timeout_secs))?;
        let provider = WcsCoverageProvider::new(client, config.wcs.clone());
        let runner = DockerRunner::new(
            config.builder.image.clone(),
            Duration::from_secs(config.builder.stage_timeout_secs),
        );

        Ok(Self::new(
            RasterFetcher::new(provider),
            TileBuilder::new(runner),
            TilesetPublisher::new(config.publish.base_url.clone(), &config.workspace_dir),
            RunWorkspace::new(&config.workspace_dir),
        ))
    }
}

impl<C: HttpClient, R: ToolRunner> TerrainPipeline<C, R> {
    pub fn new(
        fetcher: RasterFetcher<C>,
        builder: TileBuilder<R>,
        publisher: TilesetPublisher,
        workspace: RunWorkspace,
    ) -> Self {
        Self {
            fetcher,
            builder,
            publisher,
            workspace,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Shares the pipeline's metrics for display elsewhere.
    pub fn metrics(&self) -> Arc<PipelineMetrics> {
        Arc::clone(&self.metrics)
    }

    /// The workspace runs are allocated under.
    pub fn workspace(&self) -> &RunWorkspace {
        &self.workspace
    }

    /// The HTTP client behind the fetch stage.
    pub fn http_client(&self) -> &C {
        self.fetcher.provider().http_client()
    }

    /// The tool runner behind the build stage.
    pub fn tool_runner(&self) -> &R {
        self.builder.runner()
    }

    /// Runs the full pipeline for one request.
    ///
    /// Transitions to the build stage only on fetch success and to the
    /// publish stage only once the tileset is verified; every failure is
    /// returned tagged with its stage and with the stage's diagnostics
    /// attached.
    pub async fn run(
        &self,
        bounds: BoundingBox,
        width: f64,
        height: f64,
    ) -> Result<PublishedTileset, PipelineError> {
        let request = RasterRequest::new(bounds, width, height);
        let paths = self.workspace.allocate(&request);
        self.metrics.run_started();
        info!(run_id = %paths.run_id, bbox = %request.bounds, width, height, "pipeline run started");

        info!(run_id = %paths.run_id, stage = PipelineStage::Fetching.name(), "entering stage");
        let asset = match self.fetcher.fetch(request, &paths.raster_path).await {
            Ok(asset) => {
                self.metrics.raster_fetched(asset.bytes);
                asset
            }
            Err(e) => {
                self.metrics.fetch_failed();
                return Err(self.fail(&paths.run_id, e.into()));
            }
        };

        info!(run_id = %paths.run_id, stage = PipelineStage::Building.name(), "entering stage");
        let job = TileBuildJob::new(asset.path, paths.output_dir.clone());
        let manifest = match self.builder.build(&job).await {
            Ok(manifest) => manifest,
            Err(e) => {
                self.metrics.build_failed();
                return Err(self.fail(&paths.run_id, e.into()));
            }
        };

        info!(run_id = %paths.run_id, stage = PipelineStage::Publishing.name(), "entering stage");
        let published = match self.publisher.publish(&manifest) {
            Ok(published) => published,
            Err(e) => {
                self.metrics.publish_failed();
                return Err(self.fail(&paths.run_id, e.into()));
            }
        };

        self.metrics.run_completed();
        info!(run_id = %paths.run_id, url = %published.tile_set_url, "pipeline run complete");
        Ok(published)
    }

    /// Logs a stage failure with its diagnostics and passes it through.
    fn fail(&self, run_id: &str, e: PipelineError) -> PipelineError {
        error!(
            run_id,
            stage = e.stage().name(),
            diagnostics = e.diagnostics().unwrap_or(""),
            "pipeline run failed: {}",
            e
        );
        e
    }
}
