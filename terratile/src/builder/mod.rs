//! Terrain tile building via an external containerized tool.
//!
//! A build runs the tile-building tool twice against the same raster and
//! output directory: first to generate mesh tiles, then to emit the
//! `layer.json` layer manifest. The second sub-stage depends on the first
//! one's on-disk output, so the two never run in parallel and a mesh
//! failure stops the build before the manifest sub-stage starts.
//!
//! Exit codes are not trusted on their own: after both sub-stages report
//! success the manifest file's physical presence is verified as a separate
//! condition, and its absence is a distinct failure.

mod docker;
mod error;
mod job;
mod runner;

pub use docker::{DockerRunner, DEFAULT_IMAGE, DEFAULT_STAGE_TIMEOUT_SECS};
pub use error::BuildError;
pub use job::{
    BuildStage, TileBuildJob, TilesetManifest, CONTAINER_INPUT_DIR, CONTAINER_OUTPUT_DIR,
    MANIFEST_FILENAME,
};
pub use runner::{Mount, ProcessOutput, RunnerError, ToolInvocation, ToolRunner};

use tracing::{debug, error, info};

/// Runs the two-sub-stage tile build against an injected tool runner.
pub struct TileBuilder<R: ToolRunner> {
    runner: R,
}

impl<R: ToolRunner> TileBuilder<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// The injected tool runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Builds a tileset from the job's input raster.
    ///
    /// # Errors
    ///
    /// - `BuildError::MissingInput` if the raster is absent (the tool is
    ///   never invoked)
    /// - `BuildError::Tool` / `BuildError::StageFailed` for the first
    ///   sub-stage that fails, with captured logs attached
    /// - `BuildError::ManifestNotFound` if both sub-stages succeed but
    ///   `layer.json` is not on disk afterwards
    pub async fn build(&self, job: &TileBuildJob) -> Result<TilesetManifest, BuildError> {
        if !job.input.exists() {
            error!(path = %job.input.display(), "input raster not found");
            return Err(BuildError::MissingInput {
                path: job.input.clone(),
            });
        }

        tokio::fs::create_dir_all(&job.output_dir)
            .await
            .map_err(|source| BuildError::OutputDir {
                path: job.output_dir.clone(),
                source,
            })?;

        for stage in BuildStage::ordered() {
            let invocation = job.invocation(stage);
            info!(stage = stage.name(), input = %job.input.display(), "running tile tool");

            let output = self
                .runner
                .run(&invocation)
                .await
                .map_err(|source| BuildError::Tool { stage, source })?;

            debug!(stage = stage.name(), logs = %output.logs, "tile tool logs");

            if !output.success() {
                error!(
                    stage = stage.name(),
                    exit_code = ?output.exit_code,
                    "tile tool exited with failure"
                );
                return Err(BuildError::StageFailed {
                    stage,
                    exit_code: output.exit_code.unwrap_or(-1),
                    logs: output.logs,
                });
            }
        }

        // Both exit codes signalled success; the manifest must still be
        // physically present before the tileset counts as built.
        let manifest_path = job.manifest_path();
        if !manifest_path.exists() {
            error!(path = %manifest_path.display(), "manifest missing after successful sub-stages");
            return Err(BuildError::ManifestNotFound {
                path: job.output_dir.clone(),
            });
        }

        info!(output_dir = %job.output_dir.display(), "tileset built and verified");
        Ok(TilesetManifest {
            output_dir: job.output_dir.clone(),
            manifest_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Fake runner recording invocations and replaying programmed exits.
    ///
    /// When `write_manifest` is set, a successful layer-manifest sub-stage
    /// writes `layer.json` into the invocation's output mount, mimicking
    /// the real tool.
    struct FakeRunner {
        mesh_exit: Option<i32>,
        layer_exit: Option<i32>,
        write_manifest: bool,
        invocations: Mutex<Vec<ToolInvocation>>,
    }

    impl FakeRunner {
        fn succeeding() -> Self {
            Self {
                mesh_exit: Some(0),
                layer_exit: Some(0),
                write_manifest: true,
                invocations: Mutex::new(Vec::new()),
            }
        }

        fn invocation_count(&self) -> usize {
            self.invocations.lock().unwrap().len()
        }

        fn output_host_dir(invocation: &ToolInvocation) -> PathBuf {
            invocation
                .mounts
                .iter()
                .find(|m| m.container == CONTAINER_OUTPUT_DIR)
                .expect("output mount present")
                .host
                .clone()
        }
    }

    impl ToolRunner for FakeRunner {
        async fn run(&self, invocation: &ToolInvocation) -> Result<ProcessOutput, RunnerError> {
            self.invocations.lock().unwrap().push(invocation.clone());

            let is_layer_stage = invocation.args.iter().any(|a| a == "-l");
            let exit_code = if is_layer_stage {
                self.layer_exit
            } else {
                self.mesh_exit
            };

            if is_layer_stage && exit_code == Some(0) && self.write_manifest {
                let manifest = Self::output_host_dir(invocation).join(MANIFEST_FILENAME);
                std::fs::write(manifest, b"{\"tilejson\":\"2.1.0\"}").unwrap();
            }

            Ok(ProcessOutput {
                exit_code,
                logs: format!("fake tool run (layer={})", is_layer_stage),
            })
        }
    }

    fn job_in(temp: &tempfile::TempDir) -> TileBuildJob {
        let input = temp.path().join("terrain.tif");
        std::fs::write(&input, b"tiff").unwrap();
        TileBuildJob::new(input, temp.path().join("tiles"))
    }

    #[tokio::test]
    async fn test_build_runs_both_stages_in_order() {
        let temp = tempfile::TempDir::new().unwrap();
        let job = job_in(&temp);
        let builder = TileBuilder::new(FakeRunner::succeeding());

        let manifest = builder.build(&job).await.unwrap();

        let invocations = builder.runner.invocations.lock().unwrap();
        assert_eq!(invocations.len(), 2);
        assert!(!invocations[0].args.contains(&"-l".to_string()));
        assert!(invocations[1].args.contains(&"-l".to_string()));
        assert_eq!(manifest.manifest_path, job.manifest_path());
        assert!(manifest.manifest_path.exists());
    }

    #[tokio::test]
    async fn test_missing_input_never_invokes_tool() {
        let temp = tempfile::TempDir::new().unwrap();
        let job = TileBuildJob::new(temp.path().join("absent.tif"), temp.path().join("tiles"));
        let builder = TileBuilder::new(FakeRunner::succeeding());

        let result = builder.build(&job).await;

        assert!(matches!(result, Err(BuildError::MissingInput { .. })));
        assert_eq!(builder.runner.invocation_count(), 0);
    }

    #[tokio::test]
    async fn test_mesh_failure_skips_layer_stage() {
        let temp = tempfile::TempDir::new().unwrap();
        let job = job_in(&temp);
        let builder = TileBuilder::new(FakeRunner {
            mesh_exit: Some(1),
            ..FakeRunner::succeeding()
        });

        let result = builder.build(&job).await;

        match result {
            Err(BuildError::StageFailed {
                stage, exit_code, ..
            }) => {
                assert_eq!(stage, BuildStage::Mesh);
                assert_eq!(exit_code, 1);
            }
            other => panic!("Expected mesh StageFailed, got {:?}", other),
        }
        assert_eq!(builder.runner.invocation_count(), 1);
    }

    #[tokio::test]
    async fn test_layer_failure_is_tagged_layer_manifest() {
        let temp = tempfile::TempDir::new().unwrap();
        let job = job_in(&temp);
        let builder = TileBuilder::new(FakeRunner {
            layer_exit: Some(2),
            ..FakeRunner::succeeding()
        });

        let result = builder.build(&job).await;

        assert!(matches!(
            result,
            Err(BuildError::StageFailed {
                stage: BuildStage::LayerManifest,
                exit_code: 2,
                ..
            })
        ));
        assert_eq!(builder.runner.invocation_count(), 2);
    }

    #[tokio::test]
    async fn test_successful_exits_without_manifest_fail() {
        let temp = tempfile::TempDir::new().unwrap();
        let job = job_in(&temp);
        let builder = TileBuilder::new(FakeRunner {
            write_manifest: false,
            ..FakeRunner::succeeding()
        });

        let result = builder.build(&job).await;

        assert!(matches!(result, Err(BuildError::ManifestNotFound { .. })));
        assert_eq!(builder.runner.invocation_count(), 2);
    }

    #[tokio::test]
    async fn test_signal_termination_is_a_stage_failure() {
        let temp = tempfile::TempDir::new().unwrap();
        let job = job_in(&temp);
        let builder = TileBuilder::new(FakeRunner {
            mesh_exit: None,
            ..FakeRunner::succeeding()
        });

        let result = builder.build(&job).await;

        assert!(matches!(
            result,
            Err(BuildError::StageFailed {
                stage: BuildStage::Mesh,
                exit_code: -1,
                ..
            })
        ));
    }
}
