//! Docker-backed tool runner.
//!
//! Runs the tile-building tool as a one-shot container via the `docker`
//! CLI, with the invocation's mounts bound read-write. The wait is bounded:
//! on expiry the container process is killed and the invocation fails with
//! a timeout instead of hanging the pipeline.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use super::runner::{ProcessOutput, RunnerError, ToolInvocation, ToolRunner};

/// Container image holding the tile-building tool.
pub const DEFAULT_IMAGE: &str = "cesium-terrain-builder";

/// Default bound on each sub-stage wait, in seconds.
pub const DEFAULT_STAGE_TIMEOUT_SECS: u64 = 600;

/// Tool runner that shells out to `docker run`.
pub struct DockerRunner {
    image: String,
    timeout: Duration,
}

impl DockerRunner {
    pub fn new(image: impl Into<String>, timeout: Duration) -> Self {
        Self {
            image: image.into(),
            timeout,
        }
    }

    /// Builds the `docker run` command for an invocation.
    ///
    /// `kill_on_drop` makes the bounded wait effective: when the timeout
    /// fires the output future is dropped and the container process is
    /// killed with it.
    fn command(&self, invocation: &ToolInvocation) -> Command {
        let mut cmd = Command::new("docker");
        cmd.arg("run").arg("--rm");
        for mount in &invocation.mounts {
            cmd.arg("-v");
            cmd.arg(format!("{}:{}:rw", mount.host.display(), mount.container));
        }
        cmd.arg(&self.image);
        cmd.args(&invocation.args);
        cmd.stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for DockerRunner {
    fn default() -> Self {
        Self::new(
            DEFAULT_IMAGE,
            Duration::from_secs(DEFAULT_STAGE_TIMEOUT_SECS),
        )
    }
}

impl ToolRunner for DockerRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ProcessOutput, RunnerError> {
        let mut cmd = self.command(invocation);
        debug!(image = %self.image, args = ?invocation.args, "spawning tile tool container");

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|source| RunnerError::Spawn {
                program: "docker".to_string(),
                source,
            })?,
            Err(_) => {
                return Err(RunnerError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                })
            }
        };

        let mut logs = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !logs.is_empty() {
                logs.push('\n');
            }
            logs.push_str(&stderr);
        }

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            logs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BuildStage, TileBuildJob};

    fn command_args(runner: &DockerRunner, invocation: &ToolInvocation) -> Vec<String> {
        let cmd = runner.command(invocation);
        cmd.as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_command_layout() {
        let runner = DockerRunner::default();
        let job = TileBuildJob::new("/runs/abc/terrain.tif", "/runs/abc/tiles");
        let args = command_args(&runner, &job.invocation(BuildStage::Mesh));

        assert_eq!(
            args,
            vec![
                "run",
                "--rm",
                "-v",
                "/runs/abc:/data/input:rw",
                "-v",
                "/runs/abc/tiles:/data/output:rw",
                "cesium-terrain-builder",
                "ctb-tile",
                "-f",
                "Mesh",
                "-C",
                "-N",
                "-o",
                "/data/output",
                "/data/input/terrain.tif"
            ]
        );
    }

    #[test]
    fn test_custom_image_is_used() {
        let runner = DockerRunner::new("ctb:latest", Duration::from_secs(30));
        let job = TileBuildJob::new("/in/a.tif", "/out");
        let args = command_args(&runner, &job.invocation(BuildStage::LayerManifest));

        assert!(args.contains(&"ctb:latest".to_string()));
        assert!(args.contains(&"-l".to_string()));
    }
}
