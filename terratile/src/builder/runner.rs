//! External tool invocation abstraction.
//!
//! Wraps process spawn/wait/exit-code/log-capture behind a small trait so
//! the two-sub-stage build sequencing and its failure propagation can be
//! unit tested with an injected fake instead of a container runtime.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A read-write bind mount from a host path to a container path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub host: PathBuf,
    pub container: String,
}

impl Mount {
    pub fn read_write(host: impl AsRef<Path>, container: impl Into<String>) -> Self {
        Self {
            host: host.as_ref().to_path_buf(),
            container: container.into(),
        }
    }
}

/// One tool invocation: the command line to run inside the container and
/// the mounts it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub args: Vec<String>,
    pub mounts: Vec<Mount>,
}

/// Outcome of a tool invocation that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr text.
    pub logs: String,
}

impl ProcessOutput {
    /// Whether the tool signalled success.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Errors that prevent an invocation from producing a `ProcessOutput`.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The runner process could not be spawned at all.
    #[error("failed to run {program}: {source}")]
    Spawn { program: String, source: io::Error },

    /// The tool did not finish within the configured bound and was
    /// terminated.
    #[error("timeout: tool did not finish within {timeout_secs}s and was terminated")]
    Timeout { timeout_secs: u64 },
}

/// Trait for running one external tool invocation to completion.
#[allow(async_fn_in_trait)]
pub trait ToolRunner: Send + Sync {
    /// Runs the invocation, waits for it to terminate, and captures its
    /// exit status and combined log output.
    async fn run(&self, invocation: &ToolInvocation) -> Result<ProcessOutput, RunnerError>;
}
