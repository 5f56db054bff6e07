//! Error types for the tile build.
//!
//! Errors distinguish the failing sub-stage and keep the tool's captured
//! log output attached, so a build failure can be surfaced to callers with
//! its full diagnostic payload.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::job::BuildStage;
use super::runner::RunnerError;

/// Errors that can occur while building a tileset from a raster.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The input raster was absent; the external tool is never invoked.
    #[error("input raster not found at {}", .path.display())]
    MissingInput { path: PathBuf },

    /// The output directory could not be created.
    #[error("failed to create output directory {}: {source}", .path.display())]
    OutputDir { path: PathBuf, source: io::Error },

    /// The external tool could not be run to completion for a sub-stage
    /// (spawn failure or bounded-wait expiry).
    #[error("{stage} error: {source}")]
    Tool { stage: BuildStage, source: RunnerError },

    /// A sub-stage ran to completion but exited with a non-success status.
    /// Terminates the build; a later sub-stage is never attempted.
    #[error("{stage} error (exit code {exit_code})")]
    StageFailed {
        stage: BuildStage,
        exit_code: i32,
        logs: String,
    },

    /// Both sub-stages reported success but the manifest file is absent
    /// from the output directory.
    #[error("tileset generation failed: layer.json not found in {}", .path.display())]
    ManifestNotFound { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_failed_display_names_the_stage() {
        let err = BuildError::StageFailed {
            stage: BuildStage::Mesh,
            exit_code: 1,
            logs: "gdal: unsupported band".to_string(),
        };
        assert_eq!(err.to_string(), "terrain tile generation error (exit code 1)");

        let err = BuildError::StageFailed {
            stage: BuildStage::LayerManifest,
            exit_code: 137,
            logs: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "layer manifest generation error (exit code 137)"
        );
    }

    #[test]
    fn test_timeout_is_tagged_with_its_stage() {
        let err = BuildError::Tool {
            stage: BuildStage::Mesh,
            source: RunnerError::Timeout { timeout_secs: 600 },
        };
        let text = err.to_string();
        assert!(text.starts_with("terrain tile generation error"));
        assert!(text.contains("timeout"));
    }

    #[test]
    fn test_manifest_not_found_display() {
        let err = BuildError::ManifestNotFound {
            path: PathBuf::from("/runs/abc/tiles"),
        };
        assert_eq!(
            err.to_string(),
            "tileset generation failed: layer.json not found in /runs/abc/tiles"
        );
    }
}
