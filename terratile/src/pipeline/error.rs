//! Error types for the pipeline coordinator.
//!
//! Every failure is tagged with the stage that produced it and keeps the
//! stage's diagnostic payload (upstream HTTP body, tool logs) reachable,
//! so callers can surface failures without losing context.

use std::fmt;

use thiserror::Error;

use crate::builder::BuildError;
use crate::provider::ProviderError;
use crate::publisher::PublishError;
use crate::raster::FetchError;

/// The pipeline stage a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Fetching,
    Building,
    Publishing,
}

impl PipelineStage {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Fetching => "fetching",
            PipelineStage::Building => "building",
            PipelineStage::Publishing => "publishing",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur during a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch stage failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("build stage failed: {0}")]
    Build(#[from] BuildError),

    #[error("publish stage failed: {0}")]
    Publish(#[from] PublishError),
}

impl PipelineError {
    /// The stage this failure originated from.
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::Fetch(_) => PipelineStage::Fetching,
            PipelineError::Build(_) => PipelineStage::Building,
            PipelineError::Publish(_) => PipelineStage::Publishing,
        }
    }

    /// Captured upstream diagnostic text, when the failing stage produced
    /// any (coverage response body, tile tool logs).
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            PipelineError::Fetch(FetchError::Provider(ProviderError::UpstreamStatus {
                body,
                ..
            })) => Some(body),
            PipelineError::Build(BuildError::StageFailed { logs, .. }) => Some(logs),
            _ => None,
        }
    }
}
