//! Pipeline telemetry for observability and user feedback.
//!
//! Lock-free atomic counters recorded by the pipeline coordinator, with a
//! point-in-time snapshot type for display:
//!
//! ```text
//! Pipeline Stages ----> PipelineMetrics ----> TelemetrySnapshot ----> Views
//!                       (atomic counters)     (point-in-time copy)    (CLI, etc.)
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters recorded across pipeline runs.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    runs_started: AtomicU64,
    runs_completed: AtomicU64,
    fetch_failures: AtomicU64,
    build_failures: AtomicU64,
    publish_failures: AtomicU64,
    bytes_fetched: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_started(&self) {
        self.runs_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a successfully fetched raster of the given size.
    pub fn raster_fetched(&self, bytes: u64) {
        self.bytes_fetched.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn run_completed(&self) {
        self.runs_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetch_failed(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn build_failed(&self) {
        self.build_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn publish_failed(&self) {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a point-in-time copy of all counters.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            runs_started: self.runs_started.load(Ordering::Relaxed),
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            build_failures: self.build_failures.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            bytes_fetched: self.bytes_fetched.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of the pipeline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub runs_started: u64,
    pub runs_completed: u64,
    pub fetch_failures: u64,
    pub build_failures: u64,
    pub publish_failures: u64,
    pub bytes_fetched: u64,
}

impl TelemetrySnapshot {
    /// Total failed runs across all stages.
    pub fn runs_failed(&self) -> u64 {
        self.fetch_failures + self.build_failures + self.publish_failures
    }
}
