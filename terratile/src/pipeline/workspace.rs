//! Per-run filesystem workspace.
//!
//! Each pipeline run gets its own raster path and tile output directory so
//! concurrent runs cannot overwrite each other's intermediates. Run ids
//! carry a digest prefix of the request (useful when correlating run
//! directories with what was asked for) plus a process-wide sequence
//! number that makes them unique.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};

use crate::raster::RasterRequest;

/// File name of the fetched raster inside a run directory.
pub const RASTER_FILENAME: &str = "terrain.tif";

/// Name of the tile output directory inside a run directory.
pub const TILES_DIRNAME: &str = "tiles";

/// Process-wide run counter; makes concurrent ids distinct.
static RUN_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Root directory under which run directories are allocated.
#[derive(Debug, Clone)]
pub struct RunWorkspace {
    root: PathBuf,
}

impl RunWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allocates the paths for one pipeline run.
    ///
    /// Nothing is created on disk here; the fetch and build stages create
    /// what they need.
    pub fn allocate(&self, request: &RasterRequest) -> RunPaths {
        let run_id = run_id(request);
        let run_dir = self.root.join(&run_id);
        RunPaths {
            raster_path: run_dir.join(RASTER_FILENAME),
            output_dir: run_dir.join(TILES_DIRNAME),
            run_id,
        }
    }
}

/// The unique paths of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub run_id: String,
    pub raster_path: PathBuf,
    pub output_dir: PathBuf,
}

/// Derives a unique run id: request digest prefix plus sequence number.
fn run_id(request: &RasterRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request.bounds.to_string().as_bytes());
    hasher.update(request.width.to_be_bytes());
    hasher.update(request.height.to_be_bytes());
    let digest = hasher.finalize();

    let prefix: String = digest[..4].iter().map(|b| format!("{:02x}", b)).collect();
    let seq = RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", prefix, seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::BoundingBox;

    fn request(width: f64) -> RasterRequest {
        let bounds = BoundingBox::new(272669.0, 7037582.0, 273109.0, 7038148.0).unwrap();
        RasterRequest::new(bounds, width, 566.0)
    }

    #[test]
    fn test_allocate_layout() {
        let workspace = RunWorkspace::new("/var/lib/terratile");
        let paths = workspace.allocate(&request(440.0));

        let run_dir = PathBuf::from("/var/lib/terratile").join(&paths.run_id);
        assert_eq!(paths.raster_path, run_dir.join("terrain.tif"));
        assert_eq!(paths.output_dir, run_dir.join("tiles"));
    }

    #[test]
    fn test_repeated_allocation_is_unique() {
        let workspace = RunWorkspace::new("/tmp/ws");
        let first = workspace.allocate(&request(440.0));
        let second = workspace.allocate(&request(440.0));

        assert_ne!(first.run_id, second.run_id);
        assert_ne!(first.raster_path, second.raster_path);
        assert_ne!(first.output_dir, second.output_dir);
    }

    #[test]
    fn test_digest_prefix_is_stable_for_same_request() {
        let workspace = RunWorkspace::new("/tmp/ws");
        let first = workspace.allocate(&request(440.0));
        let second = workspace.allocate(&request(440.0));
        let other = workspace.allocate(&request(441.0));

        let prefix = |paths: &RunPaths| paths.run_id.split('-').next().unwrap().to_string();
        assert_eq!(prefix(&first), prefix(&second));
        assert_ne!(prefix(&first), prefix(&other));
    }
}
