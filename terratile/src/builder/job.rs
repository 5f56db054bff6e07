//! Tile build job description and sub-stage command layout.

use std::fmt;
use std::path::{Path, PathBuf};

use super::runner::{Mount, ToolInvocation};

/// Manifest file the tile-building tool writes on a complete run.
///
/// Its physical presence in the output directory is the proof that tile
/// generation finished; exit codes alone are not trusted.
pub const MANIFEST_FILENAME: &str = "layer.json";

/// Container path where the input raster's directory is mounted.
pub const CONTAINER_INPUT_DIR: &str = "/data/input";

/// Container path where the tile output directory is mounted.
pub const CONTAINER_OUTPUT_DIR: &str = "/data/output";

/// The tile-building tool invoked inside the container.
const TILE_TOOL: &str = "ctb-tile";

/// The two ordered sub-stages of a tile build.
///
/// `LayerManifest` assumes `Mesh` has already populated the output
/// directory, so the order is fixed and there is no parallelism between
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    /// Produce mesh-format tiles (compressed, with normals, non-layered).
    Mesh,
    /// Same invocation plus the flag that emits the layer manifest.
    LayerManifest,
}

impl BuildStage {
    /// The sub-stages in execution order.
    pub fn ordered() -> [BuildStage; 2] {
        [BuildStage::Mesh, BuildStage::LayerManifest]
    }

    /// Short machine-readable tag for logs and failure classification.
    pub fn name(&self) -> &'static str {
        match self {
            BuildStage::Mesh => "mesh",
            BuildStage::LayerManifest => "layer-manifest",
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStage::Mesh => write!(f, "terrain tile generation"),
            BuildStage::LayerManifest => write!(f, "layer manifest generation"),
        }
    }
}

/// A tile build: one input raster, one output directory, two sub-stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileBuildJob {
    pub input: PathBuf,
    pub output_dir: PathBuf,
}

impl TileBuildJob {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Directory containing the input raster; mounted into the container.
    pub fn input_dir(&self) -> &Path {
        self.input.parent().unwrap_or_else(|| Path::new("."))
    }

    /// File name of the input raster as seen inside the container.
    pub fn input_filename(&self) -> String {
        self.input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Path where the manifest must appear after a successful build.
    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILENAME)
    }

    /// Builds the tool invocation for one sub-stage.
    ///
    /// Both sub-stages run `ctb-tile -f Mesh -C -N` against the mounted
    /// raster; the layer-manifest sub-stage adds `-l`.
    pub fn invocation(&self, stage: BuildStage) -> ToolInvocation {
        let mut args: Vec<String> = vec![
            TILE_TOOL.to_string(),
            "-f".to_string(),
            "Mesh".to_string(),
            "-C".to_string(),
            "-N".to_string(),
        ];
        if stage == BuildStage::LayerManifest {
            args.push("-l".to_string());
        }
        args.push("-o".to_string());
        args.push(CONTAINER_OUTPUT_DIR.to_string());
        args.push(format!("{}/{}", CONTAINER_INPUT_DIR, self.input_filename()));

        ToolInvocation {
            args,
            mounts: vec![
                Mount::read_write(self.input_dir(), CONTAINER_INPUT_DIR),
                Mount::read_write(&self.output_dir, CONTAINER_OUTPUT_DIR),
            ],
        }
    }
}

/// A verified tileset: both sub-stages succeeded and the manifest file was
/// confirmed present on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetManifest {
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
}
