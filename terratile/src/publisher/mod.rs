//! Tileset publication.
//!
//! Maps a verified tileset manifest to the public address a viewer loads
//! it from. The manifest's physical directory is the single source of
//! truth: no address is ever emitted for a tileset whose `layer.json` is
//! not on disk.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::builder::TilesetManifest;

/// Default base address under which tileset directories are served.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/tilesets";

/// The published asset payload returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedTileset {
    /// Address of the tileset directory containing `layer.json`.
    #[serde(rename = "tileSetUrl")]
    pub tile_set_url: String,
}

/// Errors that can occur while publishing a tileset.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The manifest file is gone from disk; no address may be fabricated.
    #[error("manifest no longer present at {}", .path.display())]
    ManifestMissing { path: PathBuf },

    /// The output directory is not inside the served workspace, so no
    /// address can reference it.
    #[error("output directory {} is outside the served workspace", .path.display())]
    OutsideWorkspace { path: PathBuf },
}

/// Publishes verified tilesets under a configured base address.
///
/// The publisher serves exactly what lives under the workspace root: the
/// public address is the base URL joined with the output directory's path
/// relative to that root.
pub struct TilesetPublisher {
    base_url: String,
    workspace_root: PathBuf,
}

impl TilesetPublisher {
    pub fn new(base_url: impl Into<String>, workspace_root: impl Into<PathBuf>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            workspace_root: workspace_root.into(),
        }
    }

    /// Maps a verified manifest to its public address.
    ///
    /// Re-verifies the manifest file on disk before emitting an address.
    pub fn publish(&self, manifest: &TilesetManifest) -> Result<PublishedTileset, PublishError> {
        if !manifest.manifest_path.exists() {
            return Err(PublishError::ManifestMissing {
                path: manifest.manifest_path.clone(),
            });
        }

        let relative = manifest
            .output_dir
            .strip_prefix(&self.workspace_root)
            .map_err(|_| PublishError::OutsideWorkspace {
                path: manifest.output_dir.clone(),
            })?;

        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if segments.is_empty() {
            return Err(PublishError::OutsideWorkspace {
                path: manifest.output_dir.clone(),
            });
        }

        Ok(PublishedTileset {
            tile_set_url: format!("{}/{}", self.base_url, segments.join("/")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MANIFEST_FILENAME;

    fn verified_manifest(temp: &tempfile::TempDir) -> TilesetManifest {
        let output_dir = temp.path().join("ab12cd34-0").join("tiles");
        std::fs::create_dir_all(&output_dir).unwrap();
        let manifest_path = output_dir.join(MANIFEST_FILENAME);
        std::fs::write(&manifest_path, b"{}").unwrap();
        TilesetManifest {
            output_dir,
            manifest_path,
        }
    }

    #[test]
    fn test_publish_joins_base_and_relative_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let manifest = verified_manifest(&temp);
        let publisher = TilesetPublisher::new("http://localhost:8080/tilesets", temp.path());

        let published = publisher.publish(&manifest).unwrap();
        assert_eq!(
            published.tile_set_url,
            "http://localhost:8080/tilesets/ab12cd34-0/tiles"
        );
    }

    #[test]
    fn test_publish_trims_trailing_slash_on_base() {
        let temp = tempfile::TempDir::new().unwrap();
        let manifest = verified_manifest(&temp);
        let publisher = TilesetPublisher::new("http://tiles.example/", temp.path());

        let published = publisher.publish(&manifest).unwrap();
        assert_eq!(
            published.tile_set_url,
            "http://tiles.example/ab12cd34-0/tiles"
        );
    }

    #[test]
    fn test_publish_refuses_missing_manifest() {
        let temp = tempfile::TempDir::new().unwrap();
        let manifest = verified_manifest(&temp);
        std::fs::remove_file(&manifest.manifest_path).unwrap();
        let publisher = TilesetPublisher::new(DEFAULT_BASE_URL, temp.path());

        let result = publisher.publish(&manifest);
        assert!(matches!(result, Err(PublishError::ManifestMissing { .. })));
    }

    #[test]
    fn test_publish_refuses_directory_outside_workspace() {
        let temp = tempfile::TempDir::new().unwrap();
        let elsewhere = tempfile::TempDir::new().unwrap();
        let manifest = verified_manifest(&elsewhere);
        let publisher = TilesetPublisher::new(DEFAULT_BASE_URL, temp.path());

        let result = publisher.publish(&manifest);
        assert!(matches!(result, Err(PublishError::OutsideWorkspace { .. })));
    }

    #[test]
    fn test_published_payload_serializes_with_wire_name() {
        let published = PublishedTileset {
            tile_set_url: "http://localhost:8080/tilesets/run/tiles".to_string(),
        };
        let json = serde_json::to_string(&published).unwrap();
        assert_eq!(
            json,
            "{\"tileSetUrl\":\"http://localhost:8080/tilesets/run/tiles\"}"
        );
    }
}
