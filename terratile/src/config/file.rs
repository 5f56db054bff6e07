//! Configuration file handling for ~/.terratile/config.ini.
//!
//! Loads and saves pipeline configuration with sensible defaults: a
//! missing file or a missing key means the default applies.

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::PipelineConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl PipelineConfig {
    /// Load configuration from the default path (~/.terratile/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("wcs")) {
            if let Some(value) = section.get("endpoint") {
                config.wcs.endpoint = value.to_string();
            }
            if let Some(value) = section.get("coverage") {
                config.wcs.coverage = value.to_string();
            }
            if let Some(value) = section.get("source_crs") {
                config.wcs.source_crs = value.to_string();
            }
            if let Some(value) = section.get("response_crs") {
                config.wcs.response_crs = value.to_string();
            }
            if let Some(value) = section.get("max_dimension") {
                config.wcs.max_dimension = parse_positive_f64("wcs", "max_dimension", value)?;
            }
            if let Some(value) = section.get("timeout") {
                config.wcs.timeout_secs = parse_u64("wcs", "timeout", value)?;
            }
        }

        if let Some(section) = ini.section(Some("builder")) {
            if let Some(value) = section.get("image") {
                config.builder.image = value.to_string();
            }
            if let Some(value) = section.get("stage_timeout") {
                config.builder.stage_timeout_secs =
                    parse_u64("builder", "stage_timeout", value)?;
            }
        }

        if let Some(section) = ini.section(Some("publish")) {
            if let Some(value) = section.get("base_url") {
                config.publish.base_url = value.to_string();
            }
        }

        if let Some(section) = ini.section(Some("workspace")) {
            if let Some(value) = section.get("directory") {
                config.workspace_dir = PathBuf::from(value);
            }
        }

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("wcs"))
            .set("endpoint", self.wcs.endpoint.as_str())
            .set("coverage", self.wcs.coverage.as_str())
            .set("source_crs", self.wcs.source_crs.as_str())
            .set("response_crs", self.wcs.response_crs.as_str())
            .set("max_dimension", self.wcs.max_dimension.to_string())
            .set("timeout", self.wcs.timeout_secs.to_string());
        ini.with_section(Some("builder"))
            .set("image", self.builder.image.as_str())
            .set("stage_timeout", self.builder.stage_timeout_secs.to_string());
        ini.with_section(Some("publish"))
            .set("base_url", self.publish.base_url.as_str());
        ini.with_section(Some("workspace"))
            .set("directory", self.workspace_dir.to_string_lossy());

        ini.write_to_file(path)
            .map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }
}

fn parse_u64(section: &str, key: &str, value: &str) -> Result<u64, ConfigFileError> {
    value
        .parse::<u64>()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a non-negative integer".to_string(),
        })
}

fn parse_positive_f64(section: &str, key: &str, value: &str) -> Result<f64, ConfigFileError> {
    let parsed = value
        .parse::<f64>()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a number".to_string(),
        })?;

    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a positive number".to_string(),
        });
    }

    Ok(parsed)
}

/// Get the path to the config directory (~/.terratile).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".terratile")
}

/// Get the path to the config file (~/.terratile/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
