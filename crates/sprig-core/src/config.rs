use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::drag::classify::{DropClassifier, NestZone, default_edge_threshold};
use crate::error::ErrorCode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SprigConfig {
    #[serde(default)]
    pub drag: DragConfig,
    /// Preferred CLI output mode (`pretty`, `text` or `json`).
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    #[serde(default)]
    pub nest_zone: NestZone,
    #[serde(default = "default_edge_threshold")]
    pub edge_threshold: f32,
    /// Commit a plain reorder through sibling-drop inference, so dropping a
    /// row between two children of `P` also moves it under `P`.
    #[serde(default)]
    pub infer_reparent_on_reorder: bool,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            nest_zone: NestZone::default(),
            edge_threshold: default_edge_threshold(),
            infer_reparent_on_reorder: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("nest_zone.{field} = {value} is outside [0, 1]")]
    ZoneOutOfRange { field: &'static str, value: f32 },
    #[error("nest_zone.start ({start}) must be below nest_zone.end ({end})")]
    ZoneInverted { start: f32, end: f32 },
    #[error("edge_threshold = {0} must be a finite, non-negative distance")]
    BadEdgeThreshold(f32),
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::ConfigInvalid
    }
}

impl DragConfig {
    /// Check the tunables are usable.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let NestZone { start, end } = self.nest_zone;
        for (field, value) in [("start", start), ("end", end)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ZoneOutOfRange { field, value });
            }
        }
        if start >= end {
            return Err(ConfigError::ZoneInverted { start, end });
        }
        if !self.edge_threshold.is_finite() || self.edge_threshold < 0.0 {
            return Err(ConfigError::BadEdgeThreshold(self.edge_threshold));
        }
        Ok(())
    }

    #[must_use]
    pub const fn classifier(&self) -> DropClassifier {
        DropClassifier::new(self.nest_zone, self.edge_threshold)
    }
}

/// `<config_dir>/sprig/config.toml`, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sprig/config.toml"))
}

/// Load and validate a config file. A missing file yields defaults.
///
/// # Errors
///
/// Fails if the file exists but cannot be read, parsed, or validated.
pub fn load_config(path: &Path) -> Result<SprigConfig> {
    if !path.exists() {
        return Ok(SprigConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<SprigConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    config
        .drag
        .validate()
        .with_context(|| format!("Invalid drag settings in {}", path.display()))?;
    Ok(config)
}

/// Load the user-level config, or defaults when there is none.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_user_config() -> Result<SprigConfig> {
    let Some(path) = user_config_path() else {
        return Ok(SprigConfig::default());
    };
    load_config(&path)
}
