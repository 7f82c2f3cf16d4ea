use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compare::{Arrangement, MAX_PREVIEW_SIZE, MIN_PREVIEW_SIZE, ResamplePolicy};
use crate::model::ZoomBounds;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse failure: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("config YAML parse failure: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ViewerConfig {
    pub arrangement: Arrangement,
    pub preview_size: u32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub resample: ResamplePolicy,
    pub margin: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let bounds = ZoomBounds::default();
        Self {
            arrangement: Arrangement::default(),
            preview_size: 192,
            zoom_min: bounds.min,
            zoom_max: bounds.max,
            resample: ResamplePolicy::default(),
            margin: 10.0,
        }
    }
}

impl ViewerConfig {
    /// Reads a config from YAML or JSON, keyed on the file extension the
    /// same way recipe files are dispatched.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config = if matches!(extension.as_str(), "yaml" | "yml") {
            serde_yaml::from_str::<Self>(&raw)?
        } else {
            serde_json::from_str::<Self>(&raw)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PREVIEW_SIZE..=MAX_PREVIEW_SIZE).contains(&self.preview_size) {
            return Err(ConfigError::Invalid(format!(
                "preview size {} outside {MIN_PREVIEW_SIZE}..={MAX_PREVIEW_SIZE}",
                self.preview_size
            )));
        }
        if self.zoom_min <= 0.0 || self.zoom_max <= self.zoom_min {
            return Err(ConfigError::Invalid(format!(
                "zoom range [{}, {}] must be positive and ordered",
                self.zoom_min, self.zoom_max
            )));
        }
        if self.margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "margin {} must not be negative",
                self.margin
            )));
        }
        Ok(())
    }

    pub fn zoom_bounds(&self) -> ZoomBounds {
        ZoomBounds {
            min: self.zoom_min,
            max: self.zoom_max,
        }
    }
}
