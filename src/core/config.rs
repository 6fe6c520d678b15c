//! Canvas configuration loaded from JSON

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{SurfaceError, SurfaceResult};
use crate::brush::BrushSettings;

/// Canvas configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Settings for the built-in round brush
    pub brush: BrushSettings,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            brush: BrushSettings::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse a configuration from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> SurfaceResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> SurfaceResult<Self> {
        let path = path.as_ref();
        tracing::info!("Loading canvas config: {:?}", path);
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject canvases with no area
    pub fn validate(&self) -> SurfaceResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SurfaceError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
