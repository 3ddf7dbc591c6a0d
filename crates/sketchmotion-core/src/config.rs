//! Editor configuration.

use crate::animation::MotionSettings;
use crate::geometry::HexColor;
use crate::history::HistoryConfig;
use crate::shapes::{PlacementBounds, ShapeKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for an [`Editor`](crate::Editor). Every field has a default, so a
/// config file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Drawing surface size; dragged shapes are kept inside it.
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub placement: PlacementBounds,
    pub motion: MotionSettings,
    pub history: HistoryConfig,
    pub default_stroke_width: u8,
    pub default_stroke_color: HexColor,
    pub default_shape: ShapeKind,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 500.0,
            canvas_height: 400.0,
            placement: PlacementBounds::default(),
            motion: MotionSettings::default(),
            history: HistoryConfig::default(),
            default_stroke_width: 3,
            default_stroke_color: HexColor::black(),
            default_shape: ShapeKind::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
