//! Canvas configuration and engine tuning.

use crate::layer::SerializableColor;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for canvas configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Canvas width must be positive and finite, got {0}")]
    InvalidWidth(f64),
    #[error("Canvas height must be positive and finite, got {0}")]
    InvalidHeight(f64),
}

/// Canvas background. Only affects rendering, never geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    Solid(SerializableColor),
    Transparent,
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(SerializableColor::white())
    }
}

#[derive(Deserialize)]
struct RawCanvasConfig {
    name: String,
    width: f64,
    height: f64,
    #[serde(default)]
    background: Background,
}

impl TryFrom<RawCanvasConfig> for CanvasConfig {
    type Error = ConfigError;

    fn try_from(raw: RawCanvasConfig) -> Result<Self, Self::Error> {
        Ok(CanvasConfig::new(raw.name, raw.width, raw.height)?.with_background(raw.background))
    }
}

/// Fixed-size logical surface. Immutable for the lifetime of an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCanvasConfig")]
pub struct CanvasConfig {
    pub name: String,
    width: f64,
    height: f64,
    pub background: Background,
}

impl CanvasConfig {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Result<Self, ConfigError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(ConfigError::InvalidWidth(width));
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(ConfigError::InvalidHeight(height));
        }
        Ok(Self {
            name: name.into(),
            width,
            height,
            background: Background::default(),
        })
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    fn preset(name: &str, width: f64, height: f64) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            background: Background::default(),
        }
    }

    /// Phone wallpaper, 1170x2532.
    pub fn wallpaper() -> Self {
        Self::preset("Wallpaper", 1170.0, 2532.0)
    }

    pub fn square() -> Self {
        Self::preset("1:1 Square", 1080.0, 1080.0)
    }

    pub fn four_by_three() -> Self {
        Self::preset("4:3", 1440.0, 1080.0)
    }

    pub fn story() -> Self {
        Self::preset("9:16 Story", 1080.0, 1920.0)
    }

    pub fn landscape() -> Self {
        Self::preset("Landscape", 1920.0, 1080.0)
    }

    /// All built-in presets, in menu order.
    pub fn all_presets() -> Vec<Self> {
        vec![
            Self::wallpaper(),
            Self::square(),
            Self::four_by_three(),
            Self::story(),
            Self::landscape(),
        ]
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size())
    }

    /// Area a layer center may occupy: one canvas dimension of overscan on every side.
    pub fn overscan_bounds(&self) -> Rect {
        Rect::new(-self.width, -self.height, 2.0 * self.width, 2.0 * self.height)
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self::square()
    }
}

/// Default snap distance in canvas units.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 10.0;
/// Default angular snap distance in degrees.
pub const DEFAULT_ROTATION_SNAP_THRESHOLD: f64 = 5.0;
/// Drag deltas longer than this in one update are treated as recognizer glitches.
pub const DEFAULT_DRAG_JUMP_THRESHOLD: f64 = 300.0;
pub const DEFAULT_MIN_SCALE_STEP: f64 = 0.5;
pub const DEFAULT_MAX_SCALE_STEP: f64 = 1.5;
/// Rotation deltas larger than this in one update are treated as recognizer glitches.
pub const DEFAULT_MAX_ROTATION_STEP: f64 = 45.0;

/// Tunables for the gesture interpreter and history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub snap_threshold: f64,
    pub rotation_snap_threshold: f64,
    pub drag_jump_threshold: f64,
    pub min_scale_step: f64,
    pub max_scale_step: f64,
    pub max_rotation_step: f64,
    pub history_capacity: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            rotation_snap_threshold: DEFAULT_ROTATION_SNAP_THRESHOLD,
            drag_jump_threshold: DEFAULT_DRAG_JUMP_THRESHOLD,
            min_scale_step: DEFAULT_MIN_SCALE_STEP,
            max_scale_step: DEFAULT_MAX_SCALE_STEP,
            max_rotation_step: DEFAULT_MAX_ROTATION_STEP,
            history_capacity: crate::history::MAX_UNDO_HISTORY,
        }
    }
}
