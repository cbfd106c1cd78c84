//! Replay script format.

use crate::AppError;
use layercraft_core::{CanvasConfig, EngineSettings, GestureKind, StyleUpdate, TextEdit};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A canvas, optional engine overrides and the steps to replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub settings: EngineSettings,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One scripted event. Layers are addressed by z-index, back to front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Add an image layer with the given source pixel size.
    AddImage { width: u32, height: u32 },
    /// Add a text layer; default placeholder text when `content` is absent.
    AddText {
        #[serde(default)]
        content: Option<String>,
    },
    Select {
        #[serde(default)]
        index: Option<usize>,
    },
    /// Tap at a canvas point.
    Tap { x: f64, y: f64 },
    /// Cumulative drag translation.
    Drag { x: f64, y: f64 },
    /// Cumulative pinch factor.
    Scale { factor: f64 },
    /// Cumulative rotation in degrees.
    Rotate { degrees: f64 },
    End { gesture: GestureKind },
    Duplicate,
    Delete,
    Reorder { from: usize, to: usize },
    SetLocked { index: usize, locked: bool },
    SetVisible { index: usize, visible: bool },
    Style { index: usize, update: StyleUpdate },
    EditText { index: usize, edit: TextEdit },
    Undo,
    Redo,
    ResetViewport,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        log::info!("Loading script from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCRIPT: &str = r#"{
        "canvas": {"name": "Square", "width": 1080, "height": 1080},
        "settings": {"snap_threshold": 12.0},
        "steps": [
            {"op": "add_image", "width": 800, "height": 600},
            {"op": "drag", "x": 0, "y": 0},
            {"op": "end", "gesture": "drag"},
            {"op": "style", "index": 0, "update": {"opacity": 0.5}},
            {"op": "edit_text", "index": 0, "edit": {"bold": true}},
            {"op": "select"},
            {"op": "undo"}
        ]
    }"#;

    #[test]
    fn test_parse_script() {
        let script = Script::from_json(SCRIPT).unwrap();
        assert_eq!(script.canvas.width(), 1080.0);
        assert_eq!(script.settings.snap_threshold, 12.0);
        assert_eq!(script.settings.drag_jump_threshold, 300.0);
        assert_eq!(script.steps.len(), 7);
        assert_eq!(script.steps[0], Step::AddImage { width: 800, height: 600 });
        assert_eq!(
            script.steps[2],
            Step::End {
                gesture: GestureKind::Drag
            }
        );
        assert_eq!(script.steps[5], Step::Select { index: None });
        assert_eq!(script.steps[6], Step::Undo);
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SCRIPT.as_bytes()).unwrap();
        let script = Script::load(file.path()).unwrap();
        assert_eq!(script.steps.len(), 7);
    }

    #[test]
    fn test_invalid_canvas_rejected() {
        let json = r#"{"canvas": {"name": "bad", "width": 0, "height": 10}}"#;
        assert!(matches!(Script::from_json(json), Err(AppError::Script(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Script::load(dir.path().join("nope.json"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
