//! Text layer content.

use super::SerializableColor;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Placeholder content of a freshly added text layer.
pub const DEFAULT_TEXT: &str = "Double tap to edit";

pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";

pub const DEFAULT_FONT_SIZE: f64 = 40.0;

/// Untransformed frame of every text layer.
pub const TEXT_ENVELOPE: Size = Size::new(300.0, 150.0);

/// Font families offered to the style chrome.
pub const FONT_CATALOGUE: &[&str] = &[
    "Helvetica",
    "Arial",
    "Times New Roman",
    "Courier New",
    "Georgia",
    "Verdana",
    "Gill Sans",
    "Futura",
];

/// Styled text carried by a text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    pub font_family: String,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: SerializableColor,
}

impl TextContent {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Apply a partial edit. `None` fields are left untouched.
    pub fn apply(&mut self, edit: &TextEdit) {
        if let Some(content) = &edit.content {
            self.content = content.clone();
        }
        if let Some(family) = &edit.font_family {
            self.font_family = family.clone();
        }
        if let Some(size) = edit.font_size {
            self.font_size = size;
        }
        if let Some(bold) = edit.bold {
            self.bold = bold;
        }
        if let Some(italic) = edit.italic {
            self.italic = italic;
        }
        if let Some(underline) = edit.underline {
            self.underline = underline;
        }
        if let Some(color) = edit.color {
            self.color = color;
        }
    }
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            content: DEFAULT_TEXT.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
            underline: false,
            color: SerializableColor::white(),
        }
    }
}

/// Partial text attribute change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextEdit {
    pub content: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub color: Option<SerializableColor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_text_content() {
        let text = TextContent::default();
        assert_eq!(text.content, "Double tap to edit");
        assert_eq!(text.font_family, "Helvetica");
        assert!((text.font_size - 40.0).abs() < f64::EPSILON);
        assert_eq!(text.color, SerializableColor::white());
        assert!(FONT_CATALOGUE.contains(&text.font_family.as_str()));
    }

    #[test]
    fn test_apply_partial_edit() {
        let mut text = TextContent::new("Hello");
        text.apply(&TextEdit {
            bold: Some(true),
            font_family: Some("Georgia".to_string()),
            ..TextEdit::default()
        });
        assert_eq!(text.content, "Hello");
        assert!(text.bold);
        assert!(!text.italic);
        assert_eq!(text.font_family, "Georgia");
    }

    #[test]
    fn test_edit_deserializes_with_missing_fields() {
        let edit: TextEdit = serde_json::from_str(r#"{"italic": true}"#).unwrap();
        assert_eq!(edit.italic, Some(true));
        assert!(edit.content.is_none());
    }
}
