//! Layer records for the canvas stack.

mod image;
mod text;

pub use image::{IMAGE_BASE_WIDTH, ImageHandle, ImageSource};
pub use text::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TEXT, FONT_CATALOGUE, TEXT_ENVELOPE, TextContent, TextEdit,
};

use kurbo::{Affine, Point, Rect, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for layers.
pub type LayerId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Check if the color is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Content of a layer. Both variants share the same geometry envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// A raster image resolved by the shell.
    Image(ImageSource),
    /// Styled text.
    Text(TextContent),
}

impl LayerKind {
    /// Size of the untransformed frame used for hit-testing and clipping.
    pub fn envelope(&self) -> Size {
        match self {
            LayerKind::Image(source) => source.envelope(),
            LayerKind::Text(_) => TEXT_ENVELOPE,
        }
    }

    /// Label prefix used when naming new layers.
    pub fn label(&self) -> &'static str {
        match self {
            LayerKind::Image(_) => "Image",
            LayerKind::Text(_) => "Text",
        }
    }
}

/// One positioned, transformable element of the canvas stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub(crate) id: LayerId,
    /// Display label.
    pub name: String,
    /// Image or text content.
    pub kind: LayerKind,
    /// Center of the layer in canvas coordinates.
    pub position: Point,
    /// Uniform scale factor.
    pub scale: f64,
    /// Rotation in degrees, clockwise in canvas space.
    pub rotation: f64,
    /// Opacity (0.0 = fully transparent, 1.0 = fully opaque).
    pub opacity: f64,
    /// Corner radius of the clipping envelope.
    pub corner_radius: f64,
    /// Locked layers ignore gestures and cannot be selected.
    pub is_locked: bool,
    /// Hidden layers are neither rendered nor selectable.
    pub is_visible: bool,
}

impl Layer {
    /// Create a new layer with identity transform.
    pub fn new(name: impl Into<String>, kind: LayerKind, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            position,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
            corner_radius: 0.0,
            is_locked: false,
            is_visible: true,
        }
    }

    /// Create an image layer.
    pub fn image(name: impl Into<String>, source: ImageSource, position: Point) -> Self {
        Self::new(name, LayerKind::Image(source), position)
    }

    /// Create a text layer.
    pub fn text(name: impl Into<String>, content: TextContent, position: Point) -> Self {
        Self::new(name, LayerKind::Text(content), position)
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Copy every attribute into a new layer with a fresh identity.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, LayerKind::Text(_))
    }

    pub fn text_content(&self) -> Option<&TextContent> {
        match &self.kind {
            LayerKind::Text(text) => Some(text),
            LayerKind::Image(_) => None,
        }
    }

    /// Whether gestures, taps and selection may target this layer.
    pub fn is_targetable(&self) -> bool {
        self.is_visible && !self.is_locked
    }

    /// Map from envelope-local coordinates (origin at the envelope center) to canvas coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale(self.scale)
    }

    /// The untransformed envelope, centered on the origin.
    pub fn local_rect(&self) -> Rect {
        Rect::from_center_size(Point::ZERO, self.kind.envelope())
    }

    /// Axis-aligned bounds of the transformed envelope.
    pub fn bounds(&self) -> Rect {
        self.transform().transform_rect_bbox(self.local_rect())
    }

    /// Check if a canvas point lies inside the transformed envelope.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let transform = self.transform();
        if !transform.is_finite() || transform.determinant().abs() < f64::EPSILON {
            return false;
        }
        let local = transform.inverse() * point;
        let slack = tolerance / self.scale;
        self.local_rect().inflate(slack, slack).contains(local)
    }
}

/// Partial style change applied by `Editor::update_style`.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleUpdate {
    pub name: Option<String>,
    pub opacity: Option<f64>,
    pub corner_radius: Option<f64>,
    /// Text attributes; only valid for text layers.
    pub text: Option<TextEdit>,
}

impl StyleUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.opacity.is_none() && self.corner_radius.is_none() && self.text.is_none()
    }

    /// Apply to a layer. Text attributes are ignored for image layers.
    pub fn apply(&self, layer: &mut Layer) {
        if let Some(name) = &self.name {
            layer.name = name.clone();
        }
        if let Some(opacity) = self.opacity {
            layer.opacity = opacity;
        }
        if let Some(radius) = self.corner_radius {
            layer.corner_radius = radius;
        }
        if let (Some(edit), LayerKind::Text(text)) = (&self.text, &mut layer.kind) {
            text.apply(edit);
        }
    }
}
