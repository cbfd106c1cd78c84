//! Geometry repair pass run after every mutation.

use crate::config::CanvasConfig;
use crate::layer::{DEFAULT_FONT_SIZE, Layer, LayerKind};

pub const MIN_LAYER_SCALE: f64 = 0.1;
pub const MAX_LAYER_SCALE: f64 = 10.0;
pub const MAX_CORNER_RADIUS: f64 = 100.0;
pub const MIN_FONT_SIZE: f64 = 1.0;

/// Clamp a scale factor into the layer range. Non-finite input becomes 1.0.
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.clamp(MIN_LAYER_SCALE, MAX_LAYER_SCALE)
    } else {
        1.0
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Return a copy of `layer` with finite, in-range geometry.
///
/// Idempotent: `sanitize(&sanitize(l, c), c) == sanitize(l, c)`.
pub fn sanitize(layer: &Layer, canvas: &CanvasConfig) -> Layer {
    let mut out = layer.clone();
    sanitize_in_place(&mut out, canvas);
    out
}

/// Repair `layer` in place. Returns `true` if any field changed.
pub fn sanitize_in_place(layer: &mut Layer, canvas: &CanvasConfig) -> bool {
    let before = layer.clone();
    let center = canvas.center();

    layer.position.x = finite_or(layer.position.x, center.x);
    layer.position.y = finite_or(layer.position.y, center.y);
    layer.scale = clamp_scale(layer.scale);
    layer.rotation = finite_or(layer.rotation, 0.0);
    layer.opacity = finite_or(layer.opacity, 1.0).clamp(0.0, 1.0);
    layer.corner_radius = finite_or(layer.corner_radius, 0.0).clamp(0.0, MAX_CORNER_RADIUS);

    if let LayerKind::Text(text) = &mut layer.kind {
        text.font_size = finite_or(text.font_size, DEFAULT_FONT_SIZE).max(MIN_FONT_SIZE);
    }

    let changed = *layer != before;
    if changed {
        log::debug!("Sanitized layer {}", layer.id());
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{ImageHandle, ImageSource, TextContent};
    use kurbo::Point;

    fn canvas() -> CanvasConfig {
        CanvasConfig::new("test", 1000.0, 600.0).unwrap()
    }

    fn corrupted() -> Layer {
        let mut layer = Layer::image(
            "Image 1",
            ImageSource::new(ImageHandle::new(), 10, 10),
            Point::new(f64::NAN, f64::INFINITY),
        );
        layer.scale = f64::NAN;
        layer.rotation = f64::NEG_INFINITY;
        layer.opacity = f64::NAN;
        layer.corner_radius = 500.0;
        layer
    }

    #[test]
    fn test_non_finite_fields_reset() {
        let fixed = sanitize(&corrupted(), &canvas());
        assert_eq!(fixed.position, Point::new(500.0, 300.0));
        assert!((fixed.scale - 1.0).abs() < f64::EPSILON);
        assert_eq!(fixed.rotation, 0.0);
        assert_eq!(fixed.opacity, 1.0);
        assert_eq!(fixed.corner_radius, MAX_CORNER_RADIUS);
    }

    #[test]
    fn test_axes_repaired_independently() {
        let mut layer = corrupted();
        layer.position = Point::new(42.0, f64::NAN);
        let fixed = sanitize(&layer, &canvas());
        assert_eq!(fixed.position, Point::new(42.0, 300.0));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let canvas = canvas();
        let mut samples = vec![corrupted()];
        for scale in [0.0, -3.0, 0.05, 1e9, 2.5] {
            let mut layer = corrupted();
            layer.scale = scale;
            layer.position = Point::new(-5000.0, 12.5);
            layer.rotation = 721.0;
            samples.push(layer);
        }
        let mut text = Layer::text("Text 1", TextContent::default(), Point::new(1.0, 2.0));
        if let LayerKind::Text(content) = &mut text.kind {
            content.font_size = f64::NAN;
        }
        samples.push(text);

        for layer in samples {
            let once = sanitize(&layer, &canvas);
            let twice = sanitize(&once, &canvas);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_scale_always_in_range() {
        for raw in [f64::NAN, f64::INFINITY, -1.0, 0.0, 0.09, 0.1, 3.0, 10.0, 11.0, 1e300] {
            let scaled = clamp_scale(raw);
            assert!((MIN_LAYER_SCALE..=MAX_LAYER_SCALE).contains(&scaled), "{raw} -> {scaled}");
        }
    }

    #[test]
    fn test_font_size_floor() {
        let mut layer = Layer::text("Text 1", TextContent::default(), Point::ZERO);
        if let LayerKind::Text(content) = &mut layer.kind {
            content.font_size = 0.0;
        }
        let fixed = sanitize(&layer, &canvas());
        assert_eq!(fixed.text_content().map(|t| t.font_size), Some(MIN_FONT_SIZE));
    }

    #[test]
    fn test_in_place_reports_changes() {
        let canvas = canvas();
        let mut layer = corrupted();
        assert!(sanitize_in_place(&mut layer, &canvas));
        assert!(!sanitize_in_place(&mut layer, &canvas));
    }
}
