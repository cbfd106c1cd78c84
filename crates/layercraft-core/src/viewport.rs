//! Viewport module for zooming and panning the canvas as a whole.

use crate::config::CanvasConfig;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_VIEWPORT_SCALE: f64 = 0.5;
pub const MAX_VIEWPORT_SCALE: f64 = 5.0;

/// Fraction of the container the canvas fills at scale 1.0.
pub const FIT_PADDING: f64 = 0.9;

/// Viewport manages the view transform of the canvas inside its container.
///
/// The canvas is first fitted to the container, then scaled by `scale`
/// around the container center and shifted by `offset` (in screen units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom on top of the fit scale, kept between
    /// `MIN_VIEWPORT_SCALE` and `MAX_VIEWPORT_SCALE`
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pan by a delta in screen coordinates. Non-finite deltas are ignored.
    pub fn pan(&mut self, delta: Vec2) -> bool {
        if !delta.is_finite() {
            return false;
        }
        self.offset += delta;
        true
    }

    /// Multiply the scale by `factor`, clamped to the allowed range.
    pub fn zoom_by(&mut self, factor: f64) -> bool {
        if !factor.is_finite() {
            return false;
        }
        self.set_scale(self.scale * factor)
    }

    /// Returns `true` if the scale changed.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        if !scale.is_finite() {
            return false;
        }
        let clamped = scale.clamp(MIN_VIEWPORT_SCALE, MAX_VIEWPORT_SCALE);
        if (clamped - self.scale).abs() < f64::EPSILON {
            return false;
        }
        self.scale = clamped;
        true
    }

    /// Restore scale 1.0 and zero offset.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.scale = 1.0;
    }

    pub fn is_identity(&self) -> bool {
        self.offset == Vec2::ZERO && (self.scale - 1.0).abs() < f64::EPSILON
    }

    /// Scale that fits the canvas inside the container with padding.
    pub fn fit_scale(container: Size, canvas: &CanvasConfig) -> f64 {
        let ratio = (container.width / canvas.width()).min(container.height / canvas.height());
        if ratio.is_finite() && ratio > 0.0 {
            ratio * FIT_PADDING
        } else {
            1.0
        }
    }

    /// Canvas-to-screen transform for a container of the given size.
    pub fn transform(&self, container: Size, canvas: &CanvasConfig) -> Affine {
        let container_center = Vec2::new(container.width / 2.0, container.height / 2.0);
        Affine::translate(container_center + self.offset)
            * Affine::scale(Self::fit_scale(container, canvas) * self.scale)
            * Affine::translate(-canvas.center().to_vec2())
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, point: Point, container: Size, canvas: &CanvasConfig) -> Point {
        self.transform(container, canvas).inverse() * point
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, point: Point, container: Size, canvas: &CanvasConfig) -> Point {
        self.transform(container, canvas) * point
    }
}
