//! Snap functionality for aligning layers to the canvas center and to each other.

use crate::config::CanvasConfig;
use crate::layer::{Layer, LayerId};
use kurbo::{Line, Point};
use serde::{Deserialize, Serialize};

/// Distance threshold for position snapping (in canvas units).
pub const SNAP_THRESHOLD: f64 = 10.0;

/// Angular threshold for rotation snapping (in degrees).
pub const ROTATION_SNAP_THRESHOLD: f64 = 5.0;

/// Canonical angles, tested in this order.
pub const SNAP_ANGLES: [f64; 9] = [0.0, 90.0, 180.0, 270.0, 360.0, -90.0, -180.0, -270.0, -360.0];

/// Orientation of a guideline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideAxis {
    /// Line of constant y, spanning the canvas width.
    Horizontal,
    /// Line of constant x, spanning the canvas height.
    Vertical,
}

/// An active alignment line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guideline {
    pub axis: GuideAxis,
    /// The x coordinate for vertical lines, the y coordinate for horizontal ones.
    pub position: f64,
}

impl Guideline {
    pub fn vertical(x: f64) -> Self {
        Self {
            axis: GuideAxis::Vertical,
            position: x,
        }
    }

    pub fn horizontal(y: f64) -> Self {
        Self {
            axis: GuideAxis::Horizontal,
            position: y,
        }
    }

    /// The line segment to draw, spanning the canvas.
    pub fn segment(&self, canvas: &CanvasConfig) -> Line {
        match self.axis {
            GuideAxis::Vertical => Line::new((self.position, 0.0), (self.position, canvas.height())),
            GuideAxis::Horizontal => Line::new((0.0, self.position), (canvas.width(), self.position)),
        }
    }
}

/// Result of a position snap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapResult {
    /// Corrected x, if the x axis snapped.
    pub snapped_x: Option<f64>,
    /// Corrected y, if the y axis snapped.
    pub snapped_y: Option<f64>,
    pub guidelines: Vec<Guideline>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none() -> Self {
        Self::default()
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x.is_some() || self.snapped_y.is_some()
    }

    pub fn state(&self) -> SnapState {
        SnapState {
            x: self.snapped_x.is_some(),
            y: self.snapped_y.is_some(),
        }
    }

    /// Replace snapped axes of `point`, leaving the others untouched.
    pub fn apply(&self, point: Point) -> Point {
        Point::new(self.snapped_x.unwrap_or(point.x), self.snapped_y.unwrap_or(point.y))
    }
}

/// Which axes are currently held at a snap point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapState {
    pub x: bool,
    pub y: bool,
}

impl SnapState {
    /// True if `next` snaps an axis that was free in `self`.
    pub fn entered(&self, next: SnapState) -> bool {
        (next.x && !self.x) || (next.y && !self.y)
    }
}

fn snap_axis(proposed: f64, candidates: impl Iterator<Item = f64>, threshold: f64) -> Option<f64> {
    // Later candidates override earlier ones.
    candidates.filter(|c| (proposed - c).abs() < threshold).last()
}

/// Snap a proposed layer position against the canvas center and every other visible layer.
///
/// Each axis is resolved independently. When several candidates are within
/// `threshold`, the one iterated last wins, so sibling layers (in store order)
/// take precedence over the canvas center.
pub fn compute_snap<'a>(
    proposed: Point,
    selected: Option<LayerId>,
    layers: impl IntoIterator<Item = &'a Layer>,
    canvas: &CanvasConfig,
    threshold: f64,
) -> SnapResult {
    let center = canvas.center();
    let anchors: Vec<Point> = std::iter::once(center)
        .chain(
            layers
                .into_iter()
                .filter(|layer| layer.is_visible && Some(layer.id()) != selected)
                .map(|layer| layer.position),
        )
        .collect();

    let snapped_x = snap_axis(proposed.x, anchors.iter().map(|p| p.x), threshold);
    let snapped_y = snap_axis(proposed.y, anchors.iter().map(|p| p.y), threshold);

    let mut guidelines = Vec::with_capacity(2);
    if let Some(x) = snapped_x {
        guidelines.push(Guideline::vertical(x));
    }
    if let Some(y) = snapped_y {
        guidelines.push(Guideline::horizontal(y));
    }

    SnapResult {
        snapped_x,
        snapped_y,
        guidelines,
    }
}

/// Snap an angle in degrees to the first canonical angle within `threshold`.
pub fn snap_rotation(degrees: f64, threshold: f64) -> Option<f64> {
    SNAP_ANGLES.iter().copied().find(|a| (degrees - a).abs() < threshold)
}
