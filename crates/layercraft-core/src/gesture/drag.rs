//! Drag session: translation with jump rejection and magnetic snapping.

use super::{GestureContext, GestureOutcome, GestureTarget};
use crate::config::CanvasConfig;
use crate::feedback::{Feedback, ImpactStyle};
use crate::layer::LayerId;
use crate::snap::{Guideline, SnapState, compute_snap};
use kurbo::{Point, Vec2};

/// Baseline established by the first sample or a re-anchor.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    /// Layer position when anchored.
    origin: Point,
    /// Translation sample when anchored.
    baseline: Vec2,
    /// Most recent accepted sample.
    last: Vec2,
}

#[derive(Debug)]
pub(crate) struct DragSession {
    pub(crate) target: GestureTarget,
    anchor: Option<Anchor>,
    last_pan: Vec2,
    snap_state: SnapState,
}

/// Clamp a position into the overscan area. Non-finite axes fall back to the center.
fn clamp_to_overscan(point: Point, canvas: &CanvasConfig) -> Point {
    let bounds = canvas.overscan_bounds();
    let center = canvas.center();
    let axis = |value: f64, min: f64, max: f64, fallback: f64| {
        if value.is_finite() { value.clamp(min, max) } else { fallback }
    };
    Point::new(
        axis(point.x, bounds.x0, bounds.x1, center.x),
        axis(point.y, bounds.y0, bounds.y1, center.y),
    )
}

impl DragSession {
    pub(crate) fn new(target: GestureTarget) -> Self {
        Self {
            target,
            anchor: None,
            last_pan: Vec2::ZERO,
            snap_state: SnapState::default(),
        }
    }

    /// Returns the guidelines to publish when the layer moved.
    pub(crate) fn update(
        &mut self,
        translation: Vec2,
        reanchor: bool,
        ctx: &mut GestureContext<'_>,
        out: &mut GestureOutcome,
    ) -> Option<Vec<Guideline>> {
        match self.target {
            GestureTarget::Layer(id) => self.update_layer(id, translation, reanchor, ctx, out),
            GestureTarget::Viewport => {
                let delta = translation - self.last_pan;
                self.last_pan = translation;
                if delta != Vec2::ZERO && ctx.viewport.pan(delta) {
                    out.viewport_changed = true;
                }
                None
            }
        }
    }

    fn update_layer(
        &mut self,
        id: LayerId,
        translation: Vec2,
        reanchor: bool,
        ctx: &mut GestureContext<'_>,
        out: &mut GestureOutcome,
    ) -> Option<Vec<Guideline>> {
        let position = ctx.store.get(id)?.position;

        if reanchor || self.anchor.is_none() {
            self.anchor = Some(Anchor {
                origin: position,
                baseline: translation,
                last: translation,
            });
            return None;
        }
        let anchor = self.anchor.as_mut()?;

        let delta = translation - anchor.last;
        if !delta.is_finite() || delta.hypot() > ctx.settings.drag_jump_threshold {
            log::debug!("Rejecting drag jump of {:.1} on layer {}", delta.hypot(), id);
            *anchor = Anchor {
                origin: position,
                baseline: translation,
                last: translation,
            };
            return None;
        }
        anchor.last = translation;

        // Recompute from the anchor so snapping never accumulates drift.
        let proposed = anchor.origin + (translation - anchor.baseline);
        let clamped = clamp_to_overscan(proposed, ctx.canvas);
        // Re-anchor clamped axes so reversing direction moves immediately.
        if clamped.x != proposed.x {
            anchor.origin.x = clamped.x;
            anchor.baseline.x = translation.x;
        }
        if clamped.y != proposed.y {
            anchor.origin.y = clamped.y;
            anchor.baseline.y = translation.y;
        }
        let snap = compute_snap(
            clamped,
            Some(id),
            ctx.store.ordered(),
            ctx.canvas,
            ctx.settings.snap_threshold,
        );
        let next = snap.apply(clamped);

        if next != position {
            ctx.store.mutate(id, |layer| layer.position = next);
            out.layers_changed = true;
        }

        let state = snap.state();
        if self.snap_state.entered(state) {
            out.feedback.push(Feedback::Impact(ImpactStyle::Medium));
        }
        self.snap_state = state;

        Some(snap.guidelines)
    }
}
