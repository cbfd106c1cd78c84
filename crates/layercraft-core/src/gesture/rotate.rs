//! Rotate session: additive angle deltas with visual snap proximity.

use super::{GestureContext, GestureOutcome, GestureTarget};
use crate::feedback::{Feedback, ImpactStyle};
use crate::layer::LayerId;
use crate::snap::snap_rotation;

#[derive(Debug)]
pub(crate) struct RotateSession {
    pub(crate) target: GestureTarget,
    last_degrees: f64,
    near_snap: bool,
}

impl RotateSession {
    pub(crate) fn new(target: GestureTarget) -> Self {
        Self {
            target,
            last_degrees: 0.0,
            near_snap: false,
        }
    }

    pub(crate) fn update(&mut self, degrees: f64, ctx: &mut GestureContext<'_>, out: &mut GestureOutcome) {
        if !degrees.is_finite() {
            log::trace!("Dropping non-finite rotation sample");
            return;
        }
        let delta = degrees - self.last_degrees;
        self.last_degrees = degrees;

        // The viewport does not rotate.
        let GestureTarget::Layer(id) = self.target else {
            return;
        };
        if delta.abs() > ctx.settings.max_rotation_step {
            log::debug!("Rejecting rotation step {:.1} on layer {}", delta, id);
            return;
        }

        let threshold = ctx.settings.rotation_snap_threshold;
        let mut near = None;
        ctx.store.mutate(id, |layer| {
            layer.rotation += delta;
            near = Some(snap_rotation(layer.rotation, threshold).is_some());
        });
        let Some(near) = near else {
            return;
        };
        if delta != 0.0 {
            out.layers_changed = true;
        }
        if near && !self.near_snap {
            out.feedback.push(Feedback::Impact(ImpactStyle::Heavy));
        }
        self.near_snap = near;
    }

    /// Commit the visual snap to the stored rotation.
    pub(crate) fn hard_snap(&self, id: LayerId, ctx: &mut GestureContext<'_>, out: &mut GestureOutcome) {
        let threshold = ctx.settings.rotation_snap_threshold;
        ctx.store.mutate(id, |layer| {
            if let Some(angle) = snap_rotation(layer.rotation, threshold) {
                if angle != layer.rotation {
                    layer.rotation = angle;
                    out.layers_changed = true;
                }
            }
        });
    }
}
