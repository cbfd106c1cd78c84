//! Scale session: multiplicative pinch deltas.

use super::{GestureContext, GestureOutcome, GestureTarget};
use crate::sanitize::clamp_scale;

#[derive(Debug)]
pub(crate) struct ScaleSession {
    pub(crate) target: GestureTarget,
    last_factor: f64,
}

impl ScaleSession {
    pub(crate) fn new(target: GestureTarget) -> Self {
        Self {
            target,
            last_factor: 1.0,
        }
    }

    /// Step relative to the previous sample. The baseline moves even when the
    /// caller rejects the step; non-finite steps leave it untouched.
    fn advance(&mut self, factor: f64) -> Option<f64> {
        let last = if self.last_factor == 0.0 || !self.last_factor.is_finite() {
            1.0
        } else {
            self.last_factor
        };
        let delta = factor / last;
        if !delta.is_finite() {
            return None;
        }
        self.last_factor = factor;
        Some(delta)
    }

    pub(crate) fn update(&mut self, factor: f64, ctx: &mut GestureContext<'_>, out: &mut GestureOutcome) {
        let Some(delta) = self.advance(factor) else {
            log::trace!("Dropping non-finite scale sample");
            return;
        };
        if delta < ctx.settings.min_scale_step || delta > ctx.settings.max_scale_step {
            log::debug!("Rejecting scale step {:.3}", delta);
            return;
        }
        match self.target {
            GestureTarget::Layer(id) => {
                let mut changed = false;
                ctx.store.mutate(id, |layer| {
                    let next = clamp_scale(layer.scale * delta);
                    changed = next != layer.scale;
                    layer.scale = next;
                });
                out.layers_changed |= changed;
            }
            GestureTarget::Viewport => {
                out.viewport_changed |= ctx.viewport.zoom_by(delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_guards_zero_baseline() {
        let mut session = ScaleSession::new(GestureTarget::Viewport);
        assert_eq!(session.advance(0.0), Some(0.0));
        assert_eq!(session.advance(1.2), Some(1.2));
        assert_eq!(session.advance(f64::NAN), None);
        assert_eq!(session.advance(2.4), Some(2.0));
    }
}
