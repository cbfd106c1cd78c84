//! Continuous gesture interpretation.
//!
//! Drag, scale and rotate each run as an independent session that may overlap
//! in time with the others. A session binds its target when it starts: the
//! selected layer if it is targetable, the viewport otherwise.

mod drag;
mod rotate;
mod scale;

use crate::config::{CanvasConfig, EngineSettings};
use crate::feedback::{Feedback, ImpactStyle};
use crate::history::History;
use crate::layer::LayerId;
use crate::sanitize::sanitize_in_place;
use crate::snap::{Guideline, snap_rotation};
use crate::store::LayerStore;
use crate::viewport::Viewport;
use drag::DragSession;
use kurbo::Vec2;
use rotate::RotateSession;
use scale::ScaleSession;
use serde::{Deserialize, Serialize};

/// Kind of continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Drag,
    Scale,
    Rotate,
}

/// One update from the platform recognizer. Values are cumulative since the gesture began.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureSample {
    Drag { translation: Vec2 },
    Scale { factor: f64 },
    Rotate { degrees: f64 },
}

impl GestureSample {
    pub fn kind(&self) -> GestureKind {
        match self {
            GestureSample::Drag { .. } => GestureKind::Drag,
            GestureSample::Scale { .. } => GestureKind::Scale,
            GestureSample::Rotate { .. } => GestureKind::Rotate,
        }
    }
}

/// What a session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureTarget {
    Layer(LayerId),
    Viewport,
}

impl GestureTarget {
    pub fn layer(&self) -> Option<LayerId> {
        match self {
            GestureTarget::Layer(id) => Some(*id),
            GestureTarget::Viewport => None,
        }
    }
}

/// Mutable editor state a gesture may touch.
pub(crate) struct GestureContext<'a> {
    pub store: &'a mut LayerStore,
    pub history: &'a mut History,
    pub viewport: &'a mut Viewport,
    pub canvas: &'a CanvasConfig,
    pub settings: &'a EngineSettings,
}

/// What changed during one interpreter call.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct GestureOutcome {
    pub layers_changed: bool,
    pub viewport_changed: bool,
    pub guidelines_changed: bool,
    pub history_changed: bool,
    pub feedback: Vec<Feedback>,
}

/// Per-kind gesture state machines plus the cross-session re-anchor flag.
#[derive(Debug, Default)]
pub struct GestureInterpreter {
    drag: Option<DragSession>,
    scale: Option<ScaleSession>,
    rotate: Option<RotateSession>,
    reanchor_drag: bool,
    guidelines: Vec<Guideline>,
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guidelines published by the active drag.
    pub fn guidelines(&self) -> &[Guideline] {
        &self.guidelines
    }

    pub fn is_active(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::Drag => self.drag.is_some(),
            GestureKind::Scale => self.scale.is_some(),
            GestureKind::Rotate => self.rotate.is_some(),
        }
    }

    pub fn is_any_active(&self) -> bool {
        self.drag.is_some() || self.scale.is_some() || self.rotate.is_some()
    }

    /// Target bound by the active session of `kind`.
    pub fn target(&self, kind: GestureKind) -> Option<GestureTarget> {
        match kind {
            GestureKind::Drag => self.drag.as_ref().map(|s| s.target),
            GestureKind::Scale => self.scale.as_ref().map(|s| s.target),
            GestureKind::Rotate => self.rotate.as_ref().map(|s| s.target),
        }
    }

    /// Force the active drag to re-baseline on its next update.
    pub fn reset_baselines(&mut self) {
        self.reanchor_drag = true;
    }

    /// Rotation to render for a layer: snapped visually while a rotate session
    /// is near a canonical angle, the stored value otherwise.
    pub fn rendered_rotation(&self, store: &LayerStore, id: LayerId, threshold: f64) -> Option<f64> {
        let stored = store.get(id)?.rotation;
        let rotating = self
            .rotate
            .as_ref()
            .is_some_and(|s| s.target == GestureTarget::Layer(id));
        if rotating {
            Some(snap_rotation(stored, threshold).unwrap_or(stored))
        } else {
            Some(stored)
        }
    }

    fn layer_sessions(&self) -> usize {
        [
            self.drag.as_ref().map(|s| s.target),
            self.scale.as_ref().map(|s| s.target),
            self.rotate.as_ref().map(|s| s.target),
        ]
        .into_iter()
        .filter(|t| matches!(t, Some(GestureTarget::Layer(_))))
        .count()
    }

    fn bind_target(&self, ctx: &mut GestureContext<'_>) -> GestureTarget {
        let target = match ctx.store.selected_layer() {
            Some(layer) if layer.is_targetable() => GestureTarget::Layer(layer.id()),
            _ => GestureTarget::Viewport,
        };
        if matches!(target, GestureTarget::Layer(_)) && self.layer_sessions() == 0 {
            ctx.history.checkpoint(ctx.store);
        }
        log::debug!("Gesture session bound to {:?}", target);
        target
    }

    pub(crate) fn update(&mut self, sample: GestureSample, ctx: &mut GestureContext<'_>) -> GestureOutcome {
        let mut out = GestureOutcome::default();
        match sample {
            GestureSample::Drag { translation } => self.update_drag(translation, ctx, &mut out),
            GestureSample::Scale { factor } => {
                if self.scale.is_none() {
                    let target = self.bind_target(ctx);
                    self.scale = Some(ScaleSession::new(target));
                }
                if let Some(session) = self.scale.as_mut() {
                    session.update(factor, ctx, &mut out);
                }
            }
            GestureSample::Rotate { degrees } => {
                if self.rotate.is_none() {
                    let target = self.bind_target(ctx);
                    self.rotate = Some(RotateSession::new(target));
                }
                if let Some(session) = self.rotate.as_mut() {
                    session.update(degrees, ctx, &mut out);
                }
            }
        }
        out
    }

    fn update_drag(&mut self, translation: Vec2, ctx: &mut GestureContext<'_>, out: &mut GestureOutcome) {
        if self.drag.is_none() {
            let target = self.bind_target(ctx);
            self.drag = Some(DragSession::new(target));
        }
        if !translation.is_finite() {
            log::trace!("Dropping non-finite drag sample");
            return;
        }
        let reanchor = std::mem::take(&mut self.reanchor_drag);
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        if let Some(guidelines) = session.update(translation, reanchor, ctx, out) {
            if guidelines != self.guidelines {
                self.guidelines = guidelines;
                out.guidelines_changed = true;
            }
        }
    }

    pub(crate) fn end(&mut self, kind: GestureKind, ctx: &mut GestureContext<'_>) -> GestureOutcome {
        let mut out = GestureOutcome::default();
        match kind {
            GestureKind::Drag => {
                let Some(session) = self.drag.take() else {
                    return out;
                };
                if !self.guidelines.is_empty() {
                    self.guidelines.clear();
                    out.guidelines_changed = true;
                }
                if let GestureTarget::Layer(id) = session.target {
                    self.finish_layer_session(id, ctx, &mut out);
                }
            }
            GestureKind::Scale => {
                let Some(session) = self.scale.take() else {
                    return out;
                };
                if let GestureTarget::Layer(id) = session.target {
                    self.finish_layer_session(id, ctx, &mut out);
                    self.reanchor_drag = true;
                    out.feedback.push(Feedback::Impact(ImpactStyle::Light));
                }
            }
            GestureKind::Rotate => {
                let Some(session) = self.rotate.take() else {
                    return out;
                };
                if let GestureTarget::Layer(id) = session.target {
                    session.hard_snap(id, ctx, &mut out);
                    self.finish_layer_session(id, ctx, &mut out);
                    self.reanchor_drag = true;
                    out.feedback.push(Feedback::Impact(ImpactStyle::Light));
                }
            }
        }
        if !self.is_any_active() {
            self.reanchor_drag = false;
        }
        out
    }

    /// Sanitize the layer, then record the session as one undo step.
    ///
    /// The caller has already removed the ending session.
    fn finish_layer_session(&mut self, id: LayerId, ctx: &mut GestureContext<'_>, out: &mut GestureOutcome) {
        let canvas = ctx.canvas;
        let mut repaired = false;
        ctx.store.mutate(id, |layer| repaired = sanitize_in_place(layer, canvas));
        if repaired {
            out.layers_changed = true;
        }
        if ctx.history.commit_checkpoint(ctx.store) {
            out.history_changed = true;
            log::debug!("Recorded gesture on layer {}", id);
        }
        if self.layer_sessions() > 0 {
            ctx.history.checkpoint(ctx.store);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{ImageHandle, ImageSource, Layer};
    use crate::snap::GuideAxis;
    use kurbo::Point;

    struct Harness {
        store: LayerStore,
        history: History,
        viewport: Viewport,
        canvas: CanvasConfig,
        settings: EngineSettings,
        gestures: GestureInterpreter,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                store: LayerStore::new(),
                history: History::default(),
                viewport: Viewport::new(),
                canvas: CanvasConfig::new("test", 1080.0, 1080.0).unwrap(),
                settings: EngineSettings::default(),
                gestures: GestureInterpreter::new(),
            }
        }

        fn add_selected(&mut self, position: Point) -> LayerId {
            let layer = Layer::image("Image 1", ImageSource::new(ImageHandle::new(), 100, 100), position);
            let id = layer.id();
            self.store.insert(layer);
            self.store.select(Some(id));
            id
        }

        fn update(&mut self, sample: GestureSample) -> GestureOutcome {
            let mut ctx = GestureContext {
                store: &mut self.store,
                history: &mut self.history,
                viewport: &mut self.viewport,
                canvas: &self.canvas,
                settings: &self.settings,
            };
            self.gestures.update(sample, &mut ctx)
        }

        fn end(&mut self, kind: GestureKind) -> GestureOutcome {
            let mut ctx = GestureContext {
                store: &mut self.store,
                history: &mut self.history,
                viewport: &mut self.viewport,
                canvas: &self.canvas,
                settings: &self.settings,
            };
            self.gestures.end(kind, &mut ctx)
        }

        fn drag(&mut self, x: f64, y: f64) -> GestureOutcome {
            self.update(GestureSample::Drag {
                translation: Vec2::new(x, y),
            })
        }

        fn position(&self, id: LayerId) -> Point {
            self.store.get(id).map(|l| l.position).unwrap()
        }
    }

    #[test]
    fn test_first_drag_sample_only_anchors() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.drag(40.0, 40.0);
        assert_eq!(h.position(id), Point::new(100.0, 100.0));
        h.drag(45.0, 43.0);
        assert_eq!(h.position(id), Point::new(105.0, 103.0));
    }

    #[test]
    fn test_drag_snaps_to_center_and_records_undo() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(540.0, 540.0));

        h.drag(0.0, 0.0);
        let out = h.drag(6.0, 10.0);
        assert_eq!(h.position(id), Point::new(540.0, 550.0));
        assert_eq!(h.gestures.guidelines(), &[Guideline::vertical(540.0)]);
        assert_eq!(h.gestures.guidelines()[0].axis, GuideAxis::Vertical);
        assert!(out.guidelines_changed);

        let out = h.end(GestureKind::Drag);
        assert!(h.gestures.guidelines().is_empty());
        assert!(out.history_changed);
        assert!(out.feedback.is_empty());

        assert!(h.history.undo(&mut h.store));
        assert_eq!(h.position(id), Point::new(540.0, 540.0));
    }

    #[test]
    fn test_snap_feedback_is_edge_triggered() {
        let mut h = Harness::new();
        h.add_selected(Point::new(500.0, 100.0));
        h.drag(0.0, 0.0);
        let entering = h.drag(38.0, 0.0);
        assert_eq!(entering.feedback, vec![Feedback::Impact(ImpactStyle::Medium)]);
        let holding = h.drag(39.0, 0.0);
        assert!(holding.feedback.is_empty());
        h.drag(80.0, 0.0);
        let again = h.drag(41.0, 0.0);
        assert_eq!(again.feedback, vec![Feedback::Impact(ImpactStyle::Medium)]);
    }

    #[test]
    fn test_jump_rejection_then_reanchor() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.drag(0.0, 0.0);
        h.drag(10.0, 0.0);
        assert_eq!(h.position(id), Point::new(110.0, 100.0));

        h.drag(510.0, 0.0);
        assert_eq!(h.position(id), Point::new(110.0, 100.0));

        h.drag(520.0, 0.0);
        assert_eq!(h.position(id), Point::new(120.0, 100.0));
    }

    #[test]
    fn test_non_finite_drag_sample_dropped() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.drag(0.0, 0.0);
        h.drag(f64::NAN, 3.0);
        assert_eq!(h.position(id), Point::new(100.0, 100.0));
        h.drag(5.0, 0.0);
        assert_eq!(h.position(id), Point::new(105.0, 100.0));
    }

    #[test]
    fn test_drag_clamped_to_overscan() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.drag(0.0, 0.0);
        let mut x = 0.0;
        while x > -2000.0 {
            x -= 250.0;
            h.drag(x, 0.0);
        }
        assert_eq!(h.position(id).x, -1080.0);
    }

    #[test]
    fn test_drag_back_after_overscan_moves_immediately() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.drag(0.0, 0.0);
        for step in 1..=6 {
            h.drag(-250.0 * step as f64, 0.0);
        }
        assert_eq!(h.position(id), Point::new(-1080.0, 100.0));

        h.drag(-1250.0, 0.0);
        assert_eq!(h.position(id), Point::new(-830.0, 100.0));
    }

    #[test]
    fn test_scale_step_limits_and_clamp() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.update(GestureSample::Scale { factor: 1.2 });
        assert!((h.store.get(id).unwrap().scale - 1.2).abs() < 1e-12);

        // 1.2 -> 3.0 is a 2.5x step: rejected but re-baselined.
        h.update(GestureSample::Scale { factor: 3.0 });
        assert!((h.store.get(id).unwrap().scale - 1.2).abs() < 1e-12);
        h.update(GestureSample::Scale { factor: 3.3 });
        assert!((h.store.get(id).unwrap().scale - 1.32).abs() < 1e-12);

        let mut factor = 3.3;
        for _ in 0..40 {
            factor *= 1.4;
            h.update(GestureSample::Scale { factor });
        }
        assert!((h.store.get(id).unwrap().scale - 10.0).abs() < f64::EPSILON);

        let out = h.end(GestureKind::Scale);
        assert_eq!(out.feedback, vec![Feedback::Impact(ImpactStyle::Light)]);
        assert!(out.history_changed);
    }

    #[test]
    fn test_scale_end_reanchors_concurrent_drag() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.drag(0.0, 0.0);
        h.drag(10.0, 0.0);
        h.update(GestureSample::Scale { factor: 1.1 });
        h.end(GestureKind::Scale);

        // The recognizer perturbs the drag baseline; this sample only re-anchors.
        h.drag(60.0, 0.0);
        assert_eq!(h.position(id), Point::new(110.0, 100.0));
        h.drag(65.0, 0.0);
        assert_eq!(h.position(id), Point::new(115.0, 100.0));
    }

    #[test]
    fn test_reanchor_survives_non_finite_sample() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.drag(0.0, 0.0);
        h.drag(10.0, 0.0);
        h.update(GestureSample::Scale { factor: 1.1 });
        h.end(GestureKind::Scale);

        h.drag(f64::NAN, 0.0);
        h.drag(60.0, 0.0);
        assert_eq!(h.position(id), Point::new(110.0, 100.0));
        h.drag(65.0, 0.0);
        assert_eq!(h.position(id), Point::new(115.0, 100.0));
    }

    #[test]
    fn test_each_session_end_is_one_undo_step() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.drag(0.0, 0.0);
        h.drag(10.0, 0.0);
        h.update(GestureSample::Scale { factor: 1.1 });
        h.end(GestureKind::Scale);
        h.drag(60.0, 0.0);
        h.drag(70.0, 0.0);
        h.end(GestureKind::Drag);
        assert_eq!(h.history.undo_len(), 2);

        h.history.undo(&mut h.store);
        let layer = h.store.get(id).unwrap();
        assert_eq!(layer.position, Point::new(110.0, 100.0));
        assert!((layer.scale - 1.1).abs() < 1e-12);

        h.history.undo(&mut h.store);
        let layer = h.store.get(id).unwrap();
        assert_eq!(layer.position, Point::new(100.0, 100.0));
        assert!((layer.scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotation_hard_snap_on_end() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        for degrees in [30.0, 60.0, 88.0] {
            h.update(GestureSample::Rotate { degrees });
        }
        assert_eq!(h.store.get(id).unwrap().rotation, 88.0);
        assert_eq!(h.gestures.rendered_rotation(&h.store, id, 5.0), Some(90.0));

        h.end(GestureKind::Rotate);
        assert_eq!(h.store.get(id).unwrap().rotation, 90.0);
        assert_eq!(h.gestures.rendered_rotation(&h.store, id, 5.0), Some(90.0));
    }

    #[test]
    fn test_rotation_without_snap_keeps_raw_angle() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        for degrees in [40.0, 80.0] {
            h.update(GestureSample::Rotate { degrees });
        }
        h.end(GestureKind::Rotate);
        assert_eq!(h.store.get(id).unwrap().rotation, 80.0);
    }

    #[test]
    fn test_rotation_rejects_large_steps() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.update(GestureSample::Rotate { degrees: 20.0 });
        h.update(GestureSample::Rotate { degrees: 120.0 });
        assert_eq!(h.store.get(id).unwrap().rotation, 20.0);
        h.update(GestureSample::Rotate { degrees: 130.0 });
        assert_eq!(h.store.get(id).unwrap().rotation, 30.0);
    }

    #[test]
    fn test_rotation_proximity_feedback() {
        let mut h = Harness::new();
        h.add_selected(Point::new(100.0, 100.0));
        let near_zero = h.update(GestureSample::Rotate { degrees: 2.0 });
        assert_eq!(near_zero.feedback, vec![Feedback::Impact(ImpactStyle::Heavy)]);
        let still_near = h.update(GestureSample::Rotate { degrees: 3.0 });
        assert!(still_near.feedback.is_empty());
        let away = h.update(GestureSample::Rotate { degrees: 30.0 });
        assert!(away.feedback.is_empty());
    }

    #[test]
    fn test_no_selection_drives_viewport() {
        let mut h = Harness::new();
        let out = h.drag(15.0, -5.0);
        assert!(out.viewport_changed);
        assert_eq!(h.viewport.offset, Vec2::new(15.0, -5.0));
        h.drag(20.0, -5.0);
        assert_eq!(h.viewport.offset, Vec2::new(20.0, -5.0));

        h.update(GestureSample::Scale { factor: 1.4 });
        assert!((h.viewport.scale - 1.4).abs() < 1e-12);
        assert_eq!(h.gestures.target(GestureKind::Scale), Some(GestureTarget::Viewport));

        h.end(GestureKind::Drag);
        h.end(GestureKind::Scale);
        assert!(!h.history.can_undo());
    }

    #[test]
    fn test_locked_selection_falls_through_to_viewport() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.store.mutate(id, |l| l.is_locked = true);
        h.drag(0.0, 0.0);
        h.drag(30.0, 0.0);
        assert_eq!(h.position(id), Point::new(100.0, 100.0));
        assert_eq!(h.viewport.offset, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn test_unended_session_keeps_last_state() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.drag(0.0, 0.0);
        h.drag(25.0, 25.0);
        assert!(h.gestures.is_active(GestureKind::Drag));
        assert_eq!(h.position(id), Point::new(125.0, 125.0));
        assert!(!h.history.can_undo());
    }

    #[test]
    fn test_layer_deleted_mid_gesture_is_noop() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.drag(0.0, 0.0);
        h.store.remove(id);
        h.history.refresh_checkpoint(&h.store);
        let out = h.drag(10.0, 0.0);
        assert!(!out.layers_changed);
        let out = h.end(GestureKind::Drag);
        assert!(!out.history_changed);
    }

    #[test]
    fn test_gesture_end_sanitizes_before_recording() {
        let mut h = Harness::new();
        let id = h.add_selected(Point::new(100.0, 100.0));
        h.update(GestureSample::Rotate { degrees: 10.0 });
        h.store.mutate(id, |l| l.scale = f64::NAN);
        h.end(GestureKind::Rotate);
        assert_eq!(h.store.get(id).unwrap().scale, 1.0);
        h.history.undo(&mut h.store);
        h.history.redo(&mut h.store);
        assert_eq!(h.store.get(id).unwrap().scale, 1.0);
    }
}
