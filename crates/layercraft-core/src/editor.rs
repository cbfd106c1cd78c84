//! Editor facade: the single entry point used by the application shell.
//!
//! The editor owns the layer store, gesture interpreter, history and viewport.
//! Every discrete command is bracketed by a history snapshot; gesture sessions
//! record one undo step when they end. Listeners are told what changed after
//! each call, and feedback signals go to a [`FeedbackSink`].

use crate::config::{CanvasConfig, EngineSettings};
use crate::feedback::{Feedback, FeedbackSink, ImpactStyle, NotificationKind, NullFeedback};
use crate::gesture::{GestureContext, GestureInterpreter, GestureKind, GestureOutcome, GestureSample};
use crate::history::History;
use crate::layer::{ImageSource, Layer, LayerId, LayerKind, StyleUpdate, TextContent, TextEdit};
use crate::sanitize::sanitize_in_place;
use crate::snap::Guideline;
use crate::store::LayerStore;
use crate::viewport::Viewport;
use kurbo::{Affine, Point, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Handle returned by [`Editor::subscribe`].
pub type SubscriptionId = u64;

/// Category of state that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Change {
    Layers,
    Selection,
    Guidelines,
    Viewport,
    History,
}

/// A discrete command that could not be performed.
///
/// Commands addressing an absent layer id are silent no-ops, not errors.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("No layer is selected")]
    NoSelection,
    #[error("Layer {0} is locked or hidden")]
    NotTargetable(LayerId),
    #[error("Layer {0} is not a text layer")]
    NotText(LayerId),
    #[error("Index {index} is out of range for {len} layers")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Consistent read-only copy of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub canvas: CanvasConfig,
    /// Layers back to front.
    pub layers: Vec<Layer>,
    pub selected: Option<LayerId>,
    pub guidelines: Vec<Guideline>,
    pub viewport: Viewport,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl Observation {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

type Listener = Box<dyn FnMut(Change)>;

pub struct Editor {
    config: CanvasConfig,
    settings: EngineSettings,
    store: LayerStore,
    history: History,
    gestures: GestureInterpreter,
    viewport: Viewport,
    feedback: Box<dyn FeedbackSink>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("config", &self.config)
            .field("settings", &self.settings)
            .field("store", &self.store)
            .field("history", &self.history)
            .field("gestures", &self.gestures)
            .field("viewport", &self.viewport)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Editor {
    /// Create an empty editor with default settings.
    pub fn new(config: CanvasConfig) -> Self {
        Self::with_settings(config, EngineSettings::default())
    }

    pub fn with_settings(config: CanvasConfig, settings: EngineSettings) -> Self {
        log::info!(
            "Opening canvas '{}' ({}x{})",
            config.name,
            config.width(),
            config.height()
        );
        Self {
            config,
            settings,
            store: LayerStore::new(),
            history: History::new(settings.history_capacity),
            gestures: GestureInterpreter::new(),
            viewport: Viewport::new(),
            feedback: Box::new(NullFeedback),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Route feedback signals to `sink`.
    pub fn with_feedback(mut self, sink: impl FeedbackSink + 'static) -> Self {
        self.feedback = Box::new(sink);
        self
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Layers back to front.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.store.ordered()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.store.get(id)
    }

    pub fn selected(&self) -> Option<LayerId> {
        self.store.selected()
    }

    pub fn selected_layer(&self) -> Option<&Layer> {
        self.store.selected_layer()
    }

    pub fn guidelines(&self) -> &[Guideline] {
        self.gestures.guidelines()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Canvas-to-screen transform for a container of the given size.
    pub fn viewport_transform(&self, container: Size) -> Affine {
        self.viewport.transform(container, &self.config)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_gesture_active(&self, kind: GestureKind) -> bool {
        self.gestures.is_active(kind)
    }

    /// Rotation to draw for a layer, including the visual-only rotate snap.
    pub fn rendered_rotation(&self, id: LayerId) -> Option<f64> {
        self.gestures
            .rendered_rotation(&self.store, id, self.settings.rotation_snap_threshold)
    }

    pub fn observe(&self) -> Observation {
        Observation {
            canvas: self.config.clone(),
            layers: self.store.to_vec(),
            selected: self.store.selected(),
            guidelines: self.gestures.guidelines().to_vec(),
            viewport: self.viewport,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }

    /// Register a change listener.
    pub fn subscribe(&mut self, listener: impl FnMut(Change) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: Change) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(change);
        }
    }

    fn emit(&mut self, feedback: Feedback) {
        if let Err(e) = self.feedback.emit(feedback) {
            log::warn!("Feedback sink failed: {}", e);
        }
    }

    fn fail(&mut self, error: CommandError) -> CommandError {
        log::debug!("Command rejected: {}", error);
        self.emit(Feedback::Notification(NotificationKind::Error));
        error
    }

    /// Bookkeeping after a discrete mutation while gestures may be in flight.
    fn after_discrete(&mut self) {
        self.history.refresh_checkpoint(&self.store);
        self.gestures.reset_baselines();
    }

    fn set_selection(&mut self, id: Option<LayerId>) -> bool {
        let changed = self.store.select(id);
        if changed {
            self.emit(Feedback::Selection);
            self.notify(Change::Selection);
        }
        changed
    }

    // --- Selection ---

    /// Select a layer, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<LayerId>) -> Result<(), CommandError> {
        if let Some(id) = id {
            let Some(layer) = self.store.get(id) else {
                log::debug!("Ignoring selection of absent layer {}", id);
                return Ok(());
            };
            if !layer.is_targetable() {
                return Err(self.fail(CommandError::NotTargetable(id)));
            }
        }
        self.set_selection(id);
        Ok(())
    }

    /// Select the front-most targetable layer under a canvas point.
    /// Tapping empty canvas clears the selection.
    pub fn tap(&mut self, point: Point) -> Option<LayerId> {
        let hit = self.store.layer_at(point, 0.0);
        self.set_selection(hit);
        hit
    }

    // --- Structural commands ---

    /// Add a layer centered on the canvas and select it.
    pub fn add_layer(&mut self, kind: LayerKind) -> LayerId {
        self.history.snapshot(&self.store);
        let name = format!("{} {}", kind.label(), self.store.len() + 1);
        let layer = Layer::new(name, kind, self.config.center());
        let id = layer.id();
        log::info!("Adding layer '{}' ({})", layer.name, id);
        self.store.insert(layer);
        self.store.select(Some(id));
        self.after_discrete();

        self.emit(Feedback::Notification(NotificationKind::Success));
        self.notify(Change::Layers);
        self.notify(Change::Selection);
        self.notify(Change::History);
        id
    }

    pub fn add_image_layer(&mut self, source: ImageSource) -> LayerId {
        self.add_layer(LayerKind::Image(source))
    }

    pub fn add_text_layer(&mut self, content: TextContent) -> LayerId {
        self.add_layer(LayerKind::Text(content))
    }

    /// Copy the selected layer on top of the stack and select the copy.
    pub fn duplicate_selected(&mut self) -> Result<LayerId, CommandError> {
        let Some(source) = self.store.selected_layer() else {
            return Err(self.fail(CommandError::NoSelection));
        };
        let copy = source.duplicate();
        let id = copy.id();

        self.history.snapshot(&self.store);
        self.store.insert(copy);
        self.store.select(Some(id));
        self.after_discrete();

        self.emit(Feedback::Notification(NotificationKind::Success));
        self.notify(Change::Layers);
        self.notify(Change::Selection);
        self.notify(Change::History);
        Ok(id)
    }

    pub fn delete_selected(&mut self) -> Result<(), CommandError> {
        let Some(id) = self.store.selected() else {
            return Err(self.fail(CommandError::NoSelection));
        };
        self.delete_layer(id)
    }

    pub fn delete_layer(&mut self, id: LayerId) -> Result<(), CommandError> {
        if !self.store.contains(id) {
            log::debug!("Ignoring delete of absent layer {}", id);
            return Ok(());
        }
        let was_selected = self.store.selected() == Some(id);

        self.history.snapshot(&self.store);
        self.store.remove(id);
        self.after_discrete();

        self.emit(Feedback::Notification(NotificationKind::Warning));
        self.notify(Change::Layers);
        if was_selected {
            self.notify(Change::Selection);
        }
        self.notify(Change::History);
        Ok(())
    }

    /// Move the layer at z-index `from` to z-index `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), CommandError> {
        let len = self.store.len();
        for index in [from, to] {
            if index >= len {
                return Err(self.fail(CommandError::IndexOutOfRange { index, len }));
            }
        }
        if from == to {
            return Ok(());
        }

        self.history.snapshot(&self.store);
        self.store.reorder(from, to);
        self.after_discrete();

        self.emit(Feedback::Impact(ImpactStyle::Medium));
        self.notify(Change::Layers);
        self.notify(Change::History);
        Ok(())
    }

    /// Lock or unlock a layer. Locking the selected layer deselects it.
    pub fn set_locked(&mut self, id: LayerId, locked: bool) -> Result<(), CommandError> {
        match self.store.get(id) {
            Some(layer) if layer.is_locked != locked => {}
            _ => return Ok(()),
        }
        self.history.snapshot(&self.store);
        self.store.mutate(id, |layer| layer.is_locked = locked);
        let deselect = locked && self.store.selected() == Some(id);
        if deselect {
            self.store.select(None);
        }
        self.after_discrete();

        self.emit(Feedback::Impact(ImpactStyle::Medium));
        self.notify(Change::Layers);
        if deselect {
            self.notify(Change::Selection);
        }
        self.notify(Change::History);
        Ok(())
    }

    /// Show or hide a layer. Hiding the selected layer deselects it.
    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> Result<(), CommandError> {
        match self.store.get(id) {
            Some(layer) if layer.is_visible != visible => {}
            _ => return Ok(()),
        }
        self.history.snapshot(&self.store);
        self.store.mutate(id, |layer| layer.is_visible = visible);
        let deselect = !visible && self.store.selected() == Some(id);
        if deselect {
            self.store.select(None);
        }
        self.after_discrete();

        self.emit(Feedback::Impact(ImpactStyle::Light));
        self.notify(Change::Layers);
        if deselect {
            self.notify(Change::Selection);
        }
        self.notify(Change::History);
        Ok(())
    }

    /// Apply a partial style change, then sanitize.
    pub fn update_style(&mut self, id: LayerId, update: &StyleUpdate) -> Result<(), CommandError> {
        let Some(layer) = self.store.get(id) else {
            log::debug!("Ignoring style update of absent layer {}", id);
            return Ok(());
        };
        if update.text.is_some() && !layer.is_text() {
            return Err(self.fail(CommandError::NotText(id)));
        }
        if update.is_empty() {
            return Ok(());
        }
        self.history.snapshot(&self.store);
        self.apply_and_sanitize(id, |layer| update.apply(layer));
        self.after_discrete();

        self.notify(Change::Layers);
        self.notify(Change::History);
        Ok(())
    }

    /// Commit an edit made in the text editor chrome.
    pub fn commit_text_edit(&mut self, id: LayerId, edit: &TextEdit) -> Result<(), CommandError> {
        let Some(layer) = self.store.get(id) else {
            log::debug!("Ignoring text edit of absent layer {}", id);
            return Ok(());
        };
        if !layer.is_text() {
            return Err(self.fail(CommandError::NotText(id)));
        }
        self.history.snapshot(&self.store);
        self.apply_and_sanitize(id, |layer| {
            if let LayerKind::Text(text) = &mut layer.kind {
                text.apply(edit);
            }
        });
        self.after_discrete();

        self.emit(Feedback::Notification(NotificationKind::Success));
        self.notify(Change::Layers);
        self.notify(Change::History);
        Ok(())
    }

    fn apply_and_sanitize(&mut self, id: LayerId, f: impl FnOnce(&mut Layer)) {
        let canvas = &self.config;
        self.store.mutate(id, |layer| {
            f(layer);
            sanitize_in_place(layer, canvas);
        });
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        let selected = self.store.selected();
        if !self.history.undo(&mut self.store) {
            return false;
        }
        log::debug!("Undo ({} left)", self.history.undo_len());
        self.after_restore(selected);
        true
    }

    pub fn redo(&mut self) -> bool {
        let selected = self.store.selected();
        if !self.history.redo(&mut self.store) {
            return false;
        }
        log::debug!("Redo ({} left)", self.history.redo_len());
        self.after_restore(selected);
        true
    }

    fn after_restore(&mut self, previous_selection: Option<LayerId>) {
        self.after_discrete();
        self.emit(Feedback::Impact(ImpactStyle::Light));
        self.notify(Change::Layers);
        if self.store.selected() != previous_selection {
            self.notify(Change::Selection);
        }
        self.notify(Change::History);
    }

    // --- Gestures ---

    fn gesture_context(&mut self) -> (GestureContext<'_>, &mut GestureInterpreter) {
        (
            GestureContext {
                store: &mut self.store,
                history: &mut self.history,
                viewport: &mut self.viewport,
                canvas: &self.config,
                settings: &self.settings,
            },
            &mut self.gestures,
        )
    }

    /// Feed one sample from the platform recognizer.
    pub fn on_gesture_update(&mut self, sample: GestureSample) {
        let (mut ctx, gestures) = self.gesture_context();
        let outcome = gestures.update(sample, &mut ctx);
        self.apply_outcome(outcome);
    }

    /// End the session of `kind`. Ending an idle kind is a no-op.
    pub fn on_gesture_end(&mut self, kind: GestureKind) {
        let (mut ctx, gestures) = self.gesture_context();
        let outcome = gestures.end(kind, &mut ctx);
        self.apply_outcome(outcome);
    }

    fn apply_outcome(&mut self, outcome: GestureOutcome) {
        for feedback in outcome.feedback {
            self.emit(feedback);
        }
        if outcome.layers_changed {
            self.notify(Change::Layers);
        }
        if outcome.guidelines_changed {
            self.notify(Change::Guidelines);
        }
        if outcome.viewport_changed {
            self.notify(Change::Viewport);
        }
        if outcome.history_changed {
            self.notify(Change::History);
        }
    }

    /// Restore the viewport to scale 1.0 and zero offset.
    pub fn reset_viewport(&mut self) {
        if self.viewport.is_identity() {
            return;
        }
        self.viewport.reset();
        self.notify(Change::Viewport);
    }
}
