//! Script execution.

use crate::{AppError, Script, Step};
use kurbo::{Point, Vec2};
use layercraft_core::{
    Editor, Feedback, GestureSample, ImageHandle, ImageSource, LayerId, Observation, RecordingFeedback, TextContent,
};
use serde::Serialize;

/// Final state after a replay plus every feedback signal emitted on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub observation: Observation,
    pub feedback: Vec<Feedback>,
}

impl ReplayReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn layer_at(editor: &Editor, step: usize, index: usize) -> Result<LayerId, AppError> {
    editor
        .store()
        .at(index)
        .map(|layer| layer.id())
        .ok_or(AppError::MissingLayer { step, index })
}

/// Run every step of `script` against a fresh editor.
///
/// Rejected commands are logged and replay continues, as a user would
/// after a failure notification. Indices that address no layer abort the replay.
pub fn replay(script: &Script) -> Result<ReplayReport, AppError> {
    let recorder = RecordingFeedback::new();
    let mut editor = Editor::with_settings(script.canvas.clone(), script.settings).with_feedback(recorder.clone());

    for (step_index, step) in script.steps.iter().enumerate() {
        log::debug!("Step {}: {:?}", step_index, step);
        let result = match step {
            Step::AddImage { width, height } => {
                editor.add_image_layer(ImageSource::new(ImageHandle::new(), *width, *height));
                Ok(())
            }
            Step::AddText { content } => {
                let text = content.as_deref().map(TextContent::new).unwrap_or_default();
                editor.add_text_layer(text);
                Ok(())
            }
            Step::Select { index } => {
                let id = index.map(|i| layer_at(&editor, step_index, i)).transpose()?;
                editor.select(id)
            }
            Step::Tap { x, y } => {
                editor.tap(Point::new(*x, *y));
                Ok(())
            }
            Step::Drag { x, y } => {
                editor.on_gesture_update(GestureSample::Drag {
                    translation: Vec2::new(*x, *y),
                });
                Ok(())
            }
            Step::Scale { factor } => {
                editor.on_gesture_update(GestureSample::Scale { factor: *factor });
                Ok(())
            }
            Step::Rotate { degrees } => {
                editor.on_gesture_update(GestureSample::Rotate { degrees: *degrees });
                Ok(())
            }
            Step::End { gesture } => {
                editor.on_gesture_end(*gesture);
                Ok(())
            }
            Step::Duplicate => editor.duplicate_selected().map(|_| ()),
            Step::Delete => editor.delete_selected(),
            Step::Reorder { from, to } => editor.reorder(*from, *to),
            Step::SetLocked { index, locked } => {
                let id = layer_at(&editor, step_index, *index)?;
                editor.set_locked(id, *locked)
            }
            Step::SetVisible { index, visible } => {
                let id = layer_at(&editor, step_index, *index)?;
                editor.set_visible(id, *visible)
            }
            Step::Style { index, update } => {
                let id = layer_at(&editor, step_index, *index)?;
                editor.update_style(id, update)
            }
            Step::EditText { index, edit } => {
                let id = layer_at(&editor, step_index, *index)?;
                editor.commit_text_edit(id, edit)
            }
            Step::Undo => {
                editor.undo();
                Ok(())
            }
            Step::Redo => {
                editor.redo();
                Ok(())
            }
            Step::ResetViewport => {
                editor.reset_viewport();
                Ok(())
            }
        };
        if let Err(e) = result {
            log::warn!("Step {} rejected: {}", step_index, e);
        }
    }

    log::info!(
        "Replayed {} steps, {} layers remain",
        script.steps.len(),
        editor.store().len()
    );
    Ok(ReplayReport {
        observation: editor.observe(),
        feedback: recorder.take(),
    })
}
