//! Fire-and-forget feedback signals (haptics, notifications).
//!
//! The shell implements [`FeedbackSink`]. Sink failures are logged and never
//! affect editor state.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

/// A single feedback signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    /// Selection changed.
    Selection,
    Impact(ImpactStyle),
    Notification(NotificationKind),
}

/// Error type for feedback sinks.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Feedback device unavailable")]
    Unavailable,
    #[error("Feedback error: {0}")]
    Other(String),
}

/// Receiver of feedback signals.
pub trait FeedbackSink {
    fn emit(&mut self, feedback: Feedback) -> Result<(), FeedbackError>;
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn emit(&mut self, _feedback: Feedback) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Sink that records every signal. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    log: Rc<RefCell<Vec<Feedback>>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far.
    pub fn recorded(&self) -> Vec<Feedback> {
        self.log.borrow().clone()
    }

    /// Drain and return everything emitted so far.
    pub fn take(&self) -> Vec<Feedback> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

impl FeedbackSink for RecordingFeedback {
    fn emit(&mut self, feedback: Feedback) -> Result<(), FeedbackError> {
        self.log.borrow_mut().push(feedback);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_clones_share_log() {
        let recorder = RecordingFeedback::new();
        let mut sink: Box<dyn FeedbackSink> = Box::new(recorder.clone());
        sink.emit(Feedback::Selection).unwrap();
        sink.emit(Feedback::Impact(ImpactStyle::Heavy)).unwrap();

        assert_eq!(
            recorder.take(),
            vec![Feedback::Selection, Feedback::Impact(ImpactStyle::Heavy)]
        );
        assert!(recorder.recorded().is_empty());
    }

    #[test]
    fn test_feedback_serializes_snake_case() {
        let json = serde_json::to_string(&Feedback::Notification(NotificationKind::Warning)).unwrap();
        assert_eq!(json, r#"{"notification":"warning"}"#);
    }
}
