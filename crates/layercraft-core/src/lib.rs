//! Layercraft Core Library
//!
//! Platform-agnostic layer store, gesture interpreter and undo history for the
//! Layercraft compositing canvas.

pub mod config;
pub mod editor;
pub mod feedback;
pub mod gesture;
pub mod history;
pub mod layer;
pub mod sanitize;
pub mod snap;
pub mod store;
pub mod viewport;

pub use config::{Background, CanvasConfig, ConfigError, EngineSettings};
pub use editor::{Change, CommandError, Editor, Observation, SubscriptionId};
pub use feedback::{Feedback, FeedbackError, FeedbackSink, ImpactStyle, NotificationKind, NullFeedback, RecordingFeedback};
pub use gesture::{GestureInterpreter, GestureKind, GestureSample, GestureTarget};
pub use history::{History, HistoryEntry, MAX_UNDO_HISTORY};
pub use layer::{ImageHandle, ImageSource, Layer, LayerId, LayerKind, SerializableColor, StyleUpdate, TextContent, TextEdit};
pub use sanitize::sanitize;
pub use snap::{GuideAxis, Guideline, SnapResult, SnapState, compute_snap, snap_rotation};
pub use store::LayerStore;
pub use viewport::Viewport;
