//! Layercraft Application
//!
//! Headless shell that drives the editor from a JSON script of gesture samples
//! and commands, standing in for a platform gesture recognizer.

mod error;
mod replay;
mod script;

pub use error::AppError;
pub use replay::{ReplayReport, replay};
pub use script::{Script, Step};
