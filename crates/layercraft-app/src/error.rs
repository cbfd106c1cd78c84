use thiserror::Error;

/// Shell errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Script error: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Usage: {0}")]
    Usage(String),
    #[error("Step {step}: no layer at index {index}")]
    MissingLayer { step: usize, index: usize },
}
