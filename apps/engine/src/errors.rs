use thiserror::Error;

/// Engine-level error type.
///
/// Only hard failures surface here. Generative-backend trouble inside a
/// recommendation run never does: the run recovers locally and continues
/// content-only with a warning.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
