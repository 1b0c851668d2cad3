//! Core error types for the Loopscene engine.

/// A specialized Result type for Loopscene operations.
pub type LoopsceneResult<T> = Result<T, LoopsceneError>;

/// Top-level error type encompassing all Loopscene subsystems.
#[derive(Debug, thiserror::Error)]
pub enum LoopsceneError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("placement conflict: {0}")]
    Placement(String),

    #[error("compose error: {0}")]
    Compose(String),

    #[error("upload error: {0}")]
    Upload(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("export error ({status}): {detail}")]
    Export { status: String, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl LoopsceneError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        LoopsceneError::Validation(message.into())
    }

    /// Create a placement-conflict error.
    pub fn placement(message: impl Into<String>) -> Self {
        LoopsceneError::Placement(message.into())
    }

    /// Create an export error carrying the collaborator's status and diagnostic.
    pub fn export(status: impl Into<String>, detail: impl Into<String>) -> Self {
        LoopsceneError::Export {
            status: status.into(),
            detail: detail.into(),
        }
    }
}
