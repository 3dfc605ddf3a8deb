// src/error.rs
// Standardized error types for the mover bridge

use thiserror::Error;

/// Main error type for the unity-mover library
#[derive(Error, Debug)]
pub enum MoverError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("transport error: {0}")]
    Transport(#[from] rumqttc::ClientError),

    #[error("malformed feedback: {0}")]
    MalformedFeedback(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown error: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Convenience type alias for Result using MoverError
pub type Result<T> = std::result::Result<T, MoverError>;

impl MoverError {
    /// Convert to user-facing string for MCP tool boundaries
    pub fn to_user_string(&self) -> String {
        self.to_string()
    }
}

impl From<String> for MoverError {
    fn from(s: String) -> Self {
        MoverError::Other(s)
    }
}

impl From<MoverError> for String {
    fn from(err: MoverError) -> Self {
        err.to_string()
    }
}
