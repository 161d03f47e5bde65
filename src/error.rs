//! Error types for unstuck-core.

use thiserror::Error;

/// Result type alias using unstuck-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during dialogue orchestration.
#[derive(Error, Debug)]
pub enum Error {
    /// Input was empty or whitespace-only; never enters classification
    #[error("empty input: a turn must contain at least one visible character")]
    EmptyInput,

    /// Rule configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A snapshot could not be applied to the session
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a snapshot error.
    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::Snapshot(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
