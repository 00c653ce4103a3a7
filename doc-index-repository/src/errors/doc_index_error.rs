//! Document index error types.
//!
//! Only conditions the client cannot absorb into an outcome end up here: broken
//! transport, unexpected engine replies, rejected search targets and batches over
//! the configured limit.

use thiserror::Error;

use super::EngineError;

/// Errors returned by `DocIndexClient` operations.
#[derive(Debug, Clone, Error)]
pub enum DocIndexError {
    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The engine rejected the request in a way no outcome covers.
    #[error("Engine error: {0}")]
    EngineError(String),

    /// Failed to parse an engine response.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The request was rejected before reaching the engine.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Batch size exceeds configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },
}

impl DocIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }
}

impl From<EngineError> for DocIndexError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::ConnectionError(msg) => Self::ConnectionError(msg),
            EngineError::ParseError(msg) => Self::ParseError(msg),
            other => Self::EngineError(other.to_string()),
        }
    }
}
