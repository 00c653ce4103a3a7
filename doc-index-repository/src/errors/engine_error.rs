//! Engine error types.
//!
//! This module defines the errors an `EngineClient` reports for a single wire call.

use thiserror::Error;

/// Errors that can occur while talking to the search engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Failed to reach the engine or the transport broke mid-request.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The index or document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A concurrent write won the race, or a create hit an existing id.
    #[error("Version conflict: {0}")]
    VersionConflict(String),

    /// The index being created already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Any other non-success status.
    #[error("Engine returned status {status}: {body}")]
    StatusError { status: u16, body: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl EngineError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a version conflict error.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::VersionConflict(msg.into())
    }

    /// Create an already exists error.
    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    /// Create a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::StatusError {
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}

impl From<opensearch::Error> for EngineError {
    fn from(err: opensearch::Error) -> Self {
        Self::ConnectionError(err.to_string())
    }
}
