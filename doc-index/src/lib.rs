//! # Document Index
//!
//! Service wiring for the document index client.
//!
//! This crate reads configuration from the environment, sets up logging, and
//! builds the OpenSearch engine and `DocIndexClient` an application embeds.

pub mod config;
pub mod telemetry;

pub use config::{Dependencies, ServiceSettings};
pub use telemetry::LogFormat;

use doc_index_repository::{DocIndexError, EngineError};
use doc_index_shared::ResultEnvelope;
use thiserror::Error;

/// Errors that can occur during service initialization.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Engine client setup error.
    #[error("Engine error: {0}")]
    EngineError(#[from] EngineError),

    /// Document index error.
    #[error("Document index error: {0}")]
    DocIndexError(#[from] DocIndexError),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<&ServiceError> for ResultEnvelope {
    fn from(err: &ServiceError) -> Self {
        match err {
            ServiceError::DocIndexError(inner) => ResultEnvelope::from(inner),
            other => ResultEnvelope::internal(other.to_string()),
        }
    }
}
