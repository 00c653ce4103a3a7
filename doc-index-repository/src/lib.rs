//! # Document Index Repository
//!
//! This crate provides the document index client and the engine it talks to. It
//! includes definitions for errors, the `EngineClient` interface with its wire
//! contract types, a concrete implementation for OpenSearch, and `DocIndexClient`,
//! which validates requests and turns engine answers into typed outcomes.

pub mod client;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use client::DocIndexClient;
pub use config::DocIndexConfig;
pub use errors::{DocIndexError, EngineError};
pub use interfaces::EngineClient;
pub use opensearch::OpenSearchEngine;
pub use types::{
    BatchOperationResult, BatchOperationSummary, BulkItem, DocRef, DocumentOutcome, DroppedItem,
    GetOutcome, IndexOutcome, IndexPresence, MultiGetResult, WriteReport,
};
