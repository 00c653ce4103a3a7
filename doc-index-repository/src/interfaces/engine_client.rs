//! Engine client trait definition.
//!
//! This module defines the abstract interface for the search engine wire calls,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, mocks).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::EngineError;
use crate::interfaces::engine_types::{
    Acknowledgement, BulkRequest, BulkResponse, CreateIndexBody, GetDocumentRequest,
    GetResponse, IndexDocumentRequest, MultiGetRequest, MultiGetResponse, SearchRequest,
    SearchResponse, UpdateDocumentRequest, WriteResponse,
};

/// Abstract interface for search engine operations.
///
/// Each method is exactly one round trip to the cluster. Implementations translate
/// engine statuses into `EngineError` variants so that callers can tell a missing
/// index or document (`NotFound`) and a lost write race (`VersionConflict`) apart from
/// transport failures.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. A single client is shared by every
/// caller without additional locking.
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// Check whether an index exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` / `Ok(false)` - The engine answered
    /// * `Err(EngineError)` - Existence could not be determined
    async fn index_exists(&self, index: &str) -> Result<bool, EngineError>;

    /// Create an index with optional settings and mappings.
    ///
    /// Returns `EngineError::AlreadyExists` if the index is already there.
    async fn create_index(
        &self,
        index: &str,
        body: &CreateIndexBody,
    ) -> Result<Acknowledgement, EngineError>;

    /// Delete an index. Returns `EngineError::NotFound` if it does not exist.
    async fn delete_index(&self, index: &str) -> Result<Acknowledgement, EngineError>;

    /// Open a closed index.
    async fn open_index(&self, index: &str) -> Result<Acknowledgement, EngineError>;

    /// Close an open index.
    async fn close_index(&self, index: &str) -> Result<Acknowledgement, EngineError>;

    /// Apply a field mapping to an existing index.
    async fn put_mapping(&self, index: &str, mapping: &Value)
        -> Result<Acknowledgement, EngineError>;

    /// Insert a document with create semantics.
    ///
    /// Returns `EngineError::VersionConflict` if the id already exists.
    async fn index_document(
        &self,
        request: &IndexDocumentRequest,
    ) -> Result<WriteResponse, EngineError>;

    /// Fetch a single document.
    ///
    /// A missing document is `Ok` with `found == false`; a missing index is
    /// `EngineError::NotFound`.
    async fn get_document(&self, request: &GetDocumentRequest)
        -> Result<GetResponse, EngineError>;

    /// Update a document by merge (optionally upserting) or by script.
    async fn update_document(
        &self,
        request: &UpdateDocumentRequest,
    ) -> Result<WriteResponse, EngineError>;

    /// Delete a document. A missing document is `Ok` with result `NotFound`.
    async fn delete_document(&self, index: &str, id: &str)
        -> Result<WriteResponse, EngineError>;

    /// Execute many write operations in one round trip.
    ///
    /// Item failures are reported per item in the response, never as `Err`.
    async fn bulk(&self, request: &BulkRequest) -> Result<BulkResponse, EngineError>;

    /// Fetch many documents in one round trip.
    async fn multi_get(&self, request: &MultiGetRequest)
        -> Result<MultiGetResponse, EngineError>;

    /// Execute a search.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, EngineError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the cluster is green or yellow
    /// * `Ok(false)` - If the cluster is red
    /// * `Err(EngineError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, EngineError>;
}
