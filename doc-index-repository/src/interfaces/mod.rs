//! Interface definitions for the search engine client.
//!
//! This module defines the abstract `EngineClient` trait and its wire contract types,
//! allowing for dependency injection and swappable search backend implementations.

mod engine_client;
mod engine_types;

pub use engine_client::EngineClient;
pub use engine_types::{
    Acknowledgement, BulkAction, BulkItemResponse, BulkOperation, BulkRequest, BulkResponse,
    CreateIndexBody, DocKey, FailureKind, GetDocumentRequest, GetResponse, IndexDocumentRequest,
    ItemFailure, MultiGetItem, MultiGetRequest, MultiGetResponse, RefreshPolicy, SearchRequest,
    SearchResponse, ShardInfo, UpdateChange, UpdateDocumentRequest, WriteResponse, WriteResult,
};
