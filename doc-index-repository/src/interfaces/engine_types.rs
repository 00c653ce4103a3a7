//! Request and response types of the engine client contract.
//!
//! These mirror the engine's wire API closely; `DocIndexClient` turns them into the
//! caller-facing outcomes in `crate::types`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use doc_index_shared::{DocumentRecord, QueryDescriptor, ShardFailure, SortDescriptor};

/// Engine acknowledgement flags for a cluster-level operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Acknowledgement {
    /// All nodes accepted the request.
    pub acknowledged: bool,
    /// The required shard copies started before the timeout.
    pub shards_acknowledged: bool,
}

impl Acknowledgement {
    pub fn new(acknowledged: bool, shards_acknowledged: bool) -> Self {
        Self {
            acknowledged,
            shards_acknowledged,
        }
    }

    /// Either flag counts as success.
    pub fn is_accepted(&self) -> bool {
        self.acknowledged || self.shards_acknowledged
    }
}

/// Body of an index creation request. Empty means engine defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateIndexBody {
    pub settings: Option<Value>,
    pub mappings: Option<Value>,
}

impl CreateIndexBody {
    /// Shard and replica counts only.
    pub fn sized(shards: u32, replicas: u32) -> Self {
        Self {
            settings: Some(json!({
                "index.number_of_shards": shards,
                "index.number_of_replicas": replicas
            })),
            mappings: None,
        }
    }
}

/// Per-document result reported by a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteResult {
    Created,
    Updated,
    Deleted,
    NotFound,
    Noop,
}

impl WriteResult {
    /// Parse the engine's `result` string.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created" => Some(Self::Created),
            "updated" => Some(Self::Updated),
            "deleted" => Some(Self::Deleted),
            "not_found" => Some(Self::NotFound),
            "noop" => Some(Self::Noop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::NotFound => "not_found",
            Self::Noop => "noop",
        }
    }
}

/// Shard replication summary of a write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShardInfo {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    pub failures: Vec<ShardFailure>,
}

impl ShardInfo {
    pub fn all_successful(total: u32) -> Self {
        Self {
            total,
            successful: total,
            failed: 0,
            failures: Vec::new(),
        }
    }

    /// Fewer shard copies written than targeted, or any failure reported.
    pub fn is_degraded(&self) -> bool {
        self.successful < self.total || self.failed > 0 || !self.failures.is_empty()
    }
}

/// Response to a single-document write (index, update or delete).
#[derive(Debug, Clone, PartialEq)]
pub struct WriteResponse {
    pub index: String,
    pub id: String,
    pub result: WriteResult,
    pub shards: ShardInfo,
}

/// Insert a document with create semantics: an existing id is a conflict.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDocumentRequest {
    pub index: String,
    pub id: String,
    pub source: DocumentRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetDocumentRequest {
    pub index: String,
    pub id: String,
    /// Read from the realtime translog instead of the last refresh.
    pub realtime: bool,
    /// Refresh the shard before reading.
    pub refresh: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetResponse {
    pub index: String,
    pub id: String,
    pub found: bool,
    pub source: Option<DocumentRecord>,
}

/// What an update applies to the stored document.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateChange {
    /// Merge fields into the document, creating it from `doc` when `upsert` is set.
    Merge { doc: DocumentRecord, upsert: bool },
    /// Run an inline script against the document.
    Script(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDocumentRequest {
    pub index: String,
    pub id: String,
    pub change: UpdateChange,
}

/// When a write becomes visible to search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshPolicy {
    #[default]
    None,
    Immediate,
    /// Block until a refresh makes the change visible.
    WaitFor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BulkAction {
    Create { source: DocumentRecord },
    Update { doc: DocumentRecord, upsert: bool },
    Delete,
}

impl BulkAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkOperation {
    pub index: String,
    pub id: String,
    pub action: BulkAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkRequest {
    pub operations: Vec<BulkOperation>,
    pub timeout: Duration,
    pub refresh: RefreshPolicy,
}

/// Classification of a per-item or per-call failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidInput,
    NotFound,
    VersionConflict,
    AlreadyExists,
    /// Any other engine-side rejection.
    Rejected,
}

impl FailureKind {
    /// Classify an HTTP status reported for an item.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidInput,
            404 => Self::NotFound,
            409 => Self::VersionConflict,
            _ => Self::Rejected,
        }
    }
}

/// Failure detail attached to a bulk or multi-get item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl ItemFailure {
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemResponse {
    /// Action name as echoed by the engine (`create`, `update`, `delete`, `index`).
    pub action: String,
    pub index: String,
    pub id: String,
    pub status: u16,
    pub result: Option<WriteResult>,
    pub failure: Option<ItemFailure>,
}

impl BulkItemResponse {
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkResponse {
    pub has_failures: bool,
    /// One entry per submitted operation, in request order.
    pub items: Vec<BulkItemResponse>,
}

/// Fully resolved document address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocKey {
    pub index: String,
    pub id: String,
}

impl DocKey {
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiGetRequest {
    pub docs: Vec<DocKey>,
    pub realtime: bool,
    pub refresh: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MultiGetItem {
    Found { key: DocKey, source: DocumentRecord },
    Missing { key: DocKey },
    Failed { key: DocKey, failure: ItemFailure },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiGetResponse {
    /// One entry per requested document, in request order.
    pub items: Vec<MultiGetItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub index: String,
    pub query: QueryDescriptor,
    pub sort: Vec<SortDescriptor>,
    /// Hits to skip. `None` leaves the engine default.
    pub from: Option<u64>,
    /// Hits to return. `None` leaves the engine default window.
    pub size: Option<u64>,
    /// Server-side search timeout.
    pub timeout: Duration,
    /// Count every match instead of stopping at the engine's tracking threshold.
    pub track_total_hits: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// `_source` of each hit, in sort order.
    pub hits: Vec<DocumentRecord>,
    pub total: u64,
    pub failed_shards: u32,
    pub shard_failures: Vec<ShardFailure>,
}
