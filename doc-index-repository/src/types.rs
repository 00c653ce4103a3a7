//! Request and outcome types for document index operations.
//!
//! Every condition the client absorbs instead of failing (an index that already
//! exists, a missing document, an invalid payload) is reported as a tagged outcome so
//! callers can decide whether to log, retry, or escalate.

use doc_index_shared::DocumentRecord;

use crate::interfaces::{DocKey, ItemFailure, ShardInfo, WriteResponse, WriteResult};

/// Result of an index existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexPresence {
    Exists,
    Absent,
    /// The engine could not be asked; carries the transport error.
    Unknown(String),
}

impl IndexPresence {
    /// Collapse to a boolean, treating `Unknown` as absent.
    pub fn exists(&self) -> bool {
        matches!(self, Self::Exists)
    }
}

/// Outcome of an index lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    /// The engine accepted the change (either acknowledgement flag set).
    Acknowledged,
    /// The engine answered but set neither acknowledgement flag.
    Unacknowledged,
    /// Create was skipped because the index exists.
    AlreadyExists,
    /// The target index does not exist; nothing was done.
    NotFound,
    /// Local validation failed; the engine was never called.
    InvalidInput(String),
}

impl IndexOutcome {
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, Self::Acknowledged)
    }
}

/// Details of a document write the engine performed.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteReport {
    pub index: String,
    pub id: String,
    pub result: WriteResult,
    pub shards: ShardInfo,
}

impl WriteReport {
    /// The write reached fewer shard copies than targeted, or some copy failed.
    pub fn is_degraded(&self) -> bool {
        self.shards.is_degraded()
    }
}

impl From<WriteResponse> for WriteReport {
    fn from(response: WriteResponse) -> Self {
        Self {
            index: response.index,
            id: response.id,
            result: response.result,
            shards: response.shards,
        }
    }
}

/// Outcome of a single-document write or delete.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    Written(WriteReport),
    /// The document or its index does not exist.
    NotFound,
    /// The write lost a version race or hit an existing id on create.
    VersionConflict(String),
    /// Local validation failed; the engine was never called.
    InvalidInput(String),
}

impl DocumentOutcome {
    pub fn result(&self) -> Option<WriteResult> {
        self.report().map(|report| report.result)
    }

    pub fn report(&self) -> Option<&WriteReport> {
        match self {
            Self::Written(report) => Some(report),
            _ => None,
        }
    }
}

/// Outcome of a single-document fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum GetOutcome {
    Found(DocumentRecord),
    NotFound,
    VersionConflict(String),
    InvalidInput(String),
}

impl GetOutcome {
    pub fn record(&self) -> Option<&DocumentRecord> {
        match self {
            Self::Found(record) => Some(record),
            _ => None,
        }
    }

    /// The fetched record, or an empty one for every other outcome.
    pub fn into_record(self) -> DocumentRecord {
        match self {
            Self::Found(record) => record,
            _ => DocumentRecord::new(),
        }
    }
}

/// One item of a bulk add or update.
///
/// The operation kind is given by the bulk call that receives the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItem {
    /// Target index; the configured default index applies when `None`.
    pub index: Option<String>,
    /// Document id (required).
    pub id: String,
    /// JSON document (required for add and update).
    pub payload: Option<String>,
}

impl BulkItem {
    pub fn new(id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            index: None,
            id: id.into(),
            payload: Some(payload.into()),
        }
    }

    pub fn in_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }
}

/// Reference to a document for bulk delete and multi-get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocRef {
    /// Target index; the configured default index applies when `None`.
    pub index: Option<String>,
    pub id: String,
}

impl DocRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            index: None,
            id: id.into(),
        }
    }

    pub fn in_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }
}

impl From<&BulkItem> for DocRef {
    fn from(item: &BulkItem) -> Self {
        Self {
            index: item.index.clone(),
            id: item.id.clone(),
        }
    }
}

/// An item removed before the request was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedItem {
    /// Position in the caller's input.
    pub position: usize,
    pub id: String,
    pub reason: String,
}

/// Result of a batch operation for a single item.
///
/// This struct represents the outcome of a single operation within a batch. It
/// indicates whether the operation succeeded and includes the engine's failure
/// classification and reason if it did not.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOperationResult {
    pub index: String,
    pub id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Engine result for successful items.
    pub result: Option<WriteResult>,
    /// Failure detail if the operation failed.
    pub failure: Option<ItemFailure>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Items dropped by local validation never reach the engine and are listed in
/// `dropped`; `total` counts only submitted operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOperationSummary {
    /// Number of operations submitted to the engine.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Items removed before submission.
    pub dropped: Vec<DroppedItem>,
    /// Individual results for each submitted item, in request order.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Nothing was submitted: the input was empty or every item was dropped.
    pub fn is_rejected(&self) -> bool {
        self.total == 0
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchOperationResult> {
        self.results.iter().filter(|result| !result.success)
    }
}

/// Result of a multi-get, partitioned by item outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiGetResult {
    /// Found documents, in the engine's reported order.
    pub found: Vec<DocumentRecord>,
    pub missing: Vec<DocKey>,
    pub conflicted: Vec<DocKey>,
    /// Items that failed for any other reason.
    pub failed: Vec<(DocKey, ItemFailure)>,
    pub dropped: Vec<DroppedItem>,
}

impl MultiGetResult {
    pub fn records(&self) -> &[DocumentRecord] {
        &self.found
    }

    pub fn into_records(self) -> Vec<DocumentRecord> {
        self.found
    }
}
