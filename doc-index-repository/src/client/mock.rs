//! In-memory engine used by the client tests.
//!
//! Behaves like a single-node cluster for the calls the client makes and records
//! every call so tests can assert on request shape and call order.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use doc_index_shared::{DocumentRecord, ShardFailure};

use crate::errors::EngineError;
use crate::interfaces::{
    Acknowledgement, BulkAction, BulkItemResponse, BulkRequest, BulkResponse, CreateIndexBody,
    DocKey, EngineClient, FailureKind, GetDocumentRequest, GetResponse, IndexDocumentRequest,
    ItemFailure, MultiGetItem, MultiGetRequest, MultiGetResponse, SearchRequest, SearchResponse,
    ShardInfo, UpdateChange, UpdateDocumentRequest, WriteResponse, WriteResult,
};

pub const DELETE_SCRIPT: &str = "ctx.op = 'delete'";
pub const NOOP_SCRIPT: &str = "ctx.op = 'none'";

/// A recorded engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    IndexExists(String),
    CreateIndex(String, CreateIndexBody),
    DeleteIndex(String),
    OpenIndex(String),
    CloseIndex(String),
    PutMapping(String, Value),
    IndexDocument(IndexDocumentRequest),
    GetDocument(GetDocumentRequest),
    UpdateDocument(UpdateDocumentRequest),
    DeleteDocument(String, String),
    Bulk(BulkRequest),
    MultiGet(MultiGetRequest),
    Search(SearchRequest),
    HealthCheck,
}

impl EngineCall {
    pub fn is_create_index(&self) -> bool {
        matches!(self, Self::CreateIndex(..))
    }

    /// Everything except existence checks and health checks.
    pub fn is_mutation_or_read(&self) -> bool {
        !matches!(self, Self::IndexExists(_) | Self::HealthCheck)
    }
}

#[derive(Default)]
struct State {
    indices: HashSet<String>,
    documents: HashMap<DocKey, DocumentRecord>,
    conflicted: HashSet<DocKey>,
    search_hits: Vec<DocumentRecord>,
    shard_failures: Vec<ShardFailure>,
    degraded_writes: bool,
    unacknowledged: bool,
    unreachable: bool,
}

pub struct MockEngine {
    state: Mutex<State>,
    calls: Mutex<Vec<EngineCall>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_index(mut self, index: &str) -> Self {
        self.state.get_mut().indices.insert(index.to_string());
        self
    }

    /// Store a document (creating its index).
    pub fn with_document(mut self, index: &str, id: &str, source: Value) -> Self {
        let state = self.state.get_mut();
        state.indices.insert(index.to_string());
        state
            .documents
            .insert(DocKey::new(index, id), as_record(source));
        self
    }

    /// Reads and writes of this document report a version conflict.
    pub fn with_conflict(mut self, index: &str, id: &str) -> Self {
        self.state.get_mut().conflicted.insert(DocKey::new(index, id));
        self
    }

    /// Searches return `count` hits shaped `{"seq": n}`.
    pub fn with_search_hits(mut self, count: usize) -> Self {
        self.state.get_mut().search_hits = (0..count)
            .map(|seq| as_record(json!({ "seq": seq })))
            .collect();
        self
    }

    pub fn with_shard_failures(mut self, reasons: &[&str]) -> Self {
        self.state.get_mut().shard_failures =
            reasons.iter().map(|reason| ShardFailure::new(*reason)).collect();
        self
    }

    /// Writes reach one of two shard copies.
    pub fn degraded(mut self) -> Self {
        self.state.get_mut().degraded_writes = true;
        self
    }

    /// Index operations come back with neither acknowledgement flag.
    pub fn unacknowledged(mut self) -> Self {
        self.state.get_mut().unacknowledged = true;
        self
    }

    /// Every call fails at the transport.
    pub fn unreachable(mut self) -> Self {
        self.state.get_mut().unreachable = true;
        self
    }

    pub async fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().await.clone()
    }

    pub async fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.calls.lock().await.iter().filter(|&call| predicate(call)).count()
    }

    pub async fn document(&self, index: &str, id: &str) -> Option<DocumentRecord> {
        self.state
            .lock()
            .await
            .documents
            .get(&DocKey::new(index, id))
            .cloned()
    }

    pub async fn has_index(&self, index: &str) -> bool {
        self.state.lock().await.indices.contains(index)
    }

    /// Record the call and fail if the engine is unreachable.
    async fn record(&self, call: EngineCall) -> Result<(), EngineError> {
        self.calls.lock().await.push(call);
        if self.state.lock().await.unreachable {
            return Err(EngineError::connection("connection refused"));
        }
        Ok(())
    }
}

pub fn as_record(value: Value) -> DocumentRecord {
    match value {
        Value::Object(map) => map,
        _ => DocumentRecord::new(),
    }
}

impl State {
    fn acknowledgement(&self) -> Acknowledgement {
        if self.unacknowledged {
            Acknowledgement::default()
        } else {
            Acknowledgement::new(true, true)
        }
    }

    fn write_response(&self, key: &DocKey, result: WriteResult) -> WriteResponse {
        let shards = if self.degraded_writes {
            ShardInfo {
                total: 2,
                successful: 1,
                failed: 1,
                failures: vec![ShardFailure {
                    index: Some(key.index.clone()),
                    shard: Some(0),
                    reason: "replica unavailable".to_string(),
                }],
            }
        } else {
            ShardInfo::all_successful(2)
        };
        WriteResponse {
            index: key.index.clone(),
            id: key.id.clone(),
            result,
            shards,
        }
    }

    fn require_index(&self, index: &str) -> Result<(), EngineError> {
        if self.indices.contains(index) {
            Ok(())
        } else {
            Err(EngineError::not_found(format!("no such index [{}]", index)))
        }
    }

    fn merge(&mut self, key: &DocKey, doc: &DocumentRecord, upsert: bool) -> Option<WriteResult> {
        match self.documents.get_mut(key) {
            Some(existing) => {
                for (field, value) in doc {
                    existing.insert(field.clone(), value.clone());
                }
                Some(WriteResult::Updated)
            }
            None if upsert => {
                self.documents.insert(key.clone(), doc.clone());
                Some(WriteResult::Created)
            }
            None => None,
        }
    }
}

#[async_trait]
impl EngineClient for MockEngine {
    async fn index_exists(&self, index: &str) -> Result<bool, EngineError> {
        self.record(EngineCall::IndexExists(index.to_string())).await?;
        Ok(self.state.lock().await.indices.contains(index))
    }

    async fn create_index(
        &self,
        index: &str,
        body: &CreateIndexBody,
    ) -> Result<Acknowledgement, EngineError> {
        self.record(EngineCall::CreateIndex(index.to_string(), body.clone()))
            .await?;
        let mut state = self.state.lock().await;
        if !state.indices.insert(index.to_string()) {
            return Err(EngineError::already_exists(format!(
                "index [{}] already exists",
                index
            )));
        }
        Ok(state.acknowledgement())
    }

    async fn delete_index(&self, index: &str) -> Result<Acknowledgement, EngineError> {
        self.record(EngineCall::DeleteIndex(index.to_string())).await?;
        let mut state = self.state.lock().await;
        state.require_index(index)?;
        state.indices.remove(index);
        state.documents.retain(|key, _| key.index != index);
        Ok(Acknowledgement::new(!state.unacknowledged, false))
    }

    async fn open_index(&self, index: &str) -> Result<Acknowledgement, EngineError> {
        self.record(EngineCall::OpenIndex(index.to_string())).await?;
        let state = self.state.lock().await;
        state.require_index(index)?;
        Ok(state.acknowledgement())
    }

    async fn close_index(&self, index: &str) -> Result<Acknowledgement, EngineError> {
        self.record(EngineCall::CloseIndex(index.to_string())).await?;
        let state = self.state.lock().await;
        state.require_index(index)?;
        Ok(state.acknowledgement())
    }

    async fn put_mapping(
        &self,
        index: &str,
        mapping: &Value,
    ) -> Result<Acknowledgement, EngineError> {
        self.record(EngineCall::PutMapping(index.to_string(), mapping.clone()))
            .await?;
        let state = self.state.lock().await;
        state.require_index(index)?;
        Ok(Acknowledgement::new(!state.unacknowledged, false))
    }

    async fn index_document(
        &self,
        request: &IndexDocumentRequest,
    ) -> Result<WriteResponse, EngineError> {
        self.record(EngineCall::IndexDocument(request.clone())).await?;
        let mut state = self.state.lock().await;
        let key = DocKey::new(&request.index, &request.id);
        if state.conflicted.contains(&key) || state.documents.contains_key(&key) {
            return Err(EngineError::conflict(format!(
                "[{}]: version conflict, document already exists",
                request.id
            )));
        }
        state.indices.insert(request.index.clone());
        state.documents.insert(key.clone(), request.source.clone());
        Ok(state.write_response(&key, WriteResult::Created))
    }

    async fn get_document(
        &self,
        request: &GetDocumentRequest,
    ) -> Result<GetResponse, EngineError> {
        self.record(EngineCall::GetDocument(request.clone())).await?;
        let state = self.state.lock().await;
        state.require_index(&request.index)?;
        let key = DocKey::new(&request.index, &request.id);
        if state.conflicted.contains(&key) {
            return Err(EngineError::conflict("version conflict"));
        }
        let source = state.documents.get(&key).cloned();
        Ok(GetResponse {
            index: request.index.clone(),
            id: request.id.clone(),
            found: source.is_some(),
            source,
        })
    }

    async fn update_document(
        &self,
        request: &UpdateDocumentRequest,
    ) -> Result<WriteResponse, EngineError> {
        self.record(EngineCall::UpdateDocument(request.clone())).await?;
        let mut state = self.state.lock().await;
        state.require_index(&request.index)?;
        let key = DocKey::new(&request.index, &request.id);
        if state.conflicted.contains(&key) {
            return Err(EngineError::conflict("version conflict"));
        }
        let missing = || EngineError::not_found(format!("[{}]: document missing", request.id));
        let result = match &request.change {
            UpdateChange::Merge { doc, upsert } => {
                state.merge(&key, doc, *upsert).ok_or_else(missing)?
            }
            UpdateChange::Script(script) => {
                if !state.documents.contains_key(&key) {
                    return Err(missing());
                }
                match script.as_str() {
                    DELETE_SCRIPT => {
                        state.documents.remove(&key);
                        WriteResult::Deleted
                    }
                    NOOP_SCRIPT => WriteResult::Noop,
                    _ => WriteResult::Updated,
                }
            }
        };
        Ok(state.write_response(&key, result))
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<WriteResponse, EngineError> {
        self.record(EngineCall::DeleteDocument(index.to_string(), id.to_string()))
            .await?;
        let mut state = self.state.lock().await;
        state.require_index(index)?;
        let key = DocKey::new(index, id);
        let result = match state.documents.remove(&key) {
            Some(_) => WriteResult::Deleted,
            None => WriteResult::NotFound,
        };
        Ok(state.write_response(&key, result))
    }

    async fn bulk(&self, request: &BulkRequest) -> Result<BulkResponse, EngineError> {
        self.record(EngineCall::Bulk(request.clone())).await?;
        let mut state = self.state.lock().await;
        let mut items = Vec::with_capacity(request.operations.len());

        for operation in &request.operations {
            let key = DocKey::new(&operation.index, &operation.id);
            let outcome = match &operation.action {
                BulkAction::Create { source } => {
                    if state.documents.contains_key(&key) {
                        Err(ItemFailure::new(
                            FailureKind::VersionConflict,
                            "version conflict, document already exists",
                        ))
                    } else {
                        state.indices.insert(operation.index.clone());
                        state.documents.insert(key.clone(), source.clone());
                        Ok((201, WriteResult::Created))
                    }
                }
                BulkAction::Update { doc, upsert } => {
                    state.indices.insert(operation.index.clone());
                    match state.merge(&key, doc, *upsert) {
                        Some(WriteResult::Created) => Ok((201, WriteResult::Created)),
                        Some(result) => Ok((200, result)),
                        None => Err(ItemFailure::new(FailureKind::NotFound, "document missing")),
                    }
                }
                BulkAction::Delete => match state.documents.remove(&key) {
                    Some(_) => Ok((200, WriteResult::Deleted)),
                    None => Ok((404, WriteResult::NotFound)),
                },
            };

            let (status, result, failure) = match outcome {
                Ok((status, result)) => (status, Some(result), None),
                Err(failure) => {
                    let status = match failure.kind {
                        FailureKind::NotFound => 404,
                        _ => 409,
                    };
                    (status, None, Some(failure))
                }
            };
            items.push(BulkItemResponse {
                action: operation.action.name().to_string(),
                index: operation.index.clone(),
                id: operation.id.clone(),
                status,
                result,
                failure,
            });
        }

        Ok(BulkResponse {
            has_failures: items.iter().any(BulkItemResponse::is_failed),
            items,
        })
    }

    async fn multi_get(&self, request: &MultiGetRequest) -> Result<MultiGetResponse, EngineError> {
        self.record(EngineCall::MultiGet(request.clone())).await?;
        let state = self.state.lock().await;
        let items = request
            .docs
            .iter()
            .map(|key| {
                if state.conflicted.contains(key) {
                    MultiGetItem::Failed {
                        key: key.clone(),
                        failure: ItemFailure::new(FailureKind::VersionConflict, "version conflict"),
                    }
                } else if !state.indices.contains(&key.index) {
                    MultiGetItem::Failed {
                        key: key.clone(),
                        failure: ItemFailure::new(FailureKind::NotFound, "no such index"),
                    }
                } else {
                    match state.documents.get(key) {
                        Some(source) => MultiGetItem::Found {
                            key: key.clone(),
                            source: source.clone(),
                        },
                        None => MultiGetItem::Missing { key: key.clone() },
                    }
                }
            })
            .collect();
        Ok(MultiGetResponse { items })
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, EngineError> {
        self.record(EngineCall::Search(request.clone())).await?;
        let state = self.state.lock().await;
        let from = request.from.unwrap_or(0) as usize;
        let size = request.size.map(|size| size as usize).unwrap_or(usize::MAX);
        Ok(SearchResponse {
            hits: state.search_hits.iter().skip(from).take(size).cloned().collect(),
            total: state.search_hits.len() as u64,
            failed_shards: state.shard_failures.len() as u32,
            shard_failures: state.shard_failures.clone(),
        })
    }

    async fn health_check(&self) -> Result<bool, EngineError> {
        self.record(EngineCall::HealthCheck).await?;
        Ok(true)
    }
}
