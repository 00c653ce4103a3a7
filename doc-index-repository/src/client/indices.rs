//! Index lifecycle: create, check, open, close, delete and mappings.

use serde_json::Value;
use tracing::{error, info, instrument, warn};

use doc_index_shared::parse_record;

use super::DocIndexClient;
use crate::errors::{DocIndexError, EngineError};
use crate::interfaces::{Acknowledgement, CreateIndexBody};
use crate::types::{IndexOutcome, IndexPresence};

impl DocIndexClient {
    /// Create an index with engine default settings.
    pub async fn create_index(&self, index: &str) -> Result<IndexOutcome, DocIndexError> {
        self.create_guarded(index, CreateIndexBody::default()).await
    }

    /// Create an index from raw mapping and settings documents.
    ///
    /// Both documents must be JSON objects; nothing is sent otherwise.
    pub async fn create_index_with(
        &self,
        index: &str,
        mapping: &str,
        settings: &str,
    ) -> Result<IndexOutcome, DocIndexError> {
        let Some(mappings) = parse_record(mapping) else {
            error!(index = %index, "Mapping is not a valid JSON object");
            return Ok(IndexOutcome::InvalidInput(
                "mapping is not a valid JSON object".to_string(),
            ));
        };
        let Some(settings) = parse_record(settings) else {
            error!(index = %index, "Settings are not a valid JSON object");
            return Ok(IndexOutcome::InvalidInput(
                "settings are not a valid JSON object".to_string(),
            ));
        };

        let body = CreateIndexBody {
            settings: Some(Value::Object(settings)),
            mappings: Some(Value::Object(mappings)),
        };
        self.create_guarded(index, body).await
    }

    /// Create an index with explicit shard and replica counts.
    pub async fn create_index_sized(
        &self,
        index: &str,
        shards: u32,
        replicas: u32,
    ) -> Result<IndexOutcome, DocIndexError> {
        if shards < 1 || replicas < 1 {
            error!(index = %index, shards, replicas, "Shard and replica counts must be at least 1");
            return Ok(IndexOutcome::InvalidInput(format!(
                "shards and replicas must be at least 1 (got {} and {})",
                shards, replicas
            )));
        }
        self.create_guarded(index, CreateIndexBody::sized(shards, replicas))
            .await
    }

    /// Delete an index. A missing index is reported, not raised.
    #[instrument(skip(self))]
    pub async fn delete_index(&self, index: &str) -> Result<IndexOutcome, DocIndexError> {
        if let Some(invalid) = blank_index(index) {
            return Ok(invalid);
        }

        match self.engine.delete_index(index).await {
            Ok(ack) => Ok(acknowledged(ack, index, "Index deleted")),
            Err(EngineError::NotFound(reason)) => {
                warn!(index = %index, reason = %reason, "Index to delete does not exist");
                Ok(IndexOutcome::NotFound)
            }
            Err(e) => {
                error!(index = %index, error = %e, "Failed to delete index");
                Err(e.into())
            }
        }
    }

    /// Ask the engine whether an index exists.
    ///
    /// Transport failures are reported as `Unknown` rather than as absence.
    pub async fn check_index_exists(&self, index: &str) -> IndexPresence {
        if index.trim().is_empty() {
            return IndexPresence::Absent;
        }
        match self.engine.index_exists(index).await {
            Ok(true) => IndexPresence::Exists,
            Ok(false) => IndexPresence::Absent,
            Err(e) => {
                warn!(index = %index, error = %e, "Index existence check failed");
                IndexPresence::Unknown(e.to_string())
            }
        }
    }

    /// Boolean existence check. An unanswerable check reads as `false`.
    pub async fn index_exists(&self, index: &str) -> bool {
        self.check_index_exists(index).await.exists()
    }

    #[instrument(skip(self))]
    pub async fn open_index(&self, index: &str) -> Result<IndexOutcome, DocIndexError> {
        if let Some(outcome) = self.guard_existing(index).await? {
            return Ok(outcome);
        }
        let ack = self.engine.open_index(index).await.map_err(|e| {
            error!(index = %index, error = %e, "Failed to open index");
            DocIndexError::from(e)
        })?;
        Ok(acknowledged(ack, index, "Index opened"))
    }

    #[instrument(skip(self))]
    pub async fn close_index(&self, index: &str) -> Result<IndexOutcome, DocIndexError> {
        if let Some(outcome) = self.guard_existing(index).await? {
            return Ok(outcome);
        }
        let ack = self.engine.close_index(index).await.map_err(|e| {
            error!(index = %index, error = %e, "Failed to close index");
            DocIndexError::from(e)
        })?;
        Ok(acknowledged(ack, index, "Index closed"))
    }

    /// Apply a field mapping to an existing index.
    #[instrument(skip(self, mapping))]
    pub async fn set_mapping(
        &self,
        index: &str,
        mapping: &Value,
    ) -> Result<IndexOutcome, DocIndexError> {
        if !mapping.is_object() {
            error!(index = %index, "Mapping must be a JSON object");
            return Ok(IndexOutcome::InvalidInput(
                "mapping must be a JSON object".to_string(),
            ));
        }
        if let Some(outcome) = self.guard_existing(index).await? {
            return Ok(outcome);
        }
        let ack = self.engine.put_mapping(index, mapping).await.map_err(|e| {
            error!(index = %index, error = %e, "Failed to put mapping");
            DocIndexError::from(e)
        })?;
        Ok(acknowledged(ack, index, "Mapping applied"))
    }

    #[instrument(skip(self, body))]
    async fn create_guarded(
        &self,
        index: &str,
        body: CreateIndexBody,
    ) -> Result<IndexOutcome, DocIndexError> {
        if let Some(invalid) = blank_index(index) {
            return Ok(invalid);
        }
        if self.require_presence(index).await? {
            warn!(index = %index, "Index already exists, skipping create");
            return Ok(IndexOutcome::AlreadyExists);
        }
        self.create_unguarded(index, &body).await
    }

    /// Issue the create call without an existence check.
    pub(crate) async fn create_unguarded(
        &self,
        index: &str,
        body: &CreateIndexBody,
    ) -> Result<IndexOutcome, DocIndexError> {
        match self.engine.create_index(index, body).await {
            Ok(ack) => Ok(acknowledged(ack, index, "Index created")),
            Err(EngineError::AlreadyExists(reason)) => {
                warn!(index = %index, reason = %reason, "Index was created concurrently");
                Ok(IndexOutcome::AlreadyExists)
            }
            Err(e) => {
                error!(index = %index, error = %e, "Failed to create index");
                Err(e.into())
            }
        }
    }

    /// Make sure a write target exists, creating it with default settings.
    pub(crate) async fn ensure_index(&self, index: &str) -> Result<(), DocIndexError> {
        if self.require_presence(index).await? {
            return Ok(());
        }
        info!(index = %index, "Index missing, creating with default settings");
        self.create_unguarded(index, &CreateIndexBody::default())
            .await
            .map(|_| ())
    }

    /// `Some(outcome)` when the operation must stop before touching the index.
    async fn guard_existing(&self, index: &str) -> Result<Option<IndexOutcome>, DocIndexError> {
        if let Some(invalid) = blank_index(index) {
            return Ok(Some(invalid));
        }
        if !self.require_presence(index).await? {
            warn!(index = %index, "Index does not exist, nothing to do");
            return Ok(Some(IndexOutcome::NotFound));
        }
        Ok(None)
    }
}

fn blank_index(index: &str) -> Option<IndexOutcome> {
    if index.trim().is_empty() {
        error!("Index name is required");
        Some(IndexOutcome::InvalidInput("index is required".to_string()))
    } else {
        None
    }
}

fn acknowledged(ack: Acknowledgement, index: &str, action: &str) -> IndexOutcome {
    if ack.is_accepted() {
        info!(index = %index, "{}", action);
        IndexOutcome::Acknowledged
    } else {
        warn!(index = %index, "{} but the request was not acknowledged", action);
        IndexOutcome::Unacknowledged
    }
}
