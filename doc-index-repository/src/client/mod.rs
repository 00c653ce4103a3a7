//! Document index client implementation.
//!
//! This module provides the main client for interacting with the search engine.
//! Application code uses this to manage indices and to write, fetch, and search
//! documents. Operations are grouped by concern:
//!
//! - `indices`: index lifecycle and mappings
//! - `documents`: single-document writes and reads
//! - `bulk`: batched writes in one round trip
//! - `search`: unpaged and paged search
//! - `multi_get`: batched reads in one round trip

mod bulk;
mod documents;
mod indices;
mod multi_get;
mod search;

#[cfg(test)]
pub(crate) mod mock;

use std::sync::Arc;

use tracing::{error, warn};

use crate::config::DocIndexConfig;
use crate::errors::DocIndexError;
use crate::interfaces::{EngineClient, ShardInfo};
use crate::types::IndexPresence;

/// The main client for interacting with the document index.
///
/// Holds no local state besides configuration: every existence check, fetch, and
/// search is answered live by the engine. The engine client is shared and may be
/// used from many tasks at once.
pub struct DocIndexClient {
    engine: Arc<dyn EngineClient>,
    config: DocIndexConfig,
}

impl DocIndexClient {
    /// Create a new DocIndexClient with default configuration.
    pub fn new(engine: Arc<dyn EngineClient>) -> Self {
        Self {
            engine,
            config: DocIndexConfig::default(),
        }
    }

    /// Create a new DocIndexClient with custom configuration.
    pub fn with_config(engine: Arc<dyn EngineClient>, config: DocIndexConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &DocIndexConfig {
        &self.config
    }

    /// Check whether the engine is reachable and healthy.
    pub async fn health_check(&self) -> Result<bool, DocIndexError> {
        Ok(self.engine.health_check().await?)
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), DocIndexError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(DocIndexError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// The item's index, or the configured default when none is given.
    fn resolve_index(&self, index: Option<&str>) -> String {
        match index {
            Some(index) if !index.trim().is_empty() => index.to_string(),
            _ => self.config.default_index.clone(),
        }
    }

    /// Existence check for guarded operations.
    ///
    /// Guards do not act on state they could not verify, so `Unknown` becomes an
    /// error here instead of being read as absent.
    async fn require_presence(&self, index: &str) -> Result<bool, DocIndexError> {
        match self.check_index_exists(index).await {
            IndexPresence::Exists => Ok(true),
            IndexPresence::Absent => Ok(false),
            IndexPresence::Unknown(reason) => Err(DocIndexError::connection(format!(
                "could not determine whether index {} exists: {}",
                index, reason
            ))),
        }
    }
}

/// Reject blank index names and document ids before any engine call.
fn validate_target(index: &str, id: &str) -> Result<(), String> {
    if index.trim().is_empty() {
        return Err("index is required".to_string());
    }
    if id.trim().is_empty() {
        return Err("id is required".to_string());
    }
    Ok(())
}

/// Log shard copies a write did not reach. The write itself still counts.
fn log_shard_info(shards: &ShardInfo, index: &str, id: &str) {
    if shards.successful < shards.total {
        warn!(
            index = %index,
            id = %id,
            total = shards.total,
            successful = shards.successful,
            "Write did not reach every shard copy"
        );
    }
    for failure in &shards.failures {
        error!(
            index = %index,
            id = %id,
            shard = ?failure.shard,
            reason = %failure.reason,
            "Shard copy failed"
        );
    }
}
