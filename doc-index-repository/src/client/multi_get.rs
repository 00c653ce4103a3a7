//! Batched reads in one round trip.

use tracing::{debug, error, instrument, warn};

use super::DocIndexClient;
use crate::errors::DocIndexError;
use crate::interfaces::{DocKey, FailureKind, MultiGetItem, MultiGetRequest};
use crate::types::{DocRef, DroppedItem, MultiGetResult};

impl DocIndexClient {
    /// Fetch many documents by index and id.
    ///
    /// Items with a blank id are dropped. Items without an index use the configured
    /// default index. Found documents come back in the order the engine reports them.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn multi_get(&self, items: Vec<DocRef>) -> Result<MultiGetResult, DocIndexError> {
        let mut result = MultiGetResult::default();
        let mut docs = Vec::with_capacity(items.len());

        for (position, item) in items.into_iter().enumerate() {
            if item.id.trim().is_empty() {
                warn!(position, "Dropping multi-get item without id");
                result.dropped.push(DroppedItem {
                    position,
                    id: item.id,
                    reason: "id is required".to_string(),
                });
                continue;
            }
            docs.push(DocKey::new(self.resolve_index(item.index.as_deref()), item.id));
        }

        if docs.is_empty() {
            error!(dropped = result.dropped.len(), "Multi-get has no valid items, nothing sent");
            return Ok(result);
        }

        let request = MultiGetRequest {
            docs,
            realtime: false,
            refresh: true,
        };
        let response = self.engine.multi_get(&request).await.map_err(|e| {
            error!(error = %e, "Multi-get request failed");
            DocIndexError::from(e)
        })?;

        for item in response.items {
            match item {
                MultiGetItem::Found { source, .. } => result.found.push(source),
                MultiGetItem::Missing { key } => {
                    warn!(index = %key.index, id = %key.id, "Document not found");
                    result.missing.push(key);
                }
                MultiGetItem::Failed { key, failure } => match failure.kind {
                    FailureKind::VersionConflict => {
                        warn!(index = %key.index, id = %key.id, reason = %failure.reason, "Version conflict");
                        result.conflicted.push(key);
                    }
                    FailureKind::NotFound => {
                        warn!(index = %key.index, id = %key.id, reason = %failure.reason, "Document not found");
                        result.missing.push(key);
                    }
                    _ => {
                        error!(index = %key.index, id = %key.id, reason = %failure.reason, "Multi-get item failed");
                        result.failed.push((key, failure));
                    }
                },
            }
        }

        debug!(
            found = result.found.len(),
            missing = result.missing.len(),
            conflicted = result.conflicted.len(),
            failed = result.failed.len(),
            "Multi-get completed"
        );
        Ok(result)
    }
}
