//! Batched writes in one round trip.

use tracing::{error, info, instrument, warn};

use doc_index_shared::{parse_record, DocumentRecord};

use super::DocIndexClient;
use crate::errors::DocIndexError;
use crate::interfaces::{BulkAction, BulkOperation, BulkRequest, BulkResponse, RefreshPolicy};
use crate::types::{BatchOperationResult, BatchOperationSummary, BulkItem, DocRef, DroppedItem};

impl DocIndexClient {
    /// Insert many documents. A duplicate id fails only its own item.
    ///
    /// Items with a blank id or a payload that is not a JSON object are dropped
    /// before the request is built and listed in the summary.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn bulk_add(
        &self,
        items: Vec<BulkItem>,
    ) -> Result<BatchOperationSummary, DocIndexError> {
        let (operations, dropped) = self.prepare(&items, |item| {
            let source = payload_record(item)?;
            Ok(BulkAction::Create { source })
        });
        self.execute_bulk("add", operations, dropped).await
    }

    /// Merge many documents, creating the ones that do not exist.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn bulk_update(
        &self,
        items: Vec<BulkItem>,
    ) -> Result<BatchOperationSummary, DocIndexError> {
        let (operations, dropped) = self.prepare(&items, |item| {
            let doc = payload_record(item)?;
            Ok(BulkAction::Update { doc, upsert: true })
        });
        self.execute_bulk("update", operations, dropped).await
    }

    /// Delete many documents. Deleting a missing document counts as success.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn bulk_delete(
        &self,
        items: Vec<DocRef>,
    ) -> Result<BatchOperationSummary, DocIndexError> {
        let items: Vec<BulkItem> = items
            .into_iter()
            .map(|reference| BulkItem {
                index: reference.index,
                id: reference.id,
                payload: None,
            })
            .collect();
        let (operations, dropped) = self.prepare(&items, |_| Ok(BulkAction::Delete));
        self.execute_bulk("delete", operations, dropped).await
    }

    /// Split items into operations to submit and items dropped by validation.
    fn prepare(
        &self,
        items: &[BulkItem],
        action: impl Fn(&BulkItem) -> Result<BulkAction, String>,
    ) -> (Vec<BulkOperation>, Vec<DroppedItem>) {
        let mut operations = Vec::with_capacity(items.len());
        let mut dropped = Vec::new();

        for (position, item) in items.iter().enumerate() {
            let built = if item.id.trim().is_empty() {
                Err("id is required".to_string())
            } else {
                action(item)
            };
            match built {
                Ok(action) => operations.push(BulkOperation {
                    index: self.resolve_index(item.index.as_deref()),
                    id: item.id.clone(),
                    action,
                }),
                Err(reason) => {
                    warn!(position, id = %item.id, reason = %reason, "Dropping bulk item");
                    dropped.push(DroppedItem {
                        position,
                        id: item.id.clone(),
                        reason,
                    });
                }
            }
        }

        (operations, dropped)
    }

    async fn execute_bulk(
        &self,
        kind: &str,
        operations: Vec<BulkOperation>,
        dropped: Vec<DroppedItem>,
    ) -> Result<BatchOperationSummary, DocIndexError> {
        if operations.is_empty() {
            error!(
                kind = %kind,
                dropped = dropped.len(),
                "Bulk batch has no valid items, nothing sent"
            );
            return Ok(BatchOperationSummary {
                dropped,
                ..Default::default()
            });
        }

        self.validate_batch_size(operations.len())?;

        let request = BulkRequest {
            operations,
            timeout: self.config.request_timeout,
            refresh: RefreshPolicy::WaitFor,
        };
        let response = self.engine.bulk(&request).await.map_err(|e| {
            error!(kind = %kind, error = %e, "Bulk request failed");
            DocIndexError::from(e)
        })?;

        Ok(summarize(kind, response, dropped))
    }
}

fn payload_record(item: &BulkItem) -> Result<DocumentRecord, String> {
    let payload = item
        .payload
        .as_deref()
        .ok_or_else(|| "payload is required".to_string())?;
    parse_record(payload).ok_or_else(|| "payload is not a valid JSON object".to_string())
}

fn summarize(kind: &str, response: BulkResponse, dropped: Vec<DroppedItem>) -> BatchOperationSummary {
    let results: Vec<BatchOperationResult> = response
        .items
        .into_iter()
        .map(|item| BatchOperationResult {
            success: !item.is_failed(),
            index: item.index,
            id: item.id,
            result: item.result,
            failure: item.failure,
        })
        .collect();

    let succeeded = results.iter().filter(|result| result.success).count();
    let summary = BatchOperationSummary {
        total: results.len(),
        succeeded,
        failed: results.len() - succeeded,
        dropped,
        results,
    };

    if summary.has_failures() {
        for result in &summary.results {
            match &result.failure {
                Some(failure) => error!(
                    kind = %kind,
                    index = %result.index,
                    id = %result.id,
                    failure = ?failure.kind,
                    reason = %failure.reason,
                    "Bulk item failed"
                ),
                None => info!(
                    kind = %kind,
                    index = %result.index,
                    id = %result.id,
                    "Bulk item succeeded"
                ),
            }
        }
    } else {
        info!(
            kind = %kind,
            total = summary.total,
            dropped = summary.dropped.len(),
            "Bulk batch succeeded"
        );
    }

    summary
}
