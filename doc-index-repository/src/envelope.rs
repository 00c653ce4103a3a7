//! Conversions from operation outcomes into the outward `ResultEnvelope`.

use doc_index_shared::ResultEnvelope;

use crate::errors::DocIndexError;
use crate::types::{
    BatchOperationSummary, DocumentOutcome, GetOutcome, IndexOutcome, MultiGetResult,
};

impl From<&IndexOutcome> for ResultEnvelope {
    fn from(outcome: &IndexOutcome) -> Self {
        match outcome {
            IndexOutcome::Acknowledged => ResultEnvelope::success(),
            IndexOutcome::Unacknowledged => {
                ResultEnvelope::success_with("request was not acknowledged")
            }
            IndexOutcome::AlreadyExists => {
                ResultEnvelope::error(ResultEnvelope::CONFLICT, "index already exists")
            }
            IndexOutcome::NotFound => {
                ResultEnvelope::error(ResultEnvelope::NOT_FOUND, "index does not exist")
            }
            IndexOutcome::InvalidInput(reason) => {
                ResultEnvelope::error(ResultEnvelope::BAD_REQUEST, reason.clone())
            }
        }
    }
}

impl From<&DocumentOutcome> for ResultEnvelope {
    fn from(outcome: &DocumentOutcome) -> Self {
        match outcome {
            DocumentOutcome::Written(report) if report.is_degraded() => {
                ResultEnvelope::success_with("write did not reach every shard copy")
            }
            DocumentOutcome::Written(report) => {
                ResultEnvelope::success_with(report.result.as_str())
            }
            DocumentOutcome::NotFound => {
                ResultEnvelope::error(ResultEnvelope::NOT_FOUND, "document does not exist")
            }
            DocumentOutcome::VersionConflict(reason) => {
                ResultEnvelope::error(ResultEnvelope::CONFLICT, reason.clone())
            }
            DocumentOutcome::InvalidInput(reason) => {
                ResultEnvelope::error(ResultEnvelope::BAD_REQUEST, reason.clone())
            }
        }
    }
}

impl From<&GetOutcome> for ResultEnvelope {
    fn from(outcome: &GetOutcome) -> Self {
        match outcome {
            GetOutcome::Found(_) => ResultEnvelope::success(),
            GetOutcome::NotFound => {
                ResultEnvelope::error(ResultEnvelope::NOT_FOUND, "document does not exist")
            }
            GetOutcome::VersionConflict(reason) => {
                ResultEnvelope::error(ResultEnvelope::CONFLICT, reason.clone())
            }
            GetOutcome::InvalidInput(reason) => {
                ResultEnvelope::error(ResultEnvelope::BAD_REQUEST, reason.clone())
            }
        }
    }
}

impl From<&BatchOperationSummary> for ResultEnvelope {
    fn from(summary: &BatchOperationSummary) -> Self {
        if summary.is_rejected() {
            return ResultEnvelope::error(
                ResultEnvelope::BAD_REQUEST,
                format!("no valid items ({} dropped)", summary.dropped.len()),
            );
        }
        if summary.has_failures() {
            return ResultEnvelope::error(
                ResultEnvelope::MULTI_STATUS,
                format!("{} of {} items failed", summary.failed, summary.total),
            );
        }
        ResultEnvelope::success_with(format!("{} items succeeded", summary.succeeded))
    }
}

impl From<&MultiGetResult> for ResultEnvelope {
    fn from(result: &MultiGetResult) -> Self {
        let unresolved = result.missing.len() + result.conflicted.len() + result.failed.len();
        if unresolved == 0 {
            ResultEnvelope::success()
        } else {
            ResultEnvelope::error(
                ResultEnvelope::MULTI_STATUS,
                format!("{} documents not returned", unresolved),
            )
        }
    }
}

impl From<&DocIndexError> for ResultEnvelope {
    fn from(err: &DocIndexError) -> Self {
        match err {
            DocIndexError::BatchSizeExceeded { .. } | DocIndexError::InvalidInput(_) => {
                ResultEnvelope::error(ResultEnvelope::BAD_REQUEST, err.to_string())
            }
            _ => ResultEnvelope::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{ShardInfo, WriteResult};
    use crate::types::WriteReport;

    #[test]
    fn test_index_outcome_codes() {
        assert_eq!(ResultEnvelope::from(&IndexOutcome::Acknowledged).code, 200);
        assert_eq!(ResultEnvelope::from(&IndexOutcome::AlreadyExists).code, 409);
        assert_eq!(ResultEnvelope::from(&IndexOutcome::NotFound).code, 404);
        let invalid = ResultEnvelope::from(&IndexOutcome::InvalidInput("bad".to_string()));
        assert_eq!(invalid.code, 400);
        assert_eq!(invalid.msg.as_deref(), Some("bad"));
    }

    #[test]
    fn test_document_outcome_codes() {
        let written = DocumentOutcome::Written(WriteReport {
            index: "articles".to_string(),
            id: "1".to_string(),
            result: WriteResult::Created,
            shards: ShardInfo::all_successful(2),
        });
        let envelope = ResultEnvelope::from(&written);
        assert_eq!(envelope.code, 200);
        assert_eq!(envelope.msg.as_deref(), Some("created"));

        let conflict = DocumentOutcome::VersionConflict("exists".to_string());
        assert_eq!(ResultEnvelope::from(&conflict).code, 409);
    }

    #[test]
    fn test_batch_summary_codes() {
        assert_eq!(
            ResultEnvelope::from(&BatchOperationSummary::default()).code,
            400
        );

        let partial = BatchOperationSummary {
            total: 3,
            succeeded: 2,
            failed: 1,
            ..Default::default()
        };
        let envelope = ResultEnvelope::from(&partial);
        assert_eq!(envelope.code, 207);
        assert_eq!(envelope.msg.as_deref(), Some("1 of 3 items failed"));
    }

    #[test]
    fn test_error_codes() {
        let err = DocIndexError::batch_size_exceeded(10, 5);
        assert_eq!(ResultEnvelope::from(&err).code, 400);
        let invalid = ResultEnvelope::from(&DocIndexError::invalid_input("index is required"));
        assert_eq!(invalid.code, 400);
        assert_eq!(invalid.msg.as_deref(), Some("Invalid input: index is required"));
        assert_eq!(
            ResultEnvelope::from(&DocIndexError::connection("down")).code,
            500
        );
    }
}
