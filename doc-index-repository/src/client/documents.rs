//! Single-document writes and reads.

use tracing::{error, info, instrument, warn};

use doc_index_shared::parse_record;

use super::{log_shard_info, validate_target, DocIndexClient};
use crate::errors::{DocIndexError, EngineError};
use crate::interfaces::{
    GetDocumentRequest, IndexDocumentRequest, UpdateChange, UpdateDocumentRequest, WriteResponse,
    WriteResult,
};
use crate::types::{DocumentOutcome, GetOutcome};

impl DocIndexClient {
    /// Insert a new document under an explicit id.
    ///
    /// The payload must be a JSON object. The index is created with default settings
    /// if it does not exist yet. An existing id is reported as a version conflict.
    #[instrument(skip(self, payload))]
    pub async fn add_document(
        &self,
        index: &str,
        id: &str,
        payload: &str,
    ) -> Result<DocumentOutcome, DocIndexError> {
        if let Err(reason) = validate_target(index, id) {
            error!(reason = %reason, "Rejected document insert");
            return Ok(DocumentOutcome::InvalidInput(reason));
        }
        let Some(source) = parse_record(payload) else {
            error!(index = %index, id = %id, "Document is not a valid JSON object");
            return Ok(DocumentOutcome::InvalidInput(
                "document is not a valid JSON object".to_string(),
            ));
        };

        self.ensure_index(index).await?;

        let request = IndexDocumentRequest {
            index: index.to_string(),
            id: id.to_string(),
            source,
        };
        match self.engine.index_document(&request).await {
            Ok(response) => Ok(written(response)),
            Err(e) => absorb_write_error(e, index, id),
        }
    }

    /// Fetch one document.
    ///
    /// Reads are not realtime; the shard is refreshed first so recent writes show.
    #[instrument(skip(self))]
    pub async fn get_document(&self, index: &str, id: &str) -> Result<GetOutcome, DocIndexError> {
        if let Err(reason) = validate_target(index, id) {
            error!(reason = %reason, "Rejected document fetch");
            return Ok(GetOutcome::InvalidInput(reason));
        }

        let request = GetDocumentRequest {
            index: index.to_string(),
            id: id.to_string(),
            realtime: false,
            refresh: true,
        };
        match self.engine.get_document(&request).await {
            Ok(response) => match response.source {
                Some(source) if response.found => Ok(GetOutcome::Found(source)),
                _ => {
                    warn!(index = %index, id = %id, "Document not found");
                    Ok(GetOutcome::NotFound)
                }
            },
            Err(EngineError::NotFound(reason)) => {
                warn!(index = %index, id = %id, reason = %reason, "Document not found");
                Ok(GetOutcome::NotFound)
            }
            Err(EngineError::VersionConflict(reason)) => {
                warn!(index = %index, id = %id, reason = %reason, "Version conflict on fetch");
                Ok(GetOutcome::VersionConflict(reason))
            }
            Err(e) => {
                error!(index = %index, id = %id, error = %e, "Failed to fetch document");
                Err(e.into())
            }
        }
    }

    /// Delete one document. Deleting a missing document is reported, not raised.
    #[instrument(skip(self))]
    pub async fn delete_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<DocumentOutcome, DocIndexError> {
        if let Err(reason) = validate_target(index, id) {
            error!(reason = %reason, "Rejected document delete");
            return Ok(DocumentOutcome::InvalidInput(reason));
        }

        match self.engine.delete_document(index, id).await {
            Ok(response) if response.result == WriteResult::NotFound => {
                log_shard_info(&response.shards, index, id);
                warn!(index = %index, id = %id, "Document to delete does not exist");
                Ok(DocumentOutcome::NotFound)
            }
            Ok(response) => Ok(written(response)),
            Err(e) => absorb_write_error(e, index, id),
        }
    }

    /// Run an inline script against a stored document.
    ///
    /// The script is forwarded verbatim; it may update, delete or leave the
    /// document untouched, and the outcome's result says which.
    #[instrument(skip(self, script))]
    pub async fn update_document_by_script(
        &self,
        index: &str,
        id: &str,
        script: &str,
    ) -> Result<DocumentOutcome, DocIndexError> {
        if let Err(reason) = validate_target(index, id) {
            error!(reason = %reason, "Rejected scripted update");
            return Ok(DocumentOutcome::InvalidInput(reason));
        }
        if script.trim().is_empty() {
            error!(index = %index, id = %id, "Update script is empty");
            return Ok(DocumentOutcome::InvalidInput("script is required".to_string()));
        }

        let request = UpdateDocumentRequest {
            index: index.to_string(),
            id: id.to_string(),
            change: UpdateChange::Script(script.to_string()),
        };
        match self.engine.update_document(&request).await {
            Ok(response) => Ok(written(response)),
            Err(e) => absorb_write_error(e, index, id),
        }
    }

    /// Merge fields into a document, creating it when missing.
    #[instrument(skip(self, payload))]
    pub async fn update_document_by_json(
        &self,
        index: &str,
        id: &str,
        payload: &str,
    ) -> Result<DocumentOutcome, DocIndexError> {
        if let Err(reason) = validate_target(index, id) {
            error!(reason = %reason, "Rejected document update");
            return Ok(DocumentOutcome::InvalidInput(reason));
        }
        let Some(doc) = parse_record(payload) else {
            error!(index = %index, id = %id, "Update is not a valid JSON object");
            return Ok(DocumentOutcome::InvalidInput(
                "document is not a valid JSON object".to_string(),
            ));
        };

        self.ensure_index(index).await?;

        let request = UpdateDocumentRequest {
            index: index.to_string(),
            id: id.to_string(),
            change: UpdateChange::Merge { doc, upsert: true },
        };
        match self.engine.update_document(&request).await {
            Ok(response) => Ok(written(response)),
            Err(e) => absorb_write_error(e, index, id),
        }
    }
}

fn written(response: WriteResponse) -> DocumentOutcome {
    log_shard_info(&response.shards, &response.index, &response.id);
    match response.result {
        WriteResult::Noop => {
            warn!(index = %response.index, id = %response.id, "Write left the document unchanged")
        }
        result => {
            info!(index = %response.index, id = %response.id, result = result.as_str(), "Document written")
        }
    }
    DocumentOutcome::Written(response.into())
}

/// Turn the engine's not-found and conflict answers into outcomes.
fn absorb_write_error(
    err: EngineError,
    index: &str,
    id: &str,
) -> Result<DocumentOutcome, DocIndexError> {
    match err {
        EngineError::NotFound(reason) => {
            warn!(index = %index, id = %id, reason = %reason, "Document or index not found");
            Ok(DocumentOutcome::NotFound)
        }
        EngineError::VersionConflict(reason) => {
            warn!(index = %index, id = %id, reason = %reason, "Version conflict");
            Ok(DocumentOutcome::VersionConflict(reason))
        }
        e => {
            error!(index = %index, id = %id, error = %e, "Document write failed");
            Err(e.into())
        }
    }
}
