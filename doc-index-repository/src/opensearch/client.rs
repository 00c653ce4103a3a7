//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `EngineClient` using the
//! OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{
        IndicesCloseParts, IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts,
        IndicesOpenParts, IndicesPutMappingParts,
    },
    params::Refresh,
    BulkParts, CreateParts, DeleteParts, GetParts, MgetParts, OpenSearch, SearchParts,
    UpdateParts,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::errors::EngineError;
use crate::interfaces::{
    Acknowledgement, BulkRequest, BulkResponse, CreateIndexBody, EngineClient,
    GetDocumentRequest, GetResponse, IndexDocumentRequest, MultiGetRequest, MultiGetResponse,
    RefreshPolicy, SearchRequest, SearchResponse, UpdateDocumentRequest, WriteResponse,
};
use crate::opensearch::{queries, responses};

/// OpenSearch engine client.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use doc_index_repository::{DocIndexClient, OpenSearchEngine};
///
/// let engine = OpenSearchEngine::new("http://localhost:9200")?;
/// let client = DocIndexClient::new(Arc::new(engine));
///
/// client.add_document("articles", "1", r#"{"title":"hello"}"#).await?;
/// ```
pub struct OpenSearchEngine {
    client: OpenSearch,
}

impl OpenSearchEngine {
    /// Create a new engine client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchEngine)` - A new client instance
    /// * `Err(EngineError)` - If the URL is invalid or transport setup fails
    pub fn new(url: &str) -> Result<Self, EngineError> {
        let parsed_url = Url::parse(url).map_err(|e| EngineError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| EngineError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self { client })
    }
}

/// Read a response body, turning a non-success status into an engine error.
async fn read_body(response: Response) -> Result<(u16, Value), EngineError> {
    let status = response.status_code().as_u16();
    let text = response.text().await?;
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) => Value::String(text),
        }
    };
    Ok((status, body))
}

async fn read_success(response: Response) -> Result<Value, EngineError> {
    let (status, body) = read_body(response).await?;
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        let err = responses::error_from_status(status, &body);
        debug!(status, error = %err, "Request rejected");
        Err(err)
    }
}

fn refresh_param(policy: RefreshPolicy) -> Option<Refresh> {
    match policy {
        RefreshPolicy::None => None,
        RefreshPolicy::Immediate => Some(Refresh::True),
        RefreshPolicy::WaitFor => Some(Refresh::WaitFor),
    }
}

#[async_trait]
impl EngineClient for OpenSearchEngine {
    async fn index_exists(&self, index: &str) -> Result<bool, EngineError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(EngineError::status(
                status,
                format!("unexpected status checking index {}", index),
            )),
        }
    }

    async fn create_index(
        &self,
        index: &str,
        body: &CreateIndexBody,
    ) -> Result<Acknowledgement, EngineError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(queries::build_create_index_body(body))
            .send()
            .await?;

        Ok(responses::parse_acknowledgement(&read_success(response).await?))
    }

    async fn delete_index(&self, index: &str) -> Result<Acknowledgement, EngineError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await?;

        Ok(responses::parse_acknowledgement(&read_success(response).await?))
    }

    async fn open_index(&self, index: &str) -> Result<Acknowledgement, EngineError> {
        let response = self
            .client
            .indices()
            .open(IndicesOpenParts::Index(&[index]))
            .send()
            .await?;

        Ok(responses::parse_acknowledgement(&read_success(response).await?))
    }

    async fn close_index(&self, index: &str) -> Result<Acknowledgement, EngineError> {
        let response = self
            .client
            .indices()
            .close(IndicesCloseParts::Index(&[index]))
            .send()
            .await?;

        Ok(responses::parse_acknowledgement(&read_success(response).await?))
    }

    async fn put_mapping(
        &self,
        index: &str,
        mapping: &Value,
    ) -> Result<Acknowledgement, EngineError> {
        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[index]))
            .body(mapping.clone())
            .send()
            .await?;

        Ok(responses::parse_acknowledgement(&read_success(response).await?))
    }

    async fn index_document(
        &self,
        request: &IndexDocumentRequest,
    ) -> Result<WriteResponse, EngineError> {
        // The create endpoint rejects an existing id with 409.
        let response = self
            .client
            .create(CreateParts::IndexId(&request.index, &request.id))
            .body(Value::Object(request.source.clone()))
            .send()
            .await?;

        responses::parse_write(&read_success(response).await?)
    }

    async fn get_document(
        &self,
        request: &GetDocumentRequest,
    ) -> Result<GetResponse, EngineError> {
        let response = self
            .client
            .get(GetParts::IndexId(&request.index, &request.id))
            .realtime(request.realtime)
            .refresh(request.refresh)
            .send()
            .await?;

        let (status, body) = read_body(response).await?;
        responses::parse_get_reply(status, &body)
    }

    async fn update_document(
        &self,
        request: &UpdateDocumentRequest,
    ) -> Result<WriteResponse, EngineError> {
        let response = self
            .client
            .update(UpdateParts::IndexId(&request.index, &request.id))
            .body(queries::build_update_body(&request.change))
            .send()
            .await?;

        responses::parse_write(&read_success(response).await?)
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<WriteResponse, EngineError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .send()
            .await?;

        let (status, body) = read_body(response).await?;
        responses::parse_delete_reply(status, &body)
    }

    async fn bulk(&self, request: &BulkRequest) -> Result<BulkResponse, EngineError> {
        let body: Vec<JsonBody<Value>> = queries::build_bulk_lines(&request.operations)
            .into_iter()
            .map(JsonBody::from)
            .collect();
        let timeout = queries::time_value(request.timeout);

        let mut call = self
            .client
            .bulk(BulkParts::None)
            .timeout(&timeout)
            .body(body);
        if let Some(refresh) = refresh_param(request.refresh) {
            call = call.refresh(refresh);
        }
        let response = call.send().await?;

        let parsed = responses::parse_bulk(&read_success(response).await?)?;
        if parsed.has_failures {
            error!(
                operations = request.operations.len(),
                "Bulk request completed with item failures"
            );
        }
        Ok(parsed)
    }

    async fn multi_get(&self, request: &MultiGetRequest) -> Result<MultiGetResponse, EngineError> {
        let response = self
            .client
            .mget(MgetParts::None)
            .realtime(request.realtime)
            .refresh(request.refresh)
            .body(queries::build_mget_body(&request.docs))
            .send()
            .await?;

        responses::parse_mget(&read_success(response).await?)
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, EngineError> {
        let response = self
            .client
            .search(SearchParts::Index(&[request.index.as_str()]))
            .body(queries::build_search_body(request))
            .send()
            .await?;

        responses::parse_search(&read_success(response).await?)
    }

    async fn health_check(&self) -> Result<bool, EngineError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await?;

        let body = read_success(response).await?;
        let healthy = responses::parse_health(&body);
        let status = body
            .get("status")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown");
        info!(status = %status, "OpenSearch cluster health");
        Ok(healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(matches!(
            OpenSearchEngine::new("not a url"),
            Err(EngineError::ConnectionError(_))
        ));
        assert!(OpenSearchEngine::new("http://localhost:9200").is_ok());
    }

    #[test]
    fn test_refresh_param() {
        assert!(refresh_param(RefreshPolicy::None).is_none());
        assert!(matches!(
            refresh_param(RefreshPolicy::WaitFor),
            Some(Refresh::WaitFor)
        ));
        assert!(matches!(
            refresh_param(RefreshPolicy::Immediate),
            Some(Refresh::True)
        ));
    }
}
