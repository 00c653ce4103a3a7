//! Dependency initialization and wiring for the document index service.

use std::sync::Arc;

use tracing::{error, info};

use doc_index_repository::{DocIndexClient, EngineClient, OpenSearchEngine};

use crate::config::ServiceSettings;
use crate::ServiceError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The document index client, ready to share between tasks.
    pub client: Arc<DocIndexClient>,
}

impl Dependencies {
    /// Connect to OpenSearch and build the client.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ServiceError::EngineError)` - If the URL or transport is invalid
    /// * `Err(ServiceError::ConfigError)` - If the engine cannot be reached or is unhealthy
    pub async fn new(settings: &ServiceSettings) -> Result<Self, ServiceError> {
        info!(
            opensearch_url = %settings.opensearch_url,
            default_index = %settings.default_index,
            max_batch_size = ?settings.max_batch_size,
            "Initializing dependencies"
        );

        let engine = OpenSearchEngine::new(&settings.opensearch_url).inspect_err(|e| {
            error!(error = %e, "Failed to create OpenSearch client");
        })?;

        Self::with_engine(Arc::new(engine), settings).await
    }

    /// Build the client on an existing engine and verify the cluster is usable.
    pub async fn with_engine(
        engine: Arc<dyn EngineClient>,
        settings: &ServiceSettings,
    ) -> Result<Self, ServiceError> {
        let client = DocIndexClient::with_config(engine, settings.client_config());

        let healthy = client
            .health_check()
            .await
            .map_err(|e| ServiceError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(ServiceError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        Ok(Self {
            client: Arc::new(client),
        })
    }
}
