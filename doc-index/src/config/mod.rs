//! Configuration for the document index service.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::time::Duration;

use doc_index_repository::config::{DEFAULT_INDEX, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT};
use doc_index_repository::DocIndexConfig;

use crate::telemetry::LogFormat;
use crate::ServiceError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default maximum bulk batch size.
const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub opensearch_url: String,
    pub default_index: String,
    /// `None` disables the bulk batch size limit.
    pub max_batch_size: Option<usize>,
    pub default_page_size: u32,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            opensearch_url: DEFAULT_OPENSEARCH_URL.to_string(),
            default_index: DEFAULT_INDEX.to_string(),
            max_batch_size: Some(DEFAULT_MAX_BATCH_SIZE),
            default_page_size: DEFAULT_PAGE_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServiceSettings {
    /// Read settings from the process environment, honouring a `.env` file.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `DOC_INDEX_DEFAULT_INDEX`: index for items without one (default: documents)
    /// - `DOC_INDEX_MAX_BATCH_SIZE`: bulk batch limit, 0 for unlimited (default: 1000)
    /// - `DOC_INDEX_DEFAULT_PAGE_SIZE`: page size when a search omits one (default: 10)
    /// - `DOC_INDEX_REQUEST_TIMEOUT_SECS`: search and bulk timeout (default: 120)
    /// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
    pub fn from_env() -> Result<Self, ServiceError> {
        dotenv::dotenv().ok();
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServiceError> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let max_batch_size = match var("DOC_INDEX_MAX_BATCH_SIZE") {
            Some(value) => match parse_number::<usize>("DOC_INDEX_MAX_BATCH_SIZE", &value)? {
                0 => None,
                limit => Some(limit),
            },
            None => defaults.max_batch_size,
        };

        let default_page_size = match var("DOC_INDEX_DEFAULT_PAGE_SIZE") {
            Some(value) => parse_number::<u32>("DOC_INDEX_DEFAULT_PAGE_SIZE", &value)?,
            None => defaults.default_page_size,
        };
        if default_page_size == 0 {
            return Err(ServiceError::config(
                "DOC_INDEX_DEFAULT_PAGE_SIZE must be at least 1",
            ));
        }

        let request_timeout = match var("DOC_INDEX_REQUEST_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_number::<u64>(
                "DOC_INDEX_REQUEST_TIMEOUT_SECS",
                &value,
            )?),
            None => defaults.request_timeout,
        };

        let log_format = match var("LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            opensearch_url: var("OPENSEARCH_URL").unwrap_or(defaults.opensearch_url),
            default_index: var("DOC_INDEX_DEFAULT_INDEX").unwrap_or(defaults.default_index),
            max_batch_size,
            default_page_size,
            request_timeout,
            log_format,
        })
    }

    /// Client configuration derived from these settings.
    pub fn client_config(&self) -> DocIndexConfig {
        DocIndexConfig {
            default_index: self.default_index.clone(),
            max_batch_size: self.max_batch_size,
            request_timeout: self.request_timeout,
            default_page_size: self.default_page_size,
        }
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ServiceError> {
    value
        .trim()
        .parse()
        .map_err(|_| ServiceError::config(format!("{} must be a non-negative integer, got {:?}", name, value)))
}
