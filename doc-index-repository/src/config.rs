//! Configuration types for the DocIndexClient.

use std::time::Duration;

/// Index applied to bulk and multi-get items that name none.
pub const DEFAULT_INDEX: &str = "documents";

/// Server-side timeout for searches and bulk batches.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Page size used when a paged search omits one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Configuration for the DocIndexClient.
#[derive(Debug, Clone)]
pub struct DocIndexConfig {
    /// Index used for bulk and multi-get items without an explicit index.
    pub default_index: String,
    /// Maximum number of operations allowed in a single bulk call.
    /// Set to None to disable the limit (not recommended for production).
    pub max_batch_size: Option<usize>,
    /// Timeout sent with searches and bulk batches.
    pub request_timeout: Duration,
    /// Page size used when a paged search omits one.
    pub default_page_size: u32,
}

impl Default for DocIndexConfig {
    fn default() -> Self {
        Self {
            default_index: DEFAULT_INDEX.to_string(),
            max_batch_size: Some(1000),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DocIndexConfig {
    /// Create a config with no batch size limit (use with caution).
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
            ..Self::default()
        }
    }

    /// Create a config with a custom batch size limit.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
            ..Self::default()
        }
    }

    /// Replace the default index.
    pub fn default_index(mut self, index: impl Into<String>) -> Self {
        self.default_index = index.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocIndexConfig::default();
        assert_eq!(config.default_index, "documents");
        assert_eq!(config.max_batch_size, Some(1000));
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.default_page_size, 10);
    }

    #[test]
    fn test_named_constructors() {
        assert_eq!(DocIndexConfig::unlimited().max_batch_size, None);
        let config = DocIndexConfig::with_max_batch_size(5).default_index("articles");
        assert_eq!(config.max_batch_size, Some(5));
        assert_eq!(config.default_index, "articles");
    }
}
