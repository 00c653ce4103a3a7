//! Search result shapes returned to callers.

use serde::{Deserialize, Serialize};

use crate::document::DocumentRecord;

/// One shard's failure report, as returned by writes and searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardFailure {
    /// Index the shard belongs to, when the engine reports it.
    pub index: Option<String>,
    /// Shard number, when the engine reports it.
    pub shard: Option<u32>,
    /// Engine-supplied reason.
    pub reason: String,
}

impl ShardFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            index: None,
            shard: None,
            reason: reason.into(),
        }
    }
}

/// Result of an unpaged search.
///
/// Hits come back in sort order, up to the engine's default result window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHits {
    pub records: Vec<DocumentRecord>,
    /// Shards that failed while the rest of the search succeeded.
    pub shard_failures: Vec<ShardFailure>,
}

impl SearchHits {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_partial(&self) -> bool {
        !self.shard_failures.is_empty()
    }
}

/// One page of a paged search.
///
/// Paging is offset based (`page_number * page_size` skipped). Deep pages get
/// progressively more expensive on a sharded index and are capped by the engine's
/// max result window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagedSearchResult {
    /// Zero-based page number.
    pub page_number: u32,
    pub page_size: u32,
    /// Total matching documents, independent of the page.
    pub total: u64,
    pub records: Vec<DocumentRecord>,
    pub shard_failures: Vec<ShardFailure>,
}

impl PagedSearchResult {
    /// Number of pages needed to cover `total` at the current page size.
    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page_number) + 1 < self.page_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page_number: u32, page_size: u32, total: u64) -> PagedSearchResult {
        PagedSearchResult {
            page_number,
            page_size,
            total,
            ..Default::default()
        }
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page(0, 10, 25).page_count(), 3);
        assert_eq!(page(0, 10, 30).page_count(), 3);
        assert_eq!(page(0, 10, 0).page_count(), 0);
        assert_eq!(page(0, 0, 25).page_count(), 0);
    }

    #[test]
    fn test_has_next() {
        assert!(page(0, 10, 25).has_next());
        assert!(page(1, 10, 25).has_next());
        assert!(!page(2, 10, 25).has_next());
    }
}
