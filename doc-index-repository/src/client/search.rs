//! Unpaged and paged search.

use tracing::{debug, error, instrument, warn};

use doc_index_shared::{
    PagedSearchResult, QueryDescriptor, SearchHits, ShardFailure, SortDescriptor,
};

use super::DocIndexClient;
use crate::errors::DocIndexError;
use crate::interfaces::{SearchRequest, SearchResponse};

impl DocIndexClient {
    /// Run a query and return hits in sort order.
    ///
    /// No paging is applied, so the engine's default result window bounds the hits.
    /// Without a sort, hits are ordered by `_id` descending. A blank index is
    /// rejected before the engine is called.
    #[instrument(skip(self, query, sort))]
    pub async fn search(
        &self,
        index: &str,
        query: &QueryDescriptor,
        sort: Option<&SortDescriptor>,
    ) -> Result<SearchHits, DocIndexError> {
        let request = self.search_request(index, query, sort, None, false)?;
        let response = self.execute_search(&request).await?;

        Ok(SearchHits {
            records: response.hits,
            shard_failures: response.shard_failures,
        })
    }

    /// Run a query and return one page of hits.
    ///
    /// Pages are zero-based. A missing page number means the first page and a
    /// missing page size means the configured default.
    #[instrument(skip(self, query, sort))]
    pub async fn search_page(
        &self,
        index: &str,
        query: &QueryDescriptor,
        sort: Option<&SortDescriptor>,
        page_number: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<PagedSearchResult, DocIndexError> {
        let page_number = page_number.unwrap_or(0);
        let page_size = page_size.unwrap_or(self.config.default_page_size);
        let from = u64::from(page_number) * u64::from(page_size);

        let request = self.search_request(
            index,
            query,
            sort,
            Some((from, u64::from(page_size))),
            true,
        )?;
        let response = self.execute_search(&request).await?;

        Ok(PagedSearchResult {
            page_number,
            page_size,
            total: response.total,
            records: response.hits,
            shard_failures: response.shard_failures,
        })
    }

    fn search_request(
        &self,
        index: &str,
        query: &QueryDescriptor,
        sort: Option<&SortDescriptor>,
        window: Option<(u64, u64)>,
        track_total_hits: bool,
    ) -> Result<SearchRequest, DocIndexError> {
        let index = index.trim();
        if index.is_empty() {
            warn!("Search rejected: index is required");
            return Err(DocIndexError::invalid_input("index is required"));
        }

        let sort = sort.cloned().unwrap_or_else(SortDescriptor::default_order);
        Ok(SearchRequest {
            index: index.to_string(),
            query: query.clone(),
            sort: vec![sort],
            from: window.map(|(from, _)| from),
            size: window.map(|(_, size)| size),
            timeout: self.config.request_timeout,
            track_total_hits,
        })
    }

    async fn execute_search(&self, request: &SearchRequest) -> Result<SearchResponse, DocIndexError> {
        let response = self.engine.search(request).await.map_err(|e| {
            error!(index = %request.index, error = %e, "Search failed");
            DocIndexError::from(e)
        })?;

        if response.failed_shards > 0 || !response.shard_failures.is_empty() {
            warn!(
                index = %request.index,
                failed_shards = response.failed_shards,
                "Search completed with shard failures"
            );
            log_shard_failures(&request.index, &response.shard_failures);
        }

        debug!(
            index = %request.index,
            hits = response.hits.len(),
            total = response.total,
            "Search completed"
        );
        Ok(response)
    }
}

fn log_shard_failures(index: &str, failures: &[ShardFailure]) {
    for failure in failures {
        error!(
            index = %index,
            shard_index = ?failure.index,
            shard = ?failure.shard,
            reason = %failure.reason,
            "Shard failed during search"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::super::mock::{EngineCall, MockEngine};
    use super::*;
    use crate::config::DocIndexConfig;
    use doc_index_shared::BoolQuery;

    fn client(engine: &Arc<MockEngine>) -> DocIndexClient {
        DocIndexClient::new(engine.clone())
    }

    async fn last_search(engine: &MockEngine) -> SearchRequest {
        engine
            .calls()
            .await
            .into_iter()
            .rev()
            .find_map(|call| match call {
                EngineCall::Search(request) => Some(request),
                _ => None,
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_page() {
        let engine = Arc::new(MockEngine::new().with_search_hits(25));
        let page = client(&engine)
            .search_page("articles", &QueryDescriptor::match_all(), None, None, None)
            .await
            .unwrap();

        assert_eq!(page.page_number, 0);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.records.len(), 10);
        assert_eq!(page.records[0]["seq"], 0);
        assert!(page.has_next());

        let request = last_search(&engine).await;
        assert_eq!(request.from, Some(0));
        assert_eq!(request.size, Some(10));
        assert!(request.track_total_hits);
    }

    #[tokio::test]
    async fn test_page_offset_is_page_times_size() {
        let engine = Arc::new(MockEngine::new().with_search_hits(25));
        let page = client(&engine)
            .search_page(
                "articles",
                &QueryDescriptor::match_all(),
                None,
                Some(2),
                Some(10),
            )
            .await
            .unwrap();

        assert_eq!(page.total, 25);
        assert_eq!(page.records.len(), 5);
        assert_eq!(page.records[0]["seq"], 20);
        assert!(!page.has_next());
        assert_eq!(last_search(&engine).await.from, Some(20));
    }

    #[tokio::test]
    async fn test_configured_page_size() {
        let engine = Arc::new(MockEngine::new().with_search_hits(25));
        let config = DocIndexConfig {
            default_page_size: 4,
            ..Default::default()
        };
        let client = DocIndexClient::with_config(engine.clone(), config);
        let page = client
            .search_page("articles", &QueryDescriptor::match_all(), None, Some(1), None)
            .await
            .unwrap();

        assert_eq!(page.records.len(), 4);
        assert_eq!(last_search(&engine).await.from, Some(4));
    }

    #[tokio::test]
    async fn test_unpaged_search_returns_all_hits() {
        let engine = Arc::new(MockEngine::new().with_search_hits(25));
        let hits = client(&engine)
            .search("articles", &QueryDescriptor::match_all(), None)
            .await
            .unwrap();

        assert_eq!(hits.len(), 25);
        assert!(!hits.is_partial());

        let request = last_search(&engine).await;
        assert_eq!(request.from, None);
        assert_eq!(request.size, None);
        assert_eq!(request.timeout, Duration::from_secs(120));
    }

    #[tokio::test]
    async fn test_default_sort_is_id_descending() {
        let engine = Arc::new(MockEngine::new());
        client(&engine)
            .search("articles", &QueryDescriptor::match_all(), None)
            .await
            .unwrap();

        let request = last_search(&engine).await;
        assert_eq!(request.sort.len(), 1);
        assert_eq!(request.sort[0].to_value(), json!({"_id": {"order": "desc"}}));
    }

    #[tokio::test]
    async fn test_caller_sort_is_applied() {
        let engine = Arc::new(MockEngine::new());
        let sort = SortDescriptor::asc("published_at");
        client(&engine)
            .search_page(
                "articles",
                &QueryDescriptor::match_all(),
                Some(&sort),
                None,
                None,
            )
            .await
            .unwrap();

        let request = last_search(&engine).await;
        assert_eq!(
            request.sort[0].to_value(),
            json!({"published_at": {"order": "asc"}})
        );
    }

    #[tokio::test]
    async fn test_query_forwarded_verbatim() {
        let engine = Arc::new(MockEngine::new());
        let query = BoolQuery::new()
            .must(json!({"match": {"title": "rust"}}))
            .filter(json!({"term": {"lang": "en"}}))
            .build();
        client(&engine)
            .search("articles", &query, None)
            .await
            .unwrap();

        assert_eq!(last_search(&engine).await.query, query);
    }

    #[tokio::test]
    async fn test_shard_failures_reported() {
        let engine = Arc::new(
            MockEngine::new()
                .with_search_hits(3)
                .with_shard_failures(&["node left", "rejected execution"]),
        );
        let hits = client(&engine)
            .search("articles", &QueryDescriptor::match_all(), None)
            .await
            .unwrap();

        assert_eq!(hits.len(), 3);
        assert!(hits.is_partial());
        assert_eq!(hits.shard_failures.len(), 2);
        assert_eq!(hits.shard_failures[0].reason, "node left");
    }

    #[tokio::test]
    async fn test_blank_index_rejected_without_engine_call() {
        let engine = Arc::new(MockEngine::new().with_search_hits(3));
        let client = client(&engine);

        assert!(matches!(
            client
                .search("   ", &QueryDescriptor::match_all(), None)
                .await,
            Err(DocIndexError::InvalidInput(_))
        ));
        assert!(matches!(
            client
                .search_page("", &QueryDescriptor::match_all(), None, None, None)
                .await,
            Err(DocIndexError::InvalidInput(_))
        ));
        assert!(engine.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_search_transport_failure() {
        let client = DocIndexClient::new(Arc::new(MockEngine::new().unreachable()));
        assert!(matches!(
            client
                .search("articles", &QueryDescriptor::match_all(), None)
                .await,
            Err(DocIndexError::ConnectionError(_))
        ));
    }
}
