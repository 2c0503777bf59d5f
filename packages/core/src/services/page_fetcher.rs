//! Page Fetcher
//!
//! Turns a [`QuerySpec`] into one bounded page of rows per call by appending
//! `SKIP`/`LIMIT` clauses and delegating to the executor. No retries happen
//! here; executor errors surface unchanged in kind. A page larger than the
//! requested limit means the window was not applied and fails as a
//! `QueryFailure`.

use crate::db::{DatabaseError, DbResult, QueryExecutor};
use crate::models::{apply_window, PageSize, QuerySpec, Row};
use std::sync::Arc;
use tracing::debug;

/// One bounded batch of rows
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    rows: Vec<Row>,
    offset: usize,
    is_last: bool,
}

impl Page {
    /// A page is last when it holds fewer rows than were requested
    pub fn new(rows: Vec<Row>, offset: usize, limit: PageSize) -> Self {
        let is_last = rows.len() < limit.get();
        Self {
            rows,
            offset,
            is_last,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Offset this page was fetched at
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_last(&self) -> bool {
        self.is_last
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Fetches pages of a fixed query specification
#[derive(Clone)]
pub struct PageFetcher {
    executor: Arc<dyn QueryExecutor>,
    spec: QuerySpec,
}

impl PageFetcher {
    pub fn new(executor: Arc<dyn QueryExecutor>, spec: QuerySpec) -> Self {
        Self { executor, spec }
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Fetch at most `limit` rows starting at `offset`
    ///
    /// # Errors
    ///
    /// - Any executor error, with the windowed query attached
    /// - `QueryFailure` if the executor returns more than `limit` rows
    pub async fn fetch(&self, offset: usize, limit: PageSize) -> DbResult<Page> {
        let (text, params) = apply_window(
            self.spec.text(),
            self.spec.params(),
            Some(offset as u64),
            Some(limit.get() as u64),
        );

        let result = self
            .executor
            .run(&text, &params)
            .await
            .map_err(|e| e.with_query(text.as_str(), &params))?;

        if result.len() > limit.get() {
            return Err(DatabaseError::query_failure(format!(
                "page at offset {} returned {} rows, more than the limit of {}",
                offset,
                result.len(),
                limit
            ))
            .with_query(text.as_str(), &params));
        }

        let page = Page::new(result.into_rows(), offset, limit);
        debug!(
            offset,
            limit = limit.get(),
            rows = page.len(),
            last = page.is_last(),
            "📄 page fetched"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ErrorKind, InMemoryExecutor, QueryResult, Transaction};
    use crate::models::Params;
    use crate::services::Cursor;
    use async_trait::async_trait;
    use serde_json::json;

    /// Returns its whole row set whatever window is requested
    struct UnwindowedExecutor {
        rows: Vec<Row>,
    }

    #[async_trait]
    impl QueryExecutor for UnwindowedExecutor {
        async fn run(&self, _query: &str, _params: &Params) -> DbResult<QueryResult> {
            Ok(QueryResult::new(self.rows.clone()))
        }

        async fn begin(&self) -> DbResult<Box<dyn Transaction>> {
            Err(DatabaseError::state("transactions unsupported"))
        }
    }

    fn unwindowed(rows: i64) -> Arc<UnwindowedExecutor> {
        Arc::new(UnwindowedExecutor {
            rows: (0..rows).map(|i| Row::new().with("i", i)).collect(),
        })
    }

    fn fetcher(rows: i64, page_size: usize) -> (PageFetcher, Arc<InMemoryExecutor>) {
        let executor = Arc::new(InMemoryExecutor::new(
            (0..rows).map(|i| Row::new().with("i", i)).collect(),
        ));
        let mut params = Params::new();
        params.insert("min_age".to_string(), json!(25));
        let spec = QuerySpec::new(
            "MATCH (p:Person) WHERE p.age > $min_age RETURN p",
            params,
            PageSize::new(page_size).unwrap(),
        )
        .unwrap();
        (PageFetcher::new(executor.clone(), spec), executor)
    }

    #[tokio::test]
    async fn test_fetch_appends_window() {
        let (fetcher, executor) = fetcher(25, 10);

        let page = fetcher.fetch(10, PageSize::new(10).unwrap()).await.unwrap();

        assert_eq!(page.len(), 10);
        assert_eq!(page.offset(), 10);
        assert!(!page.is_last());

        let call = &executor.calls()[0];
        assert_eq!(
            call.query,
            "MATCH (p:Person) WHERE p.age > $min_age RETURN p\nSKIP $cursor_skip\nLIMIT $cursor_limit"
        );
        assert_eq!(call.params["min_age"], 25);
        assert_eq!(call.skip(), Some(10));
        assert_eq!(call.limit(), Some(10));
    }

    #[tokio::test]
    async fn test_short_page_is_last() {
        let (fetcher, _) = fetcher(25, 10);

        let page = fetcher.fetch(20, PageSize::new(10).unwrap()).await.unwrap();

        assert_eq!(page.len(), 5);
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn test_errors_keep_kind_and_carry_query() {
        let (fetcher, executor) = fetcher(5, 10);
        executor.set_offline(true);

        let err = fetcher.fetch(0, PageSize::new(10).unwrap()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
        assert!(err.query().unwrap().ends_with("LIMIT $cursor_limit"));
    }

    #[tokio::test]
    async fn test_oversized_page_is_query_failure() {
        let spec = QuerySpec::new("MATCH (n) RETURN n // every node", Params::new(), PageSize::new(5).unwrap())
            .unwrap();
        let fetcher = PageFetcher::new(unwindowed(12), spec);

        let err = fetcher.fetch(0, PageSize::new(5).unwrap()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::QueryFailure);
        assert!(err.message().contains("12 rows"));
        assert!(err.query().unwrap().ends_with("\nLIMIT $cursor_limit"));
    }

    #[tokio::test]
    async fn test_cursor_over_unwindowed_executor_terminates() {
        let spec = QuerySpec::new("MATCH (n) RETURN n", Params::new(), PageSize::new(5).unwrap()).unwrap();
        let mut cursor = Cursor::new(unwindowed(12), spec);

        let err = cursor.all().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QueryFailure);
        assert_eq!(cursor.rows_yielded(), 0);
        assert!(cursor.next().await.unwrap().done);
    }

    #[tokio::test]
    async fn test_full_page_from_unwindowed_executor_is_accepted() {
        let spec = QuerySpec::new("MATCH (n) RETURN n", Params::new(), PageSize::new(5).unwrap()).unwrap();
        let fetcher = PageFetcher::new(unwindowed(5), spec);

        let page = fetcher.fetch(0, PageSize::new(5).unwrap()).await.unwrap();

        assert_eq!(page.len(), 5);
        assert!(!page.is_last());
    }
}
