//! Cursor - Forward-Only Paginated Result Iterator
//!
//! A [`Cursor`] walks the result of one query page by page. It is an explicit
//! state machine: an offset counter, an exhausted flag and a buffer holding
//! the unread rows of the current page. Rows are handed out one at a time and
//! a new page is fetched only when the buffer runs dry.
//!
//! # States
//!
//! ```text
//!   READY ──fetch──▶ ACTIVE ──empty/short page drained──▶ EXHAUSTED
//!     │                │                                      │
//!     └───────close────┴──────────────close───────────────────┴──▶ CLOSED
//! ```
//!
//! - A short page (fewer rows than the page size) marks the cursor exhausted
//!   at fetch time; its rows are still yielded, then `next` reports done.
//! - A result whose size is an exact multiple of the page size needs one more
//!   fetch, returning zero rows, to detect the end.
//! - Once exhausted, `next` reports done without touching the store.
//! - `close` is idempotent and releases the executor handle; any later pull
//!   fails with `StateError`.
//!
//! # Examples
//!
//! ```rust
//! use neo4j_mcp_core::db::InMemoryExecutor;
//! use neo4j_mcp_core::models::{Params, Row};
//! use neo4j_mcp_core::services::Cursor;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let rows: Vec<Row> = (0..25_i64).map(|i| Row::new().with("i", i)).collect();
//! let executor = Arc::new(InMemoryExecutor::new(rows));
//!
//! let mut cursor = Cursor::open(executor, "MATCH (n) RETURN n", Params::new(), 10).unwrap();
//! let first = cursor.next().await.unwrap();
//! assert!(!first.done);
//!
//! let rest = cursor.all().await.unwrap();
//! assert_eq!(rest.len(), 24);
//! assert!(cursor.next().await.unwrap().done);
//! # });
//! ```

use crate::db::{DatabaseError, DbResult, QueryExecutor};
use crate::models::{PageSize, Params, QuerySpec, Row};
use crate::services::page_fetcher::PageFetcher;
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Lifecycle state of a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CursorState {
    /// No page fetched yet
    Ready,
    /// At least one page fetched and rows may remain
    Active,
    /// Every row has been yielded; terminal
    Exhausted,
    /// Explicitly closed; terminal
    Closed,
}

impl fmt::Display for CursorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CursorState::Ready => "READY",
            CursorState::Active => "ACTIVE",
            CursorState::Exhausted => "EXHAUSTED",
            CursorState::Closed => "CLOSED",
        };
        f.write_str(label)
    }
}

/// Result of one pull: `{done, value}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorStep {
    pub done: bool,
    pub value: Option<Row>,
}

impl CursorStep {
    pub fn done() -> Self {
        Self {
            done: true,
            value: None,
        }
    }

    pub fn row(row: Row) -> Self {
        Self {
            done: false,
            value: Some(row),
        }
    }
}

impl From<Option<Row>> for CursorStep {
    fn from(row: Option<Row>) -> Self {
        row.map_or_else(CursorStep::done, CursorStep::row)
    }
}

/// Stateful, forward-only, single-pass iterator over paginated results
///
/// Not safe for concurrent use: every pull takes `&mut self`.
pub struct Cursor {
    /// `None` once closed; dropping it releases the executor handle
    fetcher: Option<PageFetcher>,
    page_size: PageSize,
    offset: usize,
    exhausted: bool,
    buffer: VecDeque<Row>,
    pages_fetched: usize,
    rows_yielded: usize,
}

impl Cursor {
    /// Create a cursor over a validated query specification
    pub fn new(executor: Arc<dyn QueryExecutor>, spec: QuerySpec) -> Self {
        let page_size = spec.page_size();
        Self {
            fetcher: Some(PageFetcher::new(executor, spec)),
            page_size,
            offset: 0,
            exhausted: false,
            buffer: VecDeque::new(),
            pages_fetched: 0,
            rows_yielded: 0,
        }
    }

    /// Validate inputs and create a cursor
    ///
    /// # Errors
    ///
    /// `ConstructionError` when `page_size <= 0` or `query` is blank. The
    /// store is not contacted.
    pub fn open(
        executor: Arc<dyn QueryExecutor>,
        query: impl Into<String>,
        params: Params,
        page_size: i64,
    ) -> DbResult<Self> {
        let spec = QuerySpec::new(query, params, PageSize::try_from(page_size)?)?;
        Ok(Self::new(executor, spec))
    }

    pub fn state(&self) -> CursorState {
        if self.fetcher.is_none() {
            CursorState::Closed
        } else if self.exhausted && self.buffer.is_empty() {
            CursorState::Exhausted
        } else if self.pages_fetched == 0 {
            CursorState::Ready
        } else {
            CursorState::Active
        }
    }

    /// Offset of the next page to fetch; always a multiple of the page size
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn rows_yielded(&self) -> usize {
        self.rows_yielded
    }

    pub fn spec(&self) -> Option<&QuerySpec> {
        self.fetcher.as_ref().map(PageFetcher::spec)
    }

    /// Yield the next row, or `None` once the result is exhausted
    ///
    /// Fetches a page only when the buffer is empty and the cursor is not
    /// exhausted. A failed fetch exhausts the cursor and returns the error.
    ///
    /// # Errors
    ///
    /// - `StateError` if the cursor is closed
    /// - Any executor error, enriched with the paged query
    pub async fn advance(&mut self) -> DbResult<Option<Row>> {
        let Some(fetcher) = self.fetcher.as_ref() else {
            return Err(DatabaseError::state("cursor is closed"));
        };

        if let Some(row) = self.buffer.pop_front() {
            self.rows_yielded += 1;
            return Ok(Some(row));
        }
        if self.exhausted {
            return Ok(None);
        }

        let page = match fetcher.fetch(self.offset, self.page_size).await {
            Ok(page) => page,
            Err(err) => {
                warn!(offset = self.offset, "❌ page fetch failed, cursor exhausted: {}", err);
                self.exhausted = true;
                return Err(err);
            }
        };
        self.pages_fetched += 1;

        if page.is_empty() {
            self.exhausted = true;
            debug!(
                pages = self.pages_fetched,
                rows = self.rows_yielded,
                "cursor exhausted on empty page"
            );
            return Ok(None);
        }

        if page.is_last() {
            self.exhausted = true;
        }
        self.offset += self.page_size.get();
        self.buffer.extend(page.into_rows());

        let row = self.buffer.pop_front();
        if row.is_some() {
            self.rows_yielded += 1;
        }
        Ok(row)
    }

    /// Pull one row in `{done, value}` form
    pub async fn next(&mut self) -> DbResult<CursorStep> {
        Ok(self.advance().await?.into())
    }

    /// Drain every remaining row
    pub async fn all(&mut self) -> DbResult<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.advance().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Lazily transform each row
    pub fn map<F, T>(self, transform: F) -> MappedCursor<F>
    where
        F: FnMut(Row) -> T,
    {
        MappedCursor {
            cursor: self,
            transform,
        }
    }

    /// Lazily keep only rows matching `predicate`
    pub fn filter<P>(self, predicate: P) -> FilteredCursor<P>
    where
        P: FnMut(&Row) -> bool,
    {
        FilteredCursor {
            cursor: self,
            predicate,
        }
    }

    /// Consume the cursor as a `Stream` of rows
    ///
    /// ```rust
    /// use futures::TryStreamExt;
    /// use neo4j_mcp_core::db::InMemoryExecutor;
    /// use neo4j_mcp_core::models::{Params, Row};
    /// use neo4j_mcp_core::services::Cursor;
    /// use std::sync::Arc;
    ///
    /// # tokio_test::block_on(async {
    /// let executor = Arc::new(InMemoryExecutor::new(vec![Row::new().with("i", 1_i64)]));
    /// let cursor = Cursor::open(executor, "MATCH (n) RETURN n", Params::new(), 5).unwrap();
    ///
    /// let mut stream = Box::pin(cursor.into_stream());
    /// while let Some(row) = stream.try_next().await.unwrap() {
    ///     assert_eq!(row.get("i").and_then(|v| v.as_i64()), Some(1));
    /// }
    /// # });
    /// ```
    pub fn into_stream(self) -> impl Stream<Item = DbResult<Row>> + Send {
        stream::try_unfold(self, |mut cursor| async move {
            Ok(cursor.advance().await?.map(|row| (row, cursor)))
        })
    }

    /// Release the executor handle and drop buffered rows; idempotent
    pub fn close(&mut self) {
        if self.fetcher.take().is_some() {
            self.buffer.clear();
            debug!(
                pages = self.pages_fetched,
                rows = self.rows_yielded,
                "cursor closed"
            );
        }
    }

    pub fn is_closed(&self) -> bool {
        self.fetcher.is_none()
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("state", &self.state())
            .field("offset", &self.offset)
            .field("page_size", &self.page_size)
            .field("buffered", &self.buffer.len())
            .field("pages_fetched", &self.pages_fetched)
            .finish()
    }
}

/// Cursor applying a transform to every row
pub struct MappedCursor<F> {
    cursor: Cursor,
    transform: F,
}

impl<F> MappedCursor<F> {
    pub async fn next<T>(&mut self) -> DbResult<Option<T>>
    where
        F: FnMut(Row) -> T,
    {
        Ok(self.cursor.advance().await?.map(&mut self.transform))
    }

    pub async fn collect<T>(mut self) -> DbResult<Vec<T>>
    where
        F: FnMut(Row) -> T,
    {
        let mut out = Vec::new();
        while let Some(item) = self.next().await? {
            out.push(item);
        }
        Ok(out)
    }

    pub fn close(&mut self) {
        self.cursor.close();
    }

    pub fn into_inner(self) -> Cursor {
        self.cursor
    }
}

/// Cursor yielding only rows that satisfy a predicate
pub struct FilteredCursor<P> {
    cursor: Cursor,
    predicate: P,
}

impl<P> FilteredCursor<P>
where
    P: FnMut(&Row) -> bool,
{
    pub async fn next(&mut self) -> DbResult<Option<Row>> {
        while let Some(row) = self.cursor.advance().await? {
            if (self.predicate)(&row) {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    pub async fn collect(mut self) -> DbResult<Vec<Row>> {
        let mut out = Vec::new();
        while let Some(row) = self.next().await? {
            out.push(row);
        }
        Ok(out)
    }

    pub fn close(&mut self) {
        self.cursor.close();
    }

    pub fn into_inner(self) -> Cursor {
        self.cursor
    }
}

#[cfg(test)]
#[path = "cursor_test.rs"]
mod cursor_test;
