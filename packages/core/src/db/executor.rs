//! QueryExecutor Trait - Graph Store Abstraction
//!
//! The connector treats the graph store as an opaque executor of
//! parameterized queries. Everything above this trait (page fetching,
//! cursors, the connector facade, the MCP and REST surfaces) is written
//! against it, so the Bolt driver and the in-memory test store are
//! interchangeable.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: every call is awaited to completion by its caller; there
//!    is no fetch-ahead or background work behind these methods
//! 2. **Caller-owned transactions**: `begin` hands back a boxed [`Transaction`]
//!    that the caller holds across calls and finally consumes with `commit` or
//!    `rollback`
//! 3. **Typed errors**: all methods return [`DatabaseError`] so the failure kind
//!    survives every layer unchanged

use crate::db::DbResult;
use crate::models::{Params, Row};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Execution summary of one query
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuerySummary {
    pub row_count: usize,
    /// Wall-clock time until the result was consumed, when measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_time_ms: Option<u64>,
    /// Always false: results are returned whole
    pub has_more: bool,
    /// Non-zero write counters (e.g. `nodes_created`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub counters: BTreeMap<String, i64>,
}

/// Rows plus summary of one executed query
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub rows: Vec<Row>,
    #[serde(rename = "metadata")]
    pub summary: QuerySummary,
}

impl QueryResult {
    pub fn new(rows: Vec<Row>) -> Self {
        let summary = QuerySummary {
            row_count: rows.len(),
            ..Default::default()
        };
        Self { rows, summary }
    }

    pub fn with_query_time(mut self, millis: u64) -> Self {
        self.summary.query_time_ms = Some(millis);
        self
    }

    /// Record a write counter; zero values are dropped
    pub fn with_counter(mut self, name: impl Into<String>, value: i64) -> Self {
        if value != 0 {
            self.summary.counters.insert(name.into(), value);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

/// Executes parameterized queries against the graph store
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the executor is shared behind an
/// `Arc` by the facade, every cursor it opens, and the server state.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run one query in an auto-commit transaction and collect all rows
    ///
    /// # Errors
    ///
    /// - `ConnectionFailure` if the store cannot be reached
    /// - `QueryFailure` for syntax errors or constraint violations
    async fn run(&self, query: &str, params: &Params) -> DbResult<QueryResult>;

    /// Open an explicit transaction owned by the caller
    async fn begin(&self) -> DbResult<Box<dyn Transaction>>;

    /// Release pooled connections; later calls may fail with `ConnectionFailure`
    async fn close(&self) -> DbResult<()> {
        Ok(())
    }
}

/// An open explicit transaction
#[async_trait]
pub trait Transaction: Send {
    /// Run one query inside the transaction
    async fn run(&mut self, query: &str, params: &Params) -> DbResult<QueryResult>;

    /// Commit and consume the transaction
    async fn commit(self: Box<Self>) -> DbResult<()>;

    /// Roll back and consume the transaction
    async fn rollback(self: Box<Self>) -> DbResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_metadata_keys() {
        let result = QueryResult::new(vec![Row::new().with("n", 1_i64)])
            .with_query_time(7)
            .with_counter("nodes_created", 1)
            .with_counter("relationships_created", 0);

        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(
            value["metadata"],
            json!({
                "row_count": 1,
                "query_time_ms": 7,
                "has_more": false,
                "counters": {"nodes_created": 1},
            })
        );
    }

    #[test]
    fn test_unmeasured_summary_omits_optional_keys() {
        let value = serde_json::to_value(QueryResult::new(vec![])).unwrap();

        assert_eq!(value["metadata"], json!({"row_count": 0, "has_more": false}));
    }
}
