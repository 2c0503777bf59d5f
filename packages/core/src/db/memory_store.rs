//! In-Memory Executor
//!
//! Deterministic [`QueryExecutor`] that serves a fixed row set instead of
//! evaluating Cypher. It honours the reserved `SKIP`/`LIMIT` window
//! parameters, so page fetching and cursors behave exactly as they would
//! against a real store holding the same rows.
//!
//! Every call is recorded, which lets tests assert how many round trips an
//! operation made and at which offsets. Failures can be injected one-shot
//! (`fail_next`) or persistently (`set_offline`).
//!
//! # Examples
//!
//! ```rust
//! use neo4j_mcp_core::db::{InMemoryExecutor, QueryExecutor};
//! use neo4j_mcp_core::models::{Params, Row};
//!
//! # tokio_test::block_on(async {
//! let executor = InMemoryExecutor::new(vec![Row::new().with("n", 1_i64)])
//!     .with_response("CALL db.labels()", vec![Row::new().with("label", "Person")]);
//!
//! let labels = executor.run("CALL db.labels()", &Params::new()).await.unwrap();
//! assert_eq!(labels.rows[0].get("label").and_then(|v| v.as_str()), Some("Person"));
//! assert_eq!(executor.call_count(), 1);
//! # });
//! ```

use crate::db::{DatabaseError, DbResult, ErrorKind, QueryExecutor, QueryResult, Transaction};
use crate::models::{Params, Row, LIMIT_PARAM, SKIP_PARAM};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// One recorded executor call
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorCall {
    pub query: String,
    pub params: Params,
    pub in_transaction: bool,
}

impl ExecutorCall {
    /// `SKIP` bound of a windowed call
    pub fn skip(&self) -> Option<u64> {
        self.params.get(SKIP_PARAM).and_then(Value::as_u64)
    }

    /// `LIMIT` bound of a windowed call
    pub fn limit(&self) -> Option<u64> {
        self.params.get(LIMIT_PARAM).and_then(Value::as_u64)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    dataset: Vec<Row>,
    responses: Vec<(String, Vec<Row>)>,
    calls: Vec<ExecutorCall>,
    pending_failure: Option<(ErrorKind, String)>,
    offline: bool,
    closed: bool,
    begun: usize,
    committed: usize,
    rolled_back: usize,
}

type SharedState = Arc<Mutex<MemoryState>>;

fn lock(state: &Mutex<MemoryState>) -> MutexGuard<'_, MemoryState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn check_available(state: &mut MemoryState) -> DbResult<()> {
    if state.closed {
        return Err(DatabaseError::connection_failure("executor is closed"));
    }
    if state.offline {
        return Err(DatabaseError::connection_failure("graph store unreachable"));
    }
    Ok(())
}

fn execute(
    state: &Mutex<MemoryState>,
    query: &str,
    params: &Params,
    in_transaction: bool,
) -> DbResult<QueryResult> {
    let mut state = lock(state);
    state.calls.push(ExecutorCall {
        query: query.to_string(),
        params: params.clone(),
        in_transaction,
    });

    check_available(&mut state).map_err(|e| e.with_query(query, params))?;
    if let Some((kind, message)) = state.pending_failure.take() {
        return Err(DatabaseError::new(kind, message).with_query(query, params));
    }

    let source = state
        .responses
        .iter()
        .find(|(pattern, _)| query.contains(pattern.as_str()))
        .map(|(_, rows)| rows)
        .unwrap_or(&state.dataset);

    let skip = params
        .get(SKIP_PARAM)
        .and_then(Value::as_u64)
        .map_or(0, |s| usize::try_from(s).unwrap_or(usize::MAX));
    let limit = params
        .get(LIMIT_PARAM)
        .and_then(Value::as_u64)
        .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

    let rows: Vec<Row> = source.iter().skip(skip).take(limit).cloned().collect();
    debug!(skip, returned = rows.len(), "in-memory query served");

    Ok(QueryResult::new(rows))
}

/// Fixed-dataset executor for tests and local runs
#[derive(Debug, Clone, Default)]
pub struct InMemoryExecutor {
    state: SharedState,
}

impl InMemoryExecutor {
    /// Serve `rows` for every query without a more specific response
    pub fn new(rows: Vec<Row>) -> Self {
        let state = MemoryState {
            dataset: rows,
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Serve `rows` for queries containing `pattern`
    ///
    /// Patterns are checked in registration order; the first match wins.
    pub fn with_response(self, pattern: impl Into<String>, rows: Vec<Row>) -> Self {
        lock(&self.state).responses.push((pattern.into(), rows));
        self
    }

    /// Replace the default dataset
    pub fn set_rows(&self, rows: Vec<Row>) {
        lock(&self.state).dataset = rows;
    }

    /// Fail the next call (query or transaction begin) with `kind`
    pub fn fail_next(&self, kind: ErrorKind, message: impl Into<String>) {
        lock(&self.state).pending_failure = Some((kind, message.into()));
    }

    /// Simulate the store becoming unreachable (or reachable again)
    pub fn set_offline(&self, offline: bool) {
        lock(&self.state).offline = offline;
    }

    pub fn calls(&self) -> Vec<ExecutorCall> {
        lock(&self.state).calls.clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.state).calls.len()
    }

    /// `SKIP` offsets of every windowed call, in call order
    pub fn fetch_offsets(&self) -> Vec<u64> {
        lock(&self.state)
            .calls
            .iter()
            .filter_map(ExecutorCall::skip)
            .collect()
    }

    pub fn transactions_begun(&self) -> usize {
        lock(&self.state).begun
    }

    pub fn transactions_committed(&self) -> usize {
        lock(&self.state).committed
    }

    pub fn transactions_rolled_back(&self) -> usize {
        lock(&self.state).rolled_back
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }
}

#[async_trait]
impl QueryExecutor for InMemoryExecutor {
    async fn run(&self, query: &str, params: &Params) -> DbResult<QueryResult> {
        execute(&self.state, query, params, false)
    }

    async fn begin(&self) -> DbResult<Box<dyn Transaction>> {
        let mut state = lock(&self.state);
        check_available(&mut state)?;
        if let Some((kind, message)) = state.pending_failure.take() {
            return Err(DatabaseError::new(kind, message));
        }
        state.begun += 1;

        Ok(Box::new(MemoryTransaction {
            state: Arc::clone(&self.state),
        }))
    }

    async fn close(&self) -> DbResult<()> {
        lock(&self.state).closed = true;
        Ok(())
    }
}

/// Transaction over the shared in-memory state
///
/// Reads see the dataset directly; commit and rollback only update counters.
struct MemoryTransaction {
    state: SharedState,
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn run(&mut self, query: &str, params: &Params) -> DbResult<QueryResult> {
        execute(&self.state, query, params, true)
    }

    async fn commit(self: Box<Self>) -> DbResult<()> {
        let mut state = lock(&self.state);
        check_available(&mut state)?;
        if let Some((kind, message)) = state.pending_failure.take() {
            return Err(DatabaseError::new(kind, message));
        }
        state.committed += 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DbResult<()> {
        lock(&self.state).rolled_back += 1;
        Ok(())
    }
}
