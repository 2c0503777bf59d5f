//! MCP Session State
//!
//! JSON-RPC is stateless per request, but transactions and cursors span
//! several requests. The session keeps them in registries keyed by
//! generated ids.
//!
//! # Concurrency
//!
//! Each registry sits behind a `tokio::sync::Mutex`. A handler takes an
//! entry out, works on it without holding the lock, and puts it back. While
//! an entry is checked out, other requests naming the same id see it as
//! unknown, so an entry is only ever used by one request at a time.

use crate::mcp::types::MCPError;
use crate::services::{Cursor, GraphConnector, TransactionHandle};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub struct McpSession {
    connector: GraphConnector,
    transactions: Mutex<HashMap<String, TransactionHandle>>,
    cursors: Mutex<HashMap<String, Cursor>>,
}

impl McpSession {
    pub fn new(connector: GraphConnector) -> Self {
        Self {
            connector,
            transactions: Mutex::new(HashMap::new()),
            cursors: Mutex::new(HashMap::new()),
        }
    }

    pub fn connector(&self) -> &GraphConnector {
        &self.connector
    }

    /// Register a transaction and return its id
    pub async fn insert_transaction(&self, handle: TransactionHandle) -> String {
        let id = handle.id().to_string();
        self.transactions.lock().await.insert(id.clone(), handle);
        id
    }

    /// Check out a transaction
    pub async fn take_transaction(&self, id: &str) -> Result<TransactionHandle, MCPError> {
        self.transactions
            .lock()
            .await
            .remove(id)
            .ok_or_else(|| MCPError::unknown_handle("Transaction", id))
    }

    /// Return a checked-out transaction
    pub async fn restore_transaction(&self, id: String, handle: TransactionHandle) {
        self.transactions.lock().await.insert(id, handle);
    }

    pub async fn open_transactions(&self) -> usize {
        self.transactions.lock().await.len()
    }

    /// Register a cursor and return its id
    pub async fn insert_cursor(&self, id: String, cursor: Cursor) {
        self.cursors.lock().await.insert(id, cursor);
    }

    /// Check out a cursor
    pub async fn take_cursor(&self, id: &str) -> Result<Cursor, MCPError> {
        self.cursors
            .lock()
            .await
            .remove(id)
            .ok_or_else(|| MCPError::unknown_handle("Cursor", id))
    }

    /// Return a checked-out cursor
    pub async fn restore_cursor(&self, id: String, cursor: Cursor) {
        self.cursors.lock().await.insert(id, cursor);
    }

    /// Registered cursors that have not been closed
    pub async fn open_cursors(&self) -> usize {
        self.cursors
            .lock()
            .await
            .values()
            .filter(|cursor| !cursor.is_closed())
            .count()
    }

    /// Roll back open transactions and close open cursors
    ///
    /// Called when the client disconnects.
    pub async fn shutdown(&self) {
        let transactions: Vec<_> = self.transactions.lock().await.drain().collect();
        let abandoned = transactions.len();
        for (id, handle) in transactions {
            if let Err(e) = self.connector.rollback(handle).await {
                warn!("Failed to roll back abandoned transaction {}: {}", id, e);
            }
        }

        let mut cursors = self.cursors.lock().await;
        let mut open = 0;
        for cursor in cursors.values_mut().filter(|cursor| !cursor.is_closed()) {
            cursor.close();
            open += 1;
        }
        cursors.clear();

        if abandoned > 0 || open > 0 {
            info!(
                "🧹 Session cleanup: {} transactions rolled back, {} cursors closed",
                abandoned, open
            );
        }
    }
}
