//! MCP Transaction Handlers
//!
//! Explicit transactions live in the session registry between requests and
//! are addressed by the id returned from `begin_transaction`. Commit and
//! rollback remove the entry whatever their outcome; a failed query inside
//! a transaction leaves it registered so the client can still roll back.

use crate::mcp::handlers::parse_params;
use crate::mcp::handlers::query::to_value;
use crate::mcp::session::McpSession;
use crate::mcp::types::MCPError;
use crate::models::Params;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct TransactionIdParams {
    pub transaction_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionQueryParams {
    pub transaction_id: String,
    pub query: String,
    #[serde(default)]
    pub params: Params,
}

fn status(transaction_id: &str, status: &str) -> Value {
    json!({
        "transaction_id": transaction_id,
        "metadata": { "status": status }
    })
}

/// Handle begin_transaction MCP request
pub async fn handle_begin(session: &McpSession) -> Result<Value, MCPError> {
    let handle = session.connector().begin_transaction().await?;
    let id = session.insert_transaction(handle).await;

    info!("🔒 Transaction {} opened", id);
    Ok(status(&id, "active"))
}

/// Handle commit_transaction MCP request
pub async fn handle_commit(session: &McpSession, params: Value) -> Result<Value, MCPError> {
    let params: TransactionIdParams = parse_params(params)?;
    let handle = session.take_transaction(&params.transaction_id).await?;

    session
        .connector()
        .commit(handle)
        .await
        .map_err(|e| MCPError::from(e).with_data("transaction_id", json!(params.transaction_id)))?;

    info!("✅ Transaction {} committed", params.transaction_id);
    Ok(status(&params.transaction_id, "committed"))
}

/// Handle rollback_transaction MCP request
pub async fn handle_rollback(session: &McpSession, params: Value) -> Result<Value, MCPError> {
    let params: TransactionIdParams = parse_params(params)?;
    let handle = session.take_transaction(&params.transaction_id).await?;

    session
        .connector()
        .rollback(handle)
        .await
        .map_err(|e| MCPError::from(e).with_data("transaction_id", json!(params.transaction_id)))?;

    info!("↩️  Transaction {} rolled back", params.transaction_id);
    Ok(status(&params.transaction_id, "rolled_back"))
}

/// Handle query_in_transaction MCP request
pub async fn handle_query_in_transaction(
    session: &McpSession,
    params: Value,
) -> Result<Value, MCPError> {
    let params: TransactionQueryParams = parse_params(params)?;
    let id = params.transaction_id;
    let mut handle = session.take_transaction(&id).await?;

    let outcome = session
        .connector()
        .execute_in(&mut handle, &params.query, params.params)
        .await;
    session.restore_transaction(id.clone(), handle).await;

    let result = outcome.map_err(|e| MCPError::from(e).with_data("transaction_id", json!(id)))?;

    let mut value = to_value(&result)?;
    if let Some(metadata) = value.get_mut("metadata").and_then(Value::as_object_mut) {
        metadata.insert("transaction_id".to_string(), json!(id));
        metadata.insert("status".to_string(), json!("active"));
    }
    Ok(value)
}
