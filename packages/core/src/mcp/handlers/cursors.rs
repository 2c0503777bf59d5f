//! MCP Cursor Handlers
//!
//! Server-side cursors over paginated queries. `cursor_open` validates the
//! page size and registers the cursor without querying; each `cursor_next`
//! pulls one row, fetching a page only when the buffered one is used up.
//! A cursor stays registered after exhaustion and after `cursor_close`, so a
//! repeated close succeeds and later pulls report the cursor's own
//! `StateError`. The session drops every entry on shutdown.

use crate::mcp::handlers::parse_params;
use crate::mcp::handlers::query::to_value;
use crate::mcp::session::McpSession;
use crate::mcp::types::MCPError;
use crate::models::Params;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CursorOpenParams {
    pub query: String,
    #[serde(default)]
    pub params: Params,
    /// Falls back to the connector's default page size
    #[serde(default)]
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CursorIdParams {
    pub cursor_id: String,
}

/// Handle cursor_open MCP request
pub async fn handle_open(session: &McpSession, params: Value) -> Result<Value, MCPError> {
    let params: CursorOpenParams = parse_params(params)?;

    let cursor = session
        .connector()
        .cursor(params.query, params.params, params.page_size)?;
    let page_size = cursor.page_size();
    let state = cursor.state();

    let id = Uuid::new_v4().to_string();
    session.insert_cursor(id.clone(), cursor).await;
    debug!(cursor = %id, %page_size, "cursor opened");

    Ok(json!({
        "cursor_id": id,
        "page_size": page_size,
        "state": state,
    }))
}

/// Handle cursor_next MCP request
pub async fn handle_next(session: &McpSession, params: Value) -> Result<Value, MCPError> {
    let params: CursorIdParams = parse_params(params)?;
    let mut cursor = session.take_cursor(&params.cursor_id).await?;

    let outcome = cursor.next().await;
    let state = cursor.state();
    session.restore_cursor(params.cursor_id.clone(), cursor).await;

    let step = outcome
        .map_err(|e| MCPError::from(e).with_data("cursor_id", json!(params.cursor_id)))?;

    let mut value = to_value(&step)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("state".to_string(), json!(state));
    }
    Ok(value)
}

/// Handle cursor_all MCP request
pub async fn handle_all(session: &McpSession, params: Value) -> Result<Value, MCPError> {
    let params: CursorIdParams = parse_params(params)?;
    let mut cursor = session.take_cursor(&params.cursor_id).await?;

    let outcome = cursor.all().await;
    let state = cursor.state();
    session.restore_cursor(params.cursor_id.clone(), cursor).await;

    let rows = outcome
        .map_err(|e| MCPError::from(e).with_data("cursor_id", json!(params.cursor_id)))?;

    Ok(json!({
        "count": rows.len(),
        "rows": rows,
        "state": state,
    }))
}

/// Handle cursor_close MCP request
pub async fn handle_close(session: &McpSession, params: Value) -> Result<Value, MCPError> {
    let params: CursorIdParams = parse_params(params)?;
    let mut cursor = session.take_cursor(&params.cursor_id).await?;

    cursor.close();
    debug!(
        cursor = %params.cursor_id,
        rows = cursor.rows_yielded(),
        "cursor closed"
    );

    let response = json!({
        "cursor_id": params.cursor_id,
        "state": cursor.state(),
        "rows_yielded": cursor.rows_yielded(),
    });
    session.restore_cursor(params.cursor_id, cursor).await;
    Ok(response)
}
