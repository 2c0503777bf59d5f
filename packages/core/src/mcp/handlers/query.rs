//! MCP Query Handlers
//!
//! `info`, `query` and `get_schema`: direct wrappers over the connector
//! facade. Results keep the `{rows, metadata}` / `{schema, metadata}` shape
//! clients of the connector expect.

use crate::mcp::handlers::parse_params;
use crate::mcp::session::McpSession;
use crate::mcp::types::MCPError;
use crate::models::Params;
use serde::Deserialize;
use serde_json::{json, Value};

/// Parameters for the query method
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    pub query: String,
    #[serde(default)]
    pub params: Params,
}

/// Handle info MCP request
pub async fn handle_info(session: &McpSession) -> Result<Value, MCPError> {
    let info = session.connector().info().await?;
    to_value(&info)
}

/// Handle query MCP request
pub async fn handle_query(session: &McpSession, params: Value) -> Result<Value, MCPError> {
    let params: QueryParams = parse_params(params)?;

    let result = session
        .connector()
        .query(&params.query, params.params)
        .await?;

    to_value(&result)
}

/// Handle get_schema MCP request
pub async fn handle_get_schema(session: &McpSession) -> Result<Value, MCPError> {
    let schema = session.connector().get_schema().await?;

    Ok(json!({
        "metadata": {
            "node_label_count": schema.node_label_count(),
            "relationship_type_count": schema.relationship_type_count(),
        },
        "schema": schema,
    }))
}

pub(crate) fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, MCPError> {
    serde_json::to_value(value)
        .map_err(|e| MCPError::internal_error(format!("Failed to serialize result: {}", e)))
}
