//! MCP Request Handlers
//!
//! Handler modules for the connector's MCP operations. Every handler takes
//! the raw `params` value and returns a JSON result or an [`MCPError`].

pub mod cursors;
pub mod initialize;
pub mod query;
pub mod transactions;

use crate::mcp::types::MCPError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialize handler parameters; missing params count as an empty object
pub(crate) fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, MCPError> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params)
        .map_err(|e| MCPError::invalid_params(format!("Invalid parameters: {}", e)))
}
