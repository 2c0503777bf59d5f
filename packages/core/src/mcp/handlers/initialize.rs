//! MCP Initialize Handler
//!
//! Handles the initialization handshake and capability discovery. This is
//! the first method a client calls; it never touches the database.

use crate::mcp::types::MCPError;
use crate::models::{Capabilities, MCP_VERSION};
use serde_json::{json, Value};

/// Supported MCP protocol versions (for backward compatibility)
const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

/// Methods served by the stdio server
pub const METHODS: &[&str] = &[
    "initialize",
    "info",
    "query",
    "get_schema",
    "begin_transaction",
    "commit_transaction",
    "rollback_transaction",
    "query_in_transaction",
    "cursor_open",
    "cursor_next",
    "cursor_all",
    "cursor_close",
];

/// Handle MCP initialize request
///
/// Echoes the client's protocol version when supported and returns the
/// connector capabilities plus the list of served methods.
///
/// # Errors
///
/// - `INVALID_PARAMS` if `protocolVersion` is missing
/// - `INVALID_REQUEST` if the version is not supported
pub fn handle_initialize(params: Value) -> Result<Value, MCPError> {
    let client_version = params["protocolVersion"]
        .as_str()
        .ok_or_else(|| MCPError::invalid_params("Missing protocolVersion parameter".to_string()))?;

    if !SUPPORTED_PROTOCOL_VERSIONS.contains(&client_version) {
        return Err(MCPError::invalid_request(format!(
            "Unsupported protocol version: {}. Server supports: {:?}",
            client_version, SUPPORTED_PROTOCOL_VERSIONS
        )));
    }

    Ok(json!({
        "protocolVersion": client_version,
        "serverInfo": {
            "name": "neo4j-mcp-server",
            "version": env!("CARGO_PKG_VERSION")
        },
        "mcp_version": MCP_VERSION,
        "capabilities": Capabilities::default(),
        "methods": METHODS,
    }))
}

#[cfg(test)]
#[path = "initialize_test.rs"]
mod initialize_test;
