//! MCP Protocol Types
//!
//! JSON-RPC 2.0 message types for the stdio server and the error codes
//! returned to clients.
//!
//! # Error Codes
//!
//! Standard JSON-RPC codes cover malformed traffic. Connector failures use
//! the server-error range, one code per [`ErrorKind`], so clients can react
//! to a lost connection differently from a bad query.

use crate::db::{DatabaseError, ErrorKind};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

// Standard JSON-RPC error codes
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// Connector error codes
pub const CONNECTION_FAILURE: i32 = -32000;
pub const QUERY_FAILURE: i32 = -32001;
pub const CONSTRUCTION_ERROR: i32 = -32002;
pub const STATE_ERROR: i32 = -32003;

fn deserialize_version<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let version = String::deserialize(deserializer)?;
    if version != JSONRPC_VERSION {
        return Err(de::Error::custom(format!(
            "unsupported jsonrpc version '{version}', expected '{JSONRPC_VERSION}'"
        )));
    }
    Ok(version)
}

/// JSON-RPC request; `id` is mandatory
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MCPRequest {
    #[serde(deserialize_with = "deserialize_version")]
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// JSON-RPC notification; has no `id` and receives no response
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MCPNotification {
    #[serde(deserialize_with = "deserialize_version")]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MCPResponse {
    pub jsonrpc: String,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MCPError>,
}

impl MCPResponse {
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: u64, error: MCPError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MCPError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl MCPError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error(message: String) -> Self {
        Self::new(PARSE_ERROR, message)
    }

    pub fn invalid_request(message: String) -> Self {
        Self::new(INVALID_REQUEST, message)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {method}"))
    }

    pub fn invalid_params(message: String) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }

    /// Unknown transaction or cursor handle
    pub fn unknown_handle(kind: &str, id: &str) -> Self {
        Self::new(STATE_ERROR, format!("{kind} {id} not found")).with_data("id", json!(id))
    }

    /// Attach one field to the `data` object, creating it if needed
    pub fn with_data(mut self, key: &str, value: Value) -> Self {
        let data = self.data.get_or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = data {
            map.insert(key.to_string(), value);
        }
        self
    }
}

/// JSON-RPC code for a connector error kind
pub fn code_for(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::ConnectionFailure => CONNECTION_FAILURE,
        ErrorKind::QueryFailure => QUERY_FAILURE,
        ErrorKind::ConstructionError => CONSTRUCTION_ERROR,
        ErrorKind::StateError => STATE_ERROR,
    }
}

impl From<DatabaseError> for MCPError {
    fn from(err: DatabaseError) -> Self {
        let mut error =
            MCPError::new(code_for(err.kind()), err.message()).with_data("kind", json!(err.kind()));
        if let Some(query) = err.query() {
            error = error.with_data("query", json!(query));
        }
        if let Some(params) = err.params() {
            error = error.with_data("params", Value::Object(params.clone()));
        }
        error
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
