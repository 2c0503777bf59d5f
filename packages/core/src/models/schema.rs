//! Schema and Connector Metadata
//!
//! Sampled schema of the graph (labels, relationship types, property type
//! names) plus the connector/database descriptors reported by `info`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// MCP protocol version advertised by the connector
pub const MCP_VERSION: &str = "1.0";

/// Property name → type name, sampled from one entity
pub type PropertyTypes = BTreeMap<String, String>;

/// Schema entry for one node label
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelSchema {
    pub properties: PropertyTypes,
}

/// Schema entry for one relationship type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RelationshipSchema {
    pub properties: PropertyTypes,
    /// (source labels, target labels) observed on sampled relationships
    pub connects: (Vec<String>, Vec<String>),
}

/// Sampled graph schema
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSchema {
    pub nodes: BTreeMap<String, LabelSchema>,
    pub relationships: BTreeMap<String, RelationshipSchema>,
}

impl GraphSchema {
    pub fn node_label_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn relationship_type_count(&self) -> usize {
        self.relationships.len()
    }
}

/// Type name reported for a sampled property value
pub fn property_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Server component reported by `CALL dbms.components()`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatabaseInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
}

/// Operations the connector supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub query: bool,
    pub schema: bool,
    pub transaction: bool,
    pub write: bool,
    pub subscribe: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            query: true,
            schema: true,
            transaction: true,
            write: true,
            subscribe: false,
        }
    }
}

/// Backing database descriptor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatabaseDescriptor {
    #[serde(rename = "type")]
    pub db_type: String,
    pub info: DatabaseInfo,
}

/// Result of the `info` operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorInfo {
    pub mcp_version: String,
    pub capabilities: Capabilities,
    pub database: DatabaseDescriptor,
}

impl ConnectorInfo {
    pub fn neo4j(info: DatabaseInfo) -> Self {
        Self {
            mcp_version: MCP_VERSION.to_string(),
            capabilities: Capabilities::default(),
            database: DatabaseDescriptor {
                db_type: "neo4j".to_string(),
                info,
            },
        }
    }
}
