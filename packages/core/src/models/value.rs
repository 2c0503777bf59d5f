//! Graph Value Model
//!
//! Result cells returned by the graph store are either plain scalars or
//! structured graph entities. This module models them as a tagged enum so
//! callers match on the variant instead of probing untyped maps.
//!
//! # Wire Format
//!
//! Scalars serialize as the raw JSON value. Structured values serialize as
//! objects tagged with `__type`:
//!
//! ```json
//! {"__type": "node", "id": 7, "labels": ["Person"], "properties": {"name": "Ada"}}
//! {"__type": "relationship", "id": 3, "type": "KNOWS", "properties": {},
//!  "start_node_id": 7, "end_node_id": 9}
//! {"__type": "path", "nodes": [...], "relationships": [...]}
//! ```
//!
//! Deserialization recognizes the tag; anything else (including a malformed
//! tagged object) is kept as a `Scalar`.
//!
//! # Examples
//!
//! ```rust
//! use neo4j_mcp_core::models::{GraphNode, GraphValue};
//! use serde_json::json;
//!
//! let node = GraphNode::new(7, vec!["Person".to_string()], json!({"name": "Ada"}));
//! let value = GraphValue::Node(node);
//!
//! assert_eq!(value.property("name"), Some(&json!("Ada")));
//! assert_eq!(serde_json::to_value(&value).unwrap()["__type"], "node");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Property mapping carried by nodes and relationships
pub type Properties = Map<String, Value>;

const TYPE_TAG: &str = "__type";

/// A node as returned by the graph store
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphNode {
    /// Store-assigned identifier, absent when the store did not report one
    pub id: Option<i64>,
    pub labels: Vec<String>,
    pub properties: Properties,
}

impl GraphNode {
    /// Create a node with an identifier, labels and a JSON object of properties
    ///
    /// Non-object `properties` values are treated as an empty mapping.
    pub fn new(id: i64, labels: Vec<String>, properties: Value) -> Self {
        Self {
            id: Some(id),
            labels,
            properties: into_properties(properties),
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    fn to_json(&self) -> Value {
        json!({
            TYPE_TAG: "node",
            "id": self.id,
            "labels": self.labels,
            "properties": self.properties,
        })
    }

    fn from_json(object: &Map<String, Value>) -> Option<Self> {
        let labels = object
            .get("labels")?
            .as_array()?
            .iter()
            .map(|label| label.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            id: object.get("id").and_then(Value::as_i64),
            labels,
            properties: properties_field(object),
        })
    }
}

/// A relationship as returned by the graph store
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphRelationship {
    pub id: Option<i64>,
    /// Relationship type name (e.g. `KNOWS`)
    pub rel_type: String,
    pub properties: Properties,
    pub start_node_id: Option<i64>,
    pub end_node_id: Option<i64>,
}

impl GraphRelationship {
    /// Create a relationship between two node identifiers
    pub fn new(
        id: i64,
        rel_type: impl Into<String>,
        start_node_id: i64,
        end_node_id: i64,
        properties: Value,
    ) -> Self {
        Self {
            id: Some(id),
            rel_type: rel_type.into(),
            properties: into_properties(properties),
            start_node_id: Some(start_node_id),
            end_node_id: Some(end_node_id),
        }
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    fn to_json(&self) -> Value {
        json!({
            TYPE_TAG: "relationship",
            "id": self.id,
            "type": self.rel_type,
            "properties": self.properties,
            "start_node_id": self.start_node_id,
            "end_node_id": self.end_node_id,
        })
    }

    fn from_json(object: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            id: object.get("id").and_then(Value::as_i64),
            rel_type: object.get("type")?.as_str()?.to_string(),
            properties: properties_field(object),
            start_node_id: object.get("start_node_id").and_then(Value::as_i64),
            end_node_id: object.get("end_node_id").and_then(Value::as_i64),
        })
    }
}

/// An alternating walk of nodes and relationships
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphPath {
    pub nodes: Vec<GraphNode>,
    pub relationships: Vec<GraphRelationship>,
}

impl GraphPath {
    /// Number of relationships traversed
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    fn to_json(&self) -> Value {
        let nodes: Vec<Value> = self.nodes.iter().map(GraphNode::to_json).collect();
        let relationships: Vec<Value> = self
            .relationships
            .iter()
            .map(GraphRelationship::to_json)
            .collect();

        json!({
            TYPE_TAG: "path",
            "nodes": nodes,
            "relationships": relationships,
        })
    }

    fn from_json(object: &Map<String, Value>) -> Option<Self> {
        let nodes = object
            .get("nodes")?
            .as_array()?
            .iter()
            .map(|node| node.as_object().and_then(GraphNode::from_json))
            .collect::<Option<Vec<_>>>()?;
        let relationships = object
            .get("relationships")?
            .as_array()?
            .iter()
            .map(|rel| rel.as_object().and_then(GraphRelationship::from_json))
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            nodes,
            relationships,
        })
    }
}

/// One result cell: a scalar or a structured graph entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Value", from = "Value")]
pub enum GraphValue {
    Scalar(Value),
    Node(GraphNode),
    Relationship(GraphRelationship),
    Path(GraphPath),
}

impl GraphValue {
    /// Short name of the variant, used in logs and schema reports
    pub fn kind(&self) -> &'static str {
        match self {
            GraphValue::Scalar(_) => "scalar",
            GraphValue::Node(_) => "node",
            GraphValue::Relationship(_) => "relationship",
            GraphValue::Path(_) => "path",
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            GraphValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&GraphNode> {
        match self {
            GraphValue::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_relationship(&self) -> Option<&GraphRelationship> {
        match self {
            GraphValue::Relationship(rel) => Some(rel),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&GraphPath> {
        match self {
            GraphValue::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_scalar().and_then(Value::as_i64)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GraphValue::Scalar(Value::Null))
    }

    /// Property lookup on nodes, relationships and JSON-object scalars
    pub fn property(&self, key: &str) -> Option<&Value> {
        match self {
            GraphValue::Node(node) => node.property(key),
            GraphValue::Relationship(rel) => rel.property(key),
            GraphValue::Scalar(Value::Object(map)) => map.get(key),
            _ => None,
        }
    }
}

impl From<GraphValue> for Value {
    fn from(value: GraphValue) -> Self {
        match value {
            GraphValue::Scalar(value) => value,
            GraphValue::Node(node) => node.to_json(),
            GraphValue::Relationship(rel) => rel.to_json(),
            GraphValue::Path(path) => path.to_json(),
        }
    }
}

impl From<Value> for GraphValue {
    fn from(value: Value) -> Self {
        let parsed = value.as_object().and_then(|object| {
            match object.get(TYPE_TAG).and_then(Value::as_str)? {
                "node" => GraphNode::from_json(object).map(GraphValue::Node),
                "relationship" => GraphRelationship::from_json(object).map(GraphValue::Relationship),
                "path" => GraphPath::from_json(object).map(GraphValue::Path),
                _ => None,
            }
        });

        parsed.unwrap_or(GraphValue::Scalar(value))
    }
}

impl From<GraphNode> for GraphValue {
    fn from(node: GraphNode) -> Self {
        GraphValue::Node(node)
    }
}

impl From<GraphRelationship> for GraphValue {
    fn from(rel: GraphRelationship) -> Self {
        GraphValue::Relationship(rel)
    }
}

impl From<GraphPath> for GraphValue {
    fn from(path: GraphPath) -> Self {
        GraphValue::Path(path)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for GraphValue {
                fn from(value: $ty) -> Self {
                    GraphValue::Scalar(Value::from(value))
                }
            }
        )*
    };
}

scalar_from!(i64, f64, bool, String, &str);

fn into_properties(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        _ => Properties::new(),
    }
}

fn properties_field(object: &Map<String, Value>) -> Properties {
    object
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "value_test.rs"]
mod value_test;
