//! Cypher Statement Builders
//!
//! Fixed statements used by the connector facade. Labels and relationship
//! types cannot be passed as query parameters, so they are interpolated as
//! backtick-quoted identifiers; every value travels as a parameter.

use crate::db::{DatabaseError, DbResult};

pub const COMPONENTS: &str =
    "CALL dbms.components() YIELD name, versions, edition RETURN name, versions, edition";
pub const LABELS: &str = "CALL db.labels()";
pub const RELATIONSHIP_TYPES: &str = "CALL db.relationshipTypes()";

/// Endpoint pairs sampled per relationship type when resolving `connects`
pub const CONNECTS_SAMPLE: usize = 5;

/// Quote a label or relationship type as a Cypher identifier
///
/// Embedded backticks are doubled.
///
/// ```rust
/// use neo4j_mcp_core::services::cypher::quote_identifier;
///
/// assert_eq!(quote_identifier("Person").unwrap(), "`Person`");
/// assert_eq!(quote_identifier("odd`name").unwrap(), "`odd``name`");
/// assert!(quote_identifier(" ").is_err());
/// ```
pub fn quote_identifier(name: &str) -> DbResult<String> {
    if name.trim().is_empty() {
        return Err(DatabaseError::construction(
            "label or relationship type must not be empty",
        ));
    }
    Ok(format!("`{}`", name.replace('`', "``")))
}

pub fn sample_node(label: &str) -> DbResult<String> {
    Ok(format!("MATCH (n:{}) RETURN n LIMIT 1", quote_identifier(label)?))
}

pub fn sample_relationship(rel_type: &str) -> DbResult<String> {
    Ok(format!(
        "MATCH ()-[r:{}]->() RETURN r LIMIT 1",
        quote_identifier(rel_type)?
    ))
}

pub fn connected_labels(rel_type: &str) -> DbResult<String> {
    Ok(format!(
        "MATCH (a)-[r:{}]->(b) RETURN labels(a) AS from_labels, labels(b) AS to_labels LIMIT {}",
        quote_identifier(rel_type)?,
        CONNECTS_SAMPLE
    ))
}

/// Parameters: `$id`
pub fn get_node(label: &str) -> DbResult<String> {
    Ok(format!(
        "MATCH (n:{} {{id: $id}}) RETURN n",
        quote_identifier(label)?
    ))
}

/// Parameters: `$props`
pub fn create_node(label: &str) -> DbResult<String> {
    Ok(format!("CREATE (n:{} $props) RETURN n", quote_identifier(label)?))
}

/// Parameters: `$id`, `$props`
pub fn update_node(label: &str) -> DbResult<String> {
    Ok(format!(
        "MATCH (n:{} {{id: $id}}) SET n += $props RETURN n",
        quote_identifier(label)?
    ))
}

/// Parameters: `$id`
pub fn delete_node(label: &str) -> DbResult<String> {
    Ok(format!(
        "MATCH (n:{} {{id: $id}}) DETACH DELETE n",
        quote_identifier(label)?
    ))
}

/// Parameters: `$from_id`, `$to_id`, `$props`
pub fn create_relationship(from_label: &str, to_label: &str, rel_type: &str) -> DbResult<String> {
    Ok(format!(
        "MATCH (from:{} {{id: $from_id}}), (to:{} {{id: $to_id}}) \
         CREATE (from)-[r:{} $props]->(to) RETURN from, r, to",
        quote_identifier(from_label)?,
        quote_identifier(to_label)?,
        quote_identifier(rel_type)?
    ))
}
