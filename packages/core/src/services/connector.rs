//! Graph Connector - Facade over the Query Executor
//!
//! [`GraphConnector`] translates simplified operations (execute, transaction
//! control, schema lookups, label/id CRUD, cursor creation) into calls on a
//! shared [`QueryExecutor`]. It holds no state besides the executor handle
//! and the default page size: no retries, no caching, and no validation
//! beyond identifier quoting.
//!
//! # Error Handling
//!
//! Executor errors are enriched with the failing query, its parameters and
//! an operation prefix (`"Query error"`, `"Schema error"`, ...). Their
//! [`ErrorKind`](crate::db::ErrorKind) is never changed.
//!
//! # Examples
//!
//! ```rust
//! use neo4j_mcp_core::db::InMemoryExecutor;
//! use neo4j_mcp_core::models::{Params, Row};
//! use neo4j_mcp_core::services::GraphConnector;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let executor = Arc::new(InMemoryExecutor::new(vec![Row::new().with("name", "Ada")]));
//! let connector = GraphConnector::new(executor);
//!
//! let rows = connector.execute("MATCH (p:Person) RETURN p.name AS name", Params::new()).await.unwrap();
//! assert_eq!(rows[0].get("name").and_then(|v| v.as_str()), Some("Ada"));
//! # });
//! ```

use crate::config::ConnectorConfig;
use crate::db::{DbResult, QueryExecutor, QueryResult, Transaction};
use crate::models::{
    property_type_name, ConnectorInfo, DatabaseDescriptor, DatabaseInfo, GraphSchema,
    GraphValue, LabelSchema, PageSize, Params, Properties, PropertyTypes, QuerySpec,
    RelationshipSchema, Row,
};
use crate::services::cursor::Cursor;
use crate::services::cypher;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Caller-owned explicit transaction
///
/// Consumed by [`GraphConnector::commit`] or [`GraphConnector::rollback`].
/// Dropping an uncommitted handle leaves cleanup to the driver.
pub struct TransactionHandle {
    id: Uuid,
    inner: Box<dyn Transaction>,
    statements: usize,
}

impl TransactionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Number of statements run in this transaction so far
    pub fn statements(&self) -> usize {
        self.statements
    }
}

impl fmt::Debug for TransactionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionHandle")
            .field("id", &self.id)
            .field("statements", &self.statements)
            .finish()
    }
}

/// Facade over a shared query executor
#[derive(Clone)]
pub struct GraphConnector {
    executor: Arc<dyn QueryExecutor>,
    default_page_size: PageSize,
}

impl GraphConnector {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            default_page_size: PageSize::default(),
        }
    }

    /// Wrap an executor using the pagination defaults from `config`
    pub fn from_config(executor: Arc<dyn QueryExecutor>, config: &ConnectorConfig) -> Self {
        Self {
            executor,
            default_page_size: config.default_page_size,
        }
    }

    /// Connect to Neo4j over Bolt
    #[cfg(feature = "neo4j")]
    pub async fn connect(config: &ConnectorConfig) -> DbResult<Self> {
        let executor = crate::db::Neo4jExecutor::connect(config).await?;
        Ok(Self::from_config(Arc::new(executor), config))
    }

    pub fn executor(&self) -> Arc<dyn QueryExecutor> {
        Arc::clone(&self.executor)
    }

    pub fn default_page_size(&self) -> PageSize {
        self.default_page_size
    }

    async fn run(&self, text: &str, params: &Params, context: &str) -> DbResult<QueryResult> {
        self.executor
            .run(text, params)
            .await
            .map_err(|e| e.with_query(text, params).context(context))
    }

    /// Connector version, capabilities and server component info
    pub async fn info(&self) -> DbResult<ConnectorInfo> {
        let result = self
            .run(cypher::COMPONENTS, &Params::new(), "Info error")
            .await?;

        let info = result
            .rows
            .first()
            .map(|row| DatabaseInfo {
                name: row.get("name").and_then(GraphValue::as_str).map(str::to_string),
                version: Some(
                    row.get("versions")
                        .and_then(GraphValue::as_scalar)
                        .and_then(|v| v.get(0))
                        .and_then(Value::as_str)
                        .unwrap_or("unknown")
                        .to_string(),
                ),
                edition: row
                    .get("edition")
                    .and_then(GraphValue::as_str)
                    .map(str::to_string),
            })
            .unwrap_or_default();

        Ok(ConnectorInfo::neo4j(info))
    }

    /// Database descriptor part of [`info`](Self::info)
    pub async fn database_info(&self) -> DbResult<DatabaseDescriptor> {
        Ok(self.info().await?.database)
    }

    /// Run a query and return rows with summary metadata
    #[instrument(skip(self, params), fields(query = %text))]
    pub async fn query(&self, text: &str, params: Params) -> DbResult<QueryResult> {
        let result = self.run(text, &params, "Query error").await?;
        debug!(rows = result.len(), "query completed");
        Ok(result)
    }

    /// Run a query and return its rows
    pub async fn execute(&self, text: &str, params: Params) -> DbResult<Vec<Row>> {
        Ok(self.query(text, params).await?.into_rows())
    }

    pub async fn begin_transaction(&self) -> DbResult<TransactionHandle> {
        let inner = self
            .executor
            .begin()
            .await
            .map_err(|e| e.context("Transaction error"))?;
        let handle = TransactionHandle {
            id: Uuid::new_v4(),
            inner,
            statements: 0,
        };
        debug!(transaction = %handle.id, "transaction started");
        Ok(handle)
    }

    /// Run a query inside an open transaction
    pub async fn execute_in(
        &self,
        handle: &mut TransactionHandle,
        text: &str,
        params: Params,
    ) -> DbResult<QueryResult> {
        let result = handle.inner.run(text, &params).await.map_err(|e| {
            e.with_query(text, &params)
                .context(format!("Transaction query error ({})", handle.id))
        })?;
        handle.statements += 1;
        Ok(result)
    }

    pub async fn commit(&self, handle: TransactionHandle) -> DbResult<()> {
        let id = handle.id;
        handle
            .inner
            .commit()
            .await
            .map_err(|e| e.context(format!("Commit error ({id})")))?;
        debug!(transaction = %id, statements = handle.statements, "transaction committed");
        Ok(())
    }

    pub async fn rollback(&self, handle: TransactionHandle) -> DbResult<()> {
        let id = handle.id;
        handle
            .inner
            .rollback()
            .await
            .map_err(|e| e.context(format!("Rollback error ({id})")))?;
        debug!(transaction = %id, "transaction rolled back");
        Ok(())
    }

    /// Sample the graph for labels, relationship types and property types
    ///
    /// One node is sampled per label and one relationship per type; endpoint
    /// labels come from up to five matches of each type.
    #[instrument(skip(self))]
    pub async fn get_schema(&self) -> DbResult<GraphSchema> {
        let mut schema = GraphSchema::default();

        for label in self.node_labels().await? {
            let properties = self.node_properties(&label).await?;
            schema.nodes.insert(label, LabelSchema { properties });
        }

        for rel_type in self.relationship_types().await? {
            let sample = self.sample_relationship(&rel_type).await?;
            let relationship = if sample.is_empty() {
                RelationshipSchema::default()
            } else {
                RelationshipSchema {
                    properties: sampled_types(&sample, "r"),
                    connects: self.connected_labels(&rel_type).await?,
                }
            };
            schema.relationships.insert(rel_type, relationship);
        }

        info!(
            "📊 Schema sampled: {} labels, {} relationship types",
            schema.node_label_count(),
            schema.relationship_type_count()
        );
        Ok(schema)
    }

    pub async fn node_labels(&self) -> DbResult<Vec<String>> {
        let result = self
            .run(cypher::LABELS, &Params::new(), "Schema error")
            .await?;
        Ok(string_column(&result.rows, "label"))
    }

    pub async fn relationship_types(&self) -> DbResult<Vec<String>> {
        let result = self
            .run(cypher::RELATIONSHIP_TYPES, &Params::new(), "Schema error")
            .await?;
        Ok(string_column(&result.rows, "relationshipType"))
    }

    /// Property types of one sampled node; empty for an unknown label
    pub async fn node_properties(&self, label: &str) -> DbResult<PropertyTypes> {
        let text = cypher::sample_node(label)?;
        let result = self.run(&text, &Params::new(), "Schema error").await?;
        Ok(sampled_types(&result.rows, "n"))
    }

    /// Property types of one sampled relationship; empty for an unknown type
    pub async fn relationship_properties(&self, rel_type: &str) -> DbResult<PropertyTypes> {
        let sample = self.sample_relationship(rel_type).await?;
        Ok(sampled_types(&sample, "r"))
    }

    /// Labels found at the start and end of a relationship type
    pub async fn connected_labels(&self, rel_type: &str) -> DbResult<(Vec<String>, Vec<String>)> {
        let text = cypher::connected_labels(rel_type)?;
        let result = self.run(&text, &Params::new(), "Schema error").await?;

        let mut from = BTreeSet::new();
        let mut to = BTreeSet::new();
        for row in &result.rows {
            from.extend(label_list(row, "from_labels"));
            to.extend(label_list(row, "to_labels"));
        }
        Ok((from.into_iter().collect(), to.into_iter().collect()))
    }

    async fn sample_relationship(&self, rel_type: &str) -> DbResult<Vec<Row>> {
        let text = cypher::sample_relationship(rel_type)?;
        Ok(self.run(&text, &Params::new(), "Schema error").await?.into_rows())
    }

    /// Open a paginated cursor; `page_size` falls back to the configured default
    ///
    /// # Errors
    ///
    /// `ConstructionError` for a non-positive page size or blank query. No
    /// query is sent until the cursor is first advanced.
    pub fn cursor(
        &self,
        text: impl Into<String>,
        params: Params,
        page_size: Option<i64>,
    ) -> DbResult<Cursor> {
        let page_size = match page_size {
            Some(size) => PageSize::try_from(size)?,
            None => self.default_page_size,
        };
        let spec = QuerySpec::new(text, params, page_size)?;
        Ok(Cursor::new(self.executor(), spec))
    }

    pub async fn get_node(&self, label: &str, id: impl Into<Value>) -> DbResult<Vec<Row>> {
        let text = cypher::get_node(label)?;
        let params = params_of([("id", id.into())]);
        Ok(self.run(&text, &params, "Query error").await?.into_rows())
    }

    pub async fn create_node(&self, label: &str, properties: Properties) -> DbResult<Vec<Row>> {
        let text = cypher::create_node(label)?;
        let params = params_of([("props", Value::Object(properties))]);
        let rows = self.run(&text, &params, "Query error").await?.into_rows();
        info!("✅ Created {} node", label);
        Ok(rows)
    }

    pub async fn update_node(
        &self,
        label: &str,
        id: impl Into<Value>,
        properties: Properties,
    ) -> DbResult<Vec<Row>> {
        let text = cypher::update_node(label)?;
        let params = params_of([("id", id.into()), ("props", Value::Object(properties))]);
        Ok(self.run(&text, &params, "Query error").await?.into_rows())
    }

    pub async fn delete_node(&self, label: &str, id: impl Into<Value>) -> DbResult<()> {
        let text = cypher::delete_node(label)?;
        let params = params_of([("id", id.into())]);
        self.run(&text, &params, "Query error").await?;
        Ok(())
    }

    pub async fn create_relationship(
        &self,
        from: (&str, Value),
        to: (&str, Value),
        rel_type: &str,
        properties: Properties,
    ) -> DbResult<Vec<Row>> {
        let (from_label, from_id) = from;
        let (to_label, to_id) = to;
        let text = cypher::create_relationship(from_label, to_label, rel_type)?;
        let params = params_of([
            ("from_id", from_id),
            ("to_id", to_id),
            ("props", Value::Object(properties)),
        ]);
        Ok(self.run(&text, &params, "Query error").await?.into_rows())
    }

    /// Release the executor's pooled connections
    pub async fn close(&self) -> DbResult<()> {
        self.executor
            .close()
            .await
            .map_err(|e| e.context("Close error"))?;
        info!("🔌 Connector closed");
        Ok(())
    }
}

impl fmt::Debug for GraphConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphConnector")
            .field("default_page_size", &self.default_page_size)
            .finish_non_exhaustive()
    }
}

fn params_of<const N: usize>(pairs: [(&str, Value); N]) -> Params {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn string_column(rows: &[Row], column: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get(column).and_then(GraphValue::as_str))
        .map(str::to_string)
        .collect()
}

fn label_list<'a>(row: &'a Row, column: &str) -> impl Iterator<Item = String> + 'a {
    row.get(column)
        .and_then(GraphValue::as_scalar)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::to_string)
}

fn sampled_types(rows: &[Row], column: &str) -> PropertyTypes {
    let properties = rows.first().and_then(|row| match row.get(column)? {
        GraphValue::Node(node) => Some(&node.properties),
        GraphValue::Relationship(rel) => Some(&rel.properties),
        GraphValue::Scalar(Value::Object(map)) => Some(map),
        _ => None,
    });

    properties
        .into_iter()
        .flatten()
        .map(|(key, value)| (key.clone(), property_type_name(value).to_string()))
        .collect()
}

#[cfg(test)]
#[path = "connector_test.rs"]
mod connector_test;
