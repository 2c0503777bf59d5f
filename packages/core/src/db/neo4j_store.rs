//! Neo4j Executor
//!
//! Production [`QueryExecutor`] over the Bolt protocol using `neo4rs`.
//! Bolt values are converted into the connector's [`GraphValue`] model:
//! nodes, relationships and paths become structured variants, everything
//! else becomes a JSON scalar.
//!
//! Only compiled with the `neo4j` feature.

use crate::config::ConnectorConfig;
use crate::db::{DatabaseError, DbResult, QueryExecutor, QueryResult, Transaction};
use crate::models::{GraphNode, GraphPath, GraphRelationship, GraphValue, Params, Row};
use async_trait::async_trait;
use neo4rs::{
    query, BoltList, BoltMap, BoltNode, BoltNull, BoltRelation, BoltString, BoltType,
    BoltUnboundedRelation, ConfigBuilder, Graph, Query, Txn,
};
use serde_json::{Map, Number, Value};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Map a driver error onto a connector error kind
///
/// Transport and authentication problems are connection failures; everything
/// the server reports about a statement is a query failure.
fn classify(err: neo4rs::Error) -> DatabaseError {
    let connection = matches!(
        err,
        neo4rs::Error::IOError { .. }
            | neo4rs::Error::ConnectionError
            | neo4rs::Error::AuthenticationError(_)
    );

    let message = err.to_string();
    let classified = if connection {
        DatabaseError::connection_failure(message)
    } else {
        DatabaseError::query_failure(message)
    };
    classified.with_source(err)
}

/// Bolt-backed executor
pub struct Neo4jExecutor {
    graph: Graph,
}

impl Neo4jExecutor {
    /// Connect using the endpoint, credentials and database in `config`
    #[instrument(skip(config), fields(uri = %config.uri))]
    pub async fn connect(config: &ConnectorConfig) -> DbResult<Self> {
        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.username.as_str())
            .password(config.password())
            .fetch_size(config.default_page_size.get())
            .max_connections(config.max_connections);

        if let Some(database) = &config.database {
            builder = builder.db(database.as_str());
        }

        let neo_config = builder.build().map_err(|e| {
            DatabaseError::connection_failure(format!("invalid Neo4j configuration: {e}"))
        })?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| classify(e).context(format!("Failed to connect to {}", config.uri)))?;

        info!("🔌 Connected to Neo4j at {}", config.uri);
        Ok(Self { graph })
    }

    pub fn from_graph(graph: Graph) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl QueryExecutor for Neo4jExecutor {
    async fn run(&self, text: &str, params: &Params) -> DbResult<QueryResult> {
        let started = Instant::now();
        let mut stream = self
            .graph
            .execute(to_query(text, params))
            .await
            .map_err(|e| classify(e).with_query(text, params))?;

        let mut rows = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| classify(e).with_query(text, params))?
        {
            rows.push(convert_row(&row).map_err(|e| e.with_query(text, params))?);
        }

        let elapsed = elapsed_millis(started);
        debug!(rows = rows.len(), elapsed_ms = elapsed, "query executed");
        Ok(QueryResult::new(rows).with_query_time(elapsed))
    }

    async fn begin(&self) -> DbResult<Box<dyn Transaction>> {
        let txn = self.graph.start_txn().await.map_err(classify)?;
        Ok(Box::new(Neo4jTransaction { txn }))
    }
}

struct Neo4jTransaction {
    txn: Txn,
}

#[async_trait]
impl Transaction for Neo4jTransaction {
    async fn run(&mut self, text: &str, params: &Params) -> DbResult<QueryResult> {
        let started = Instant::now();
        let mut stream = self
            .txn
            .execute(to_query(text, params))
            .await
            .map_err(|e| classify(e).with_query(text, params))?;

        let mut rows = Vec::new();
        while let Some(row) = stream
            .next(self.txn.handle())
            .await
            .map_err(|e| classify(e).with_query(text, params))?
        {
            rows.push(convert_row(&row).map_err(|e| e.with_query(text, params))?);
        }

        Ok(QueryResult::new(rows).with_query_time(elapsed_millis(started)))
    }

    async fn commit(self: Box<Self>) -> DbResult<()> {
        self.txn.commit().await.map_err(classify)
    }

    async fn rollback(self: Box<Self>) -> DbResult<()> {
        self.txn.rollback().await.map_err(classify)
    }
}

fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn to_query(text: &str, params: &Params) -> Query {
    params
        .iter()
        .fold(query(text), |q, (key, value)| q.param(key, json_to_bolt(value)))
}

fn json_to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Array(items) => BoltType::List(BoltList {
            value: items.iter().map(json_to_bolt).collect(),
        }),
        Value::Object(map) => BoltType::Map(BoltMap {
            value: map
                .iter()
                .map(|(k, v)| (BoltString::from(k.as_str()), json_to_bolt(v)))
                .collect(),
        }),
    }
}

fn convert_row(row: &neo4rs::Row) -> DbResult<Row> {
    row.keys()
        .into_iter()
        .map(|key| {
            let key = key.to_string();
            let value: BoltType = row.get(&key).map_err(|e| {
                DatabaseError::query_failure(format!("cannot decode column '{key}': {e}"))
            })?;
            Ok((key, bolt_to_graph(value)))
        })
        .collect()
}

fn bolt_to_graph(value: BoltType) -> GraphValue {
    match value {
        BoltType::Node(node) => GraphValue::Node(convert_node(node)),
        BoltType::Relation(rel) => GraphValue::Relationship(convert_relation(rel)),
        BoltType::UnboundedRelation(rel) => GraphValue::Relationship(convert_unbounded(rel)),
        BoltType::Path(path) => GraphValue::Path(GraphPath {
            nodes: path
                .nodes
                .value
                .into_iter()
                .filter_map(|n| match n {
                    BoltType::Node(node) => Some(convert_node(node)),
                    _ => None,
                })
                .collect(),
            relationships: path
                .rels
                .value
                .into_iter()
                .filter_map(|r| match r {
                    BoltType::UnboundedRelation(rel) => Some(convert_unbounded(rel)),
                    BoltType::Relation(rel) => Some(convert_relation(rel)),
                    _ => None,
                })
                .collect(),
        }),
        other => GraphValue::Scalar(bolt_to_json(other)),
    }
}

fn convert_node(node: BoltNode) -> GraphNode {
    GraphNode {
        id: Some(node.id.value),
        labels: node
            .labels
            .value
            .into_iter()
            .filter_map(|label| match label {
                BoltType::String(s) => Some(s.value),
                _ => None,
            })
            .collect(),
        properties: convert_map(node.properties),
    }
}

fn convert_relation(rel: BoltRelation) -> GraphRelationship {
    GraphRelationship {
        id: Some(rel.id.value),
        rel_type: rel.typ.value,
        properties: convert_map(rel.properties),
        start_node_id: Some(rel.start_node_id.value),
        end_node_id: Some(rel.end_node_id.value),
    }
}

fn convert_unbounded(rel: BoltUnboundedRelation) -> GraphRelationship {
    GraphRelationship {
        id: Some(rel.id.value),
        rel_type: rel.typ.value,
        properties: convert_map(rel.properties),
        start_node_id: None,
        end_node_id: None,
    }
}

fn convert_map(map: BoltMap) -> Map<String, Value> {
    map.value
        .into_iter()
        .map(|(k, v)| (k.value, bolt_to_json(v)))
        .collect()
}

fn bolt_to_json(value: BoltType) -> Value {
    match value {
        BoltType::Null(_) => Value::Null,
        BoltType::Boolean(b) => Value::Bool(b.value),
        BoltType::Integer(i) => Value::from(i.value),
        BoltType::Float(f) => Number::from_f64(f.value).map_or(Value::Null, Value::Number),
        BoltType::String(s) => Value::String(s.value),
        BoltType::List(list) => Value::Array(list.value.into_iter().map(bolt_to_json).collect()),
        BoltType::Map(map) => Value::Object(convert_map(map)),
        BoltType::Bytes(bytes) => Value::Array(bytes.value.iter().map(|b| Value::from(*b)).collect()),
        structured @ (BoltType::Node(_)
        | BoltType::Relation(_)
        | BoltType::UnboundedRelation(_)
        | BoltType::Path(_)) => Value::from(bolt_to_graph(structured)),
        // Temporal and spatial values keep their driver rendering
        other => Value::String(format!("{other:?}")),
    }
}
