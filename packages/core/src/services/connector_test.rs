use super::*;
use crate::db::{ErrorKind, InMemoryExecutor};
use crate::models::{GraphNode, GraphRelationship};
use serde_json::json;

fn connector_with(executor: InMemoryExecutor) -> (GraphConnector, Arc<InMemoryExecutor>) {
    let executor = Arc::new(executor);
    (GraphConnector::new(executor.clone()), executor)
}

fn movie_graph() -> InMemoryExecutor {
    let person = GraphNode::new(
        1,
        vec!["Person".to_string()],
        json!({"name": "Keanu", "born": 1964}),
    );
    let acted = GraphRelationship::new(7, "ACTED_IN", 1, 2, json!({"roles": ["Neo"]}));

    InMemoryExecutor::new(vec![])
        .with_response(
            "dbms.components",
            vec![Row::new()
                .with("name", "Neo4j Kernel")
                .with("versions", GraphValue::Scalar(json!(["5.15.0"])))
                .with("edition", "community")],
        )
        .with_response(
            "db.labels",
            vec![
                Row::new().with("label", "Person"),
                Row::new().with("label", "Ghost"),
            ],
        )
        .with_response(
            "db.relationshipTypes",
            vec![
                Row::new().with("relationshipType", "ACTED_IN"),
                Row::new().with("relationshipType", "UNUSED"),
            ],
        )
        .with_response("MATCH (n:`Person`)", vec![Row::new().with("n", person)])
        .with_response("MATCH (n:`Ghost`)", vec![])
        .with_response("MATCH ()-[r:`ACTED_IN`]", vec![Row::new().with("r", acted)])
        .with_response("MATCH ()-[r:`UNUSED`]", vec![])
        .with_response(
            "labels(a) AS from_labels",
            vec![
                Row::new()
                    .with("from_labels", GraphValue::Scalar(json!(["Person"])))
                    .with("to_labels", GraphValue::Scalar(json!(["Movie"]))),
                Row::new()
                    .with("from_labels", GraphValue::Scalar(json!(["Person", "Actor"])))
                    .with("to_labels", GraphValue::Scalar(json!(["Movie"]))),
            ],
        )
}

#[tokio::test]
async fn test_info_reads_components() {
    let (connector, _) = connector_with(movie_graph());

    let info = connector.info().await.unwrap();

    assert_eq!(info.mcp_version, "1.0");
    assert!(info.capabilities.transaction);
    assert!(!info.capabilities.subscribe);
    assert_eq!(info.database.db_type, "neo4j");
    assert_eq!(info.database.info.version.as_deref(), Some("5.15.0"));
    assert_eq!(info.database.info.edition.as_deref(), Some("community"));
}

#[tokio::test]
async fn test_info_without_components_row() {
    let (connector, _) = connector_with(InMemoryExecutor::new(vec![]));

    let descriptor = connector.database_info().await.unwrap();

    assert_eq!(descriptor.info, DatabaseInfo::default());
}

#[tokio::test]
async fn test_query_wraps_errors_without_reclassifying() {
    let (connector, executor) = connector_with(InMemoryExecutor::new(vec![]));
    executor.fail_next(ErrorKind::QueryFailure, "Invalid input 'RETRN'");

    let mut params = Params::new();
    params.insert("x".to_string(), json!(1));
    let err = connector.execute("RETRN $x", params).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::QueryFailure);
    assert_eq!(err.message(), "Query error: Invalid input 'RETRN'");
    assert_eq!(err.query(), Some("RETRN $x"));
    assert_eq!(err.params().unwrap()["x"], 1);
}

#[tokio::test]
async fn test_connection_failure_kind_survives() {
    let (connector, executor) = connector_with(InMemoryExecutor::new(vec![]));
    executor.set_offline(true);

    let err = connector.get_schema().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
}

#[tokio::test]
async fn test_schema_sampling() {
    let (connector, _) = connector_with(movie_graph());

    let schema = connector.get_schema().await.unwrap();

    assert_eq!(schema.node_label_count(), 2);
    assert_eq!(schema.nodes["Person"].properties["name"], "string");
    assert_eq!(schema.nodes["Person"].properties["born"], "integer");
    assert!(schema.nodes["Ghost"].properties.is_empty());

    let acted = &schema.relationships["ACTED_IN"];
    assert_eq!(acted.properties["roles"], "list");
    assert_eq!(acted.connects.0, vec!["Actor", "Person"]);
    assert_eq!(acted.connects.1, vec!["Movie"]);

    let unused = &schema.relationships["UNUSED"];
    assert!(unused.properties.is_empty());
    assert!(unused.connects.0.is_empty());
}

#[tokio::test]
async fn test_unknown_label_yields_empty() {
    let (connector, _) = connector_with(movie_graph());

    assert!(connector.node_properties("Ghost").await.unwrap().is_empty());
    assert!(connector.relationship_properties("UNUSED").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_schema_lookups() {
    let (connector, _) = connector_with(movie_graph());

    assert_eq!(connector.node_labels().await.unwrap(), vec!["Person", "Ghost"]);
    assert_eq!(
        connector.relationship_types().await.unwrap(),
        vec!["ACTED_IN", "UNUSED"]
    );
    let (from, to) = connector.connected_labels("ACTED_IN").await.unwrap();
    assert_eq!(from, vec!["Actor", "Person"]);
    assert_eq!(to, vec!["Movie"]);
}

#[tokio::test]
async fn test_transaction_lifecycle() {
    let (connector, executor) = connector_with(InMemoryExecutor::new(vec![]));

    let mut tx = connector.begin_transaction().await.unwrap();
    connector
        .execute_in(&mut tx, "CREATE (n:TestNode {name: $name})", Params::new())
        .await
        .unwrap();
    assert_eq!(tx.statements(), 1);
    connector.commit(tx).await.unwrap();

    let tx = connector.begin_transaction().await.unwrap();
    connector.rollback(tx).await.unwrap();

    assert_eq!(executor.transactions_committed(), 1);
    assert_eq!(executor.transactions_rolled_back(), 1);
    assert!(executor.calls()[0].in_transaction);
}

#[tokio::test]
async fn test_transaction_query_error_names_transaction() {
    let (connector, executor) = connector_with(InMemoryExecutor::new(vec![]));
    let mut tx = connector.begin_transaction().await.unwrap();
    executor.fail_next(ErrorKind::QueryFailure, "constraint violated");

    let err = connector
        .execute_in(&mut tx, "CREATE (n:Unique {id: 1})", Params::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::QueryFailure);
    assert!(err.message().contains(&tx.id().to_string()));
    assert_eq!(tx.statements(), 0);
}

#[tokio::test]
async fn test_cursor_uses_default_page_size() {
    let executor = Arc::new(InMemoryExecutor::new(
        (0..45_i64).map(|i| Row::new().with("i", i)).collect(),
    ));
    let config = ConnectorConfig::default();
    let connector = GraphConnector::from_config(executor.clone(), &config);

    let mut cursor = connector.cursor("MATCH (n) RETURN n", Params::new(), None).unwrap();
    assert_eq!(cursor.page_size().get(), 20);

    assert_eq!(cursor.all().await.unwrap().len(), 45);
    assert_eq!(executor.fetch_offsets(), vec![0, 20, 40]);
}

#[test]
fn test_cursor_rejects_bad_page_size() {
    let (connector, executor) = connector_with(InMemoryExecutor::new(vec![]));

    let err = connector
        .cursor("MATCH (n) RETURN n", Params::new(), Some(0))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConstructionError);
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_crud_sends_one_parameterised_query_each() {
    let (connector, executor) = connector_with(InMemoryExecutor::new(vec![]));
    let props = json!({"name": "Ada"}).as_object().cloned().unwrap();

    connector.create_node("Person", props.clone()).await.unwrap();
    connector.get_node("Person", "p1").await.unwrap();
    connector.update_node("Person", "p1", props.clone()).await.unwrap();
    connector.delete_node("Person", "p1").await.unwrap();
    connector
        .create_relationship(
            ("Person", json!("p1")),
            ("Product", json!("x9")),
            "BOUGHT",
            Properties::new(),
        )
        .await
        .unwrap();

    let calls = executor.calls();
    assert_eq!(calls.len(), 5);
    assert_eq!(calls[0].query, "CREATE (n:`Person` $props) RETURN n");
    assert_eq!(calls[0].params["props"]["name"], "Ada");
    assert_eq!(calls[1].params["id"], "p1");
    assert_eq!(calls[2].params["props"], json!({"name": "Ada"}));
    assert!(calls[3].query.contains("DETACH DELETE"));
    assert_eq!(calls[4].params["from_id"], "p1");
    assert_eq!(calls[4].params["to_id"], "x9");
}

#[tokio::test]
async fn test_empty_label_is_construction_error() {
    let (connector, executor) = connector_with(InMemoryExecutor::new(vec![]));

    let err = connector.get_node("", "p1").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConstructionError);
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_close_releases_executor() {
    let (connector, executor) = connector_with(InMemoryExecutor::new(vec![]));

    connector.close().await.unwrap();

    assert!(executor.is_closed());
    let err = connector.execute("RETURN 1", Params::new()).await.unwrap_err();
    assert!(err.is_connection_failure());
}
