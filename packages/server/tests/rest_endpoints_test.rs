//! REST endpoint tests
//!
//! Drive the axum router in-process with `tower::ServiceExt::oneshot` over a
//! connector backed by the in-memory executor.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use neo4j_mcp_core::{
    db::{ErrorKind, InMemoryExecutor},
    models::{GraphNode, GraphRelationship, Row},
    services::GraphConnector,
};
use neo4j_mcp_server::{create_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(executor: Arc<InMemoryExecutor>) -> Router {
    create_router(AppState::new(GraphConnector::new(executor)))
}

fn person_row(id: &str, name: &str) -> Row {
    Row::new().with(
        "n",
        GraphNode::new(1, vec!["Person".to_string()], json!({"id": id, "name": name})),
    )
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// ============================================================================
// Health and Query
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(Arc::new(InMemoryExecutor::new(vec![]))), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_query_returns_rows() {
    let executor = Arc::new(InMemoryExecutor::new(vec![
        Row::new().with("name", "Ada"),
        Row::new().with("name", "Grace"),
    ]));

    let (status, body) = send(
        app(executor.clone()),
        Method::POST,
        "/api/query",
        Some(json!({"query": "MATCH (p:Person) RETURN p.name AS name", "params": {"min": 1}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"name": "Ada"}, {"name": "Grace"}]));
    assert_eq!(executor.calls()[0].params["min"], 1);
}

#[tokio::test]
async fn test_query_failure_is_500_with_message() {
    let executor = Arc::new(InMemoryExecutor::new(vec![]));
    executor.fail_next(ErrorKind::QueryFailure, "Invalid input 'RETRN'");

    let (status, body) = send(
        app(executor),
        Method::POST,
        "/api/query",
        Some(json!({"query": "RETRN 1"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Invalid input 'RETRN'"));
    assert_eq!(body["code"], "QUERY_FAILURE");
}

#[tokio::test]
async fn test_unreachable_store_is_503() {
    let executor = Arc::new(InMemoryExecutor::new(vec![]));
    executor.set_offline(true);

    let (status, body) = send(
        app(executor),
        Method::POST,
        "/api/query",
        Some(json!({"query": "RETURN 1"})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "CONNECTION_FAILURE");
}

#[tokio::test]
async fn test_blank_query_rejected_without_store_call() {
    let executor = Arc::new(InMemoryExecutor::new(vec![]));

    let (status, _) = send(app(executor.clone()), Method::POST, "/api/query", Some(json!({"query": "  "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(executor.call_count(), 0);
}

// ============================================================================
// Cursor Query
// ============================================================================

#[tokio::test]
async fn test_cursor_query_applies_window() {
    let executor = Arc::new(InMemoryExecutor::new(
        (0..25_i64).map(|i| Row::new().with("i", i)).collect(),
    ));

    let (status, body) = send(
        app(executor.clone()),
        Method::POST,
        "/api/cursor/query",
        Some(json!({
            "query": "MATCH (n) RETURN n.i AS i ORDER BY i",
            "cursorOptions": {"limit": 10, "offset": 20}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["count"], 5);
    assert_eq!(body["data"][0]["i"], 20);

    let call = &executor.calls()[0];
    assert!(call.query.ends_with("\nSKIP $cursor_skip\nLIMIT $cursor_limit"));
    assert_eq!(call.skip(), Some(20));
    assert_eq!(call.limit(), Some(10));
}

#[tokio::test]
async fn test_cursor_query_without_options_runs_unwindowed() {
    let executor = Arc::new(InMemoryExecutor::new(
        (0..3_i64).map(|i| Row::new().with("i", i)).collect(),
    ));

    let (status, body) = send(
        app(executor.clone()),
        Method::POST,
        "/api/cursor/query",
        Some(json!({"query": "MATCH (n) RETURN n.i AS i"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["count"], 3);
    assert_eq!(executor.calls()[0].query, "MATCH (n) RETURN n.i AS i");
}

#[tokio::test]
async fn test_cursor_query_rejects_negative_bounds() {
    let executor = Arc::new(InMemoryExecutor::new(vec![]));

    let (status, body) = send(
        app(executor.clone()),
        Method::POST,
        "/api/cursor/query",
        Some(json!({"query": "MATCH (n) RETURN n", "cursorOptions": {"limit": -1}})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(executor.call_count(), 0);
}

// ============================================================================
// Node CRUD
// ============================================================================

#[tokio::test]
async fn test_get_node_found() {
    let executor = Arc::new(
        InMemoryExecutor::new(vec![]).with_response("}) RETURN n", vec![person_row("p1", "Ada")]),
    );

    let (status, body) = send(app(executor.clone()), Method::GET, "/api/Person/p1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["n"]["__type"], "node");
    assert_eq!(body["n"]["properties"]["name"], "Ada");

    let call = &executor.calls()[0];
    assert_eq!(call.query, "MATCH (n:`Person` {id: $id}) RETURN n");
    assert_eq!(call.params["id"], "p1");
}

#[tokio::test]
async fn test_get_node_missing_is_404() {
    let (status, body) = send(
        app(Arc::new(InMemoryExecutor::new(vec![]))),
        Method::GET,
        "/api/Person/nobody",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Node not found");
}

#[tokio::test]
async fn test_create_node_validation_failure() {
    let executor = Arc::new(InMemoryExecutor::new(vec![]));

    let (status, body) = send(
        app(executor.clone()),
        Method::POST,
        "/api/Product",
        Some(json!({"title": "Lamp"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["Price is required"]));
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_create_node_returns_201() {
    let executor = Arc::new(
        InMemoryExecutor::new(vec![]).with_response("CREATE (n:", vec![person_row("p1", "Ada")]),
    );

    let (status, body) = send(
        app(executor.clone()),
        Method::POST,
        "/api/Person",
        Some(json!({"id": "p1", "name": "Ada"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["n"]["properties"]["id"], "p1");

    let call = &executor.calls()[0];
    assert_eq!(call.query, "CREATE (n:`Person` $props) RETURN n");
    assert_eq!(call.params["props"], json!({"id": "p1", "name": "Ada"}));
}

#[tokio::test]
async fn test_update_node_found_and_missing() {
    let executor = Arc::new(
        InMemoryExecutor::new(vec![]).with_response("SET n +=", vec![person_row("p1", "Ada L.")]),
    );

    let (status, body) = send(
        app(executor.clone()),
        Method::PUT,
        "/api/Person/p1",
        Some(json!({"name": "Ada L."})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["n"]["properties"]["name"], "Ada L.");
    assert_eq!(executor.calls()[0].params["props"], json!({"name": "Ada L."}));

    let (status, body) = send(
        app(Arc::new(InMemoryExecutor::new(vec![]))),
        Method::PUT,
        "/api/Movie/m404",
        Some(json!({"title": "Nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Node not found");
}

#[tokio::test]
async fn test_update_node_is_validated() {
    let executor = Arc::new(InMemoryExecutor::new(vec![]));

    let (status, body) = send(app(executor.clone()), Method::PUT, "/api/Person/p1", Some(json!({"age": 37}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["Name is required"]));
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_delete_node_returns_204() {
    let executor = Arc::new(InMemoryExecutor::new(vec![]));

    let (status, body) = send(app(executor.clone()), Method::DELETE, "/api/Person/p1", None).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    assert_eq!(executor.calls()[0].query, "MATCH (n:`Person` {id: $id}) DETACH DELETE n");
}

// ============================================================================
// Relationships
// ============================================================================

#[tokio::test]
async fn test_create_relationship() {
    let row = Row::new()
        .with("from", GraphNode::new(1, vec!["Person".to_string()], json!({"id": "p1"})))
        .with(
            "r",
            GraphRelationship::new(9, "ACTED_IN", 1, 2, json!({"role": "Neo"})),
        )
        .with("to", GraphNode::new(2, vec!["Movie".to_string()], json!({"id": "m1"})));
    let executor = Arc::new(InMemoryExecutor::new(vec![]).with_response("CREATE (from)-", vec![row]));

    let (status, body) = send(
        app(executor.clone()),
        Method::POST,
        "/api/relationship",
        Some(json!({
            "fromLabel": "Person", "fromId": "p1",
            "toLabel": "Movie", "toId": "m1",
            "type": "ACTED_IN", "properties": {"role": "Neo"}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["r"]["type"], "ACTED_IN");

    let call = &executor.calls()[0];
    assert!(call.query.contains("[r:`ACTED_IN` $props]"));
    assert_eq!(call.params["from_id"], "p1");
    assert_eq!(call.params["to_id"], "m1");
    assert_eq!(call.params["props"]["role"], "Neo");
}

#[tokio::test]
async fn test_create_relationship_missing_endpoints_is_404() {
    let (status, _) = send(
        app(Arc::new(InMemoryExecutor::new(vec![]))),
        Method::POST,
        "/api/relationship",
        Some(json!({
            "fromLabel": "Person", "fromId": 1,
            "toLabel": "Movie", "toId": 2,
            "type": "ACTED_IN"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
