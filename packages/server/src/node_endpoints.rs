//! Node Endpoints
//!
//! Label/id CRUD and relationship creation. Labels and relationship types
//! come from the URL or body and are quoted by the connector; ids are passed
//! through as query parameters.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/:label/:id` - Fetch a node
//! - `POST /api/:label` - Create a node
//! - `PUT /api/:label/:id` - Merge properties into a node
//! - `DELETE /api/:label/:id` - Detach and delete a node
//! - `POST /api/relationship` - Connect two nodes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use neo4j_mcp_core::models::{Properties, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::validate_node_data;
use crate::{AppState, HttpError};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Body of `POST /api/relationship`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRelationshipInput {
    pub from_label: String,
    pub from_id: Value,
    pub to_label: String,
    pub to_id: Value,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default)]
    pub properties: Properties,
}

/// ```bash
/// curl http://localhost:5000/health
/// ```
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}

async fn get_node(
    State(state): State<AppState>,
    Path((label, id)): Path<(String, String)>,
) -> Result<Json<Row>, HttpError> {
    let rows = state.connector.get_node(&label, id).await?;

    rows.into_iter()
        .next()
        .map(Json)
        .ok_or_else(|| HttpError::not_found("Node not found"))
}

/// # Example
///
/// ```bash
/// curl -X POST http://localhost:5000/api/Person \
///   -H "Content-Type: application/json" \
///   -d '{"id": "p1", "name": "Ada"}'
/// ```
async fn create_node(
    State(state): State<AppState>,
    Path(label): Path<String>,
    Json(data): Json<Properties>,
) -> Result<(StatusCode, Json<Row>), HttpError> {
    validate_node_data(&label, &data).map_err(HttpError::validation)?;

    let row = state
        .connector
        .create_node(&label, data)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| HttpError::new("Node creation returned no rows", "QUERY_FAILURE"))?;

    Ok((StatusCode::CREATED, Json(row)))
}

async fn update_node(
    State(state): State<AppState>,
    Path((label, id)): Path<(String, String)>,
    Json(data): Json<Properties>,
) -> Result<Json<Row>, HttpError> {
    validate_node_data(&label, &data).map_err(HttpError::validation)?;

    let rows = state.connector.update_node(&label, id, data).await?;

    rows.into_iter()
        .next()
        .map(Json)
        .ok_or_else(|| HttpError::not_found("Node not found"))
}

async fn delete_node(
    State(state): State<AppState>,
    Path((label, id)): Path<(String, String)>,
) -> Result<StatusCode, HttpError> {
    state.connector.delete_node(&label, id.as_str()).await?;
    tracing::debug!("🗑️  Deleted {} node {}", label, id);
    Ok(StatusCode::NO_CONTENT)
}

/// # Example
///
/// ```bash
/// curl -X POST http://localhost:5000/api/relationship \
///   -H "Content-Type: application/json" \
///   -d '{"fromLabel": "Person", "fromId": "p1", "toLabel": "Movie",
///        "toId": "m1", "type": "ACTED_IN", "properties": {"role": "Neo"}}'
/// ```
async fn create_relationship(
    State(state): State<AppState>,
    Json(input): Json<CreateRelationshipInput>,
) -> Result<(StatusCode, Json<Row>), HttpError> {
    let row = state
        .connector
        .create_relationship(
            (input.from_label.as_str(), input.from_id),
            (input.to_label.as_str(), input.to_id),
            &input.rel_type,
            input.properties,
        )
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| HttpError::not_found("Relationship endpoints not found"))?;

    Ok((StatusCode::CREATED, Json(row)))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/relationship", post(create_relationship))
        .route("/api/:label", post(create_node))
        .route(
            "/api/:label/:id",
            get(get_node).put(update_node).delete(delete_node),
        )
        .with_state(state)
}
