//! Query Endpoints
//!
//! - `POST /api/query` - Run a Cypher query, returning its rows
//! - `POST /api/cursor/query` - Run a query with an optional `SKIP`/`LIMIT`
//!   window and report the row count

use axum::{extract::State, response::Json, routing::post, Router};
use neo4j_mcp_core::models::{apply_window, Params, Row};
use serde::{Deserialize, Serialize};

use crate::{AppState, HttpError};

#[derive(Debug, Deserialize)]
pub struct QueryInput {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub params: Params,
}

/// Window applied by `/api/cursor/query`
#[derive(Debug, Default, Deserialize)]
pub struct CursorOptions {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorQueryInput {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub cursor_options: CursorOptions,
}

#[derive(Debug, Serialize)]
pub struct CursorQueryMetadata {
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CursorQueryResponse {
    pub data: Vec<Row>,
    pub metadata: CursorQueryMetadata,
}

fn require_query(query: &str) -> Result<(), HttpError> {
    if query.trim().is_empty() {
        return Err(HttpError::new("query is required", "INVALID_INPUT"));
    }
    Ok(())
}

fn window_bound(name: &str, value: Option<i64>) -> Result<Option<u64>, HttpError> {
    value
        .map(|v| {
            u64::try_from(v).map_err(|_| {
                HttpError::new(format!("{} must not be negative, got {}", name, v), "INVALID_INPUT")
            })
        })
        .transpose()
}

async fn execute_query(
    State(state): State<AppState>,
    Json(input): Json<QueryInput>,
) -> Result<Json<Vec<Row>>, HttpError> {
    require_query(&input.query)?;
    let rows = state.connector.execute(&input.query, input.params).await?;
    Ok(Json(rows))
}

/// # Example
///
/// ```bash
/// curl -X POST http://localhost:5000/api/cursor/query \
///   -H "Content-Type: application/json" \
///   -d '{"query": "MATCH (p:Person) RETURN p ORDER BY p.name",
///        "cursorOptions": {"limit": 10, "offset": 20}}'
/// ```
async fn cursor_query(
    State(state): State<AppState>,
    Json(input): Json<CursorQueryInput>,
) -> Result<Json<CursorQueryResponse>, HttpError> {
    require_query(&input.query)?;
    let skip = window_bound("offset", input.cursor_options.offset)?;
    let limit = window_bound("limit", input.cursor_options.limit)?;

    let (text, params) = apply_window(&input.query, &input.params, skip, limit);
    let data = state.connector.execute(&text, params).await?;

    tracing::debug!("📄 Windowed query returned {} rows", data.len());
    Ok(Json(CursorQueryResponse {
        metadata: CursorQueryMetadata { count: data.len() },
        data,
    }))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/query", post(execute_query))
        .route("/api/cursor/query", post(cursor_query))
        .with_state(state)
}
