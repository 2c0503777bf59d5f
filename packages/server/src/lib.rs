//! Neo4j Connector REST Server
//!
//! axum front end over [`GraphConnector`]: health, raw query, label/id node
//! CRUD, relationship creation and windowed query endpoints.
//!
//! # Architecture
//!
//! The router is assembled from endpoint modules, each contributing its
//! routes via `.merge()`:
//! - `node_endpoints`: health, node CRUD, relationship creation
//! - `query_endpoints`: raw and windowed Cypher queries
//!
//! # Usage
//!
//! ```bash
//! NEO4J_URI=bolt://localhost:7687 PORT=5000 cargo run --bin rest-server --features neo4j
//! ```

use axum::Router;
use neo4j_mcp_core::services::GraphConnector;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod validation;

mod http_error;
mod node_endpoints;
mod query_endpoints;

pub use config::ServerConfig;
pub use http_error::HttpError;

/// Application state shared across all endpoints
#[derive(Clone, Debug)]
pub struct AppState {
    pub connector: GraphConnector,
}

impl AppState {
    pub fn new(connector: GraphConnector) -> Self {
        Self { connector }
    }
}

/// Create the main application router with all endpoint modules
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(node_endpoints::routes(state.clone()))
        .merge(query_endpoints::routes(state))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Serve the REST API on `addr` until Ctrl-C
///
/// # Errors
///
/// Returns error if the listener cannot bind or the server fails.
pub async fn start_server(state: AppState, addr: &str) -> anyhow::Result<()> {
    let app = create_router(state);

    tracing::info!("🚀 REST server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("🛑 REST server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("⚠️  Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
