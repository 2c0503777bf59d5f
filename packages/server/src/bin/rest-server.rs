//! REST Server Binary
//!
//! Connects to Neo4j and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin rest-server --features neo4j
//! ```
//!
//! # Environment Variables
//!
//! - `HOST` / `PORT`: Listen address (default `0.0.0.0:5000`)
//! - `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD`, `NEO4J_DATABASE`: Connection
//! - `CURSOR_PAGE_SIZE`: Default page size for cursors
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use neo4j_mcp_core::logging::{init_tracing, LogTarget};
use neo4j_mcp_core::services::GraphConnector;
use neo4j_mcp_server::{start_server, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(LogTarget::Stdout);

    let config = ServerConfig::from_env();
    tracing::info!("🚀 Neo4j REST Server");
    tracing::info!("📦 Database: {}", config.connector.uri);

    let connector = GraphConnector::connect(&config.connector).await.map_err(|e| {
        tracing::error!("❌ Failed to connect to Neo4j: {}", e);
        e
    })?;
    tracing::info!("✅ Connected");

    let result = start_server(AppState::new(connector.clone()), &config.addr()).await;

    if let Err(e) = connector.close().await {
        tracing::warn!("⚠️  {}", e);
    }
    result
}
