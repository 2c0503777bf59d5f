//! MCP stdio Server Binary
//!
//! Speaks line-delimited JSON-RPC 2.0 on stdin/stdout for AI agents. All
//! logging goes to stderr.
//!
//! # Usage
//!
//! ```bash
//! NEO4J_URI=bolt://localhost:7687 cargo run --bin mcp-stdio --features neo4j
//! ```

use neo4j_mcp_core::logging::{init_tracing, LogTarget};
use neo4j_mcp_core::mcp::run_mcp_server;
use neo4j_mcp_core::{ConnectorConfig, GraphConnector};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(LogTarget::Stderr);

    let config = ConnectorConfig::from_env();
    tracing::info!("📡 Connecting to {}", config.uri);

    let connector = GraphConnector::connect(&config).await?;
    let result = run_mcp_server(connector.clone()).await;

    if let Err(e) = connector.close().await {
        tracing::warn!("⚠️  {}", e);
    }
    result
}
