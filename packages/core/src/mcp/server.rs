//! MCP stdio Server
//!
//! Async Tokio task that handles JSON-RPC 2.0 requests, one JSON object per
//! line. Requests are processed in order; notifications are accepted and
//! produce no output. Logs go through `tracing` and never to stdout.

use crate::mcp::handlers::{cursors, initialize, query, transactions};
use crate::mcp::session::McpSession;
use crate::mcp::types::{MCPError, MCPNotification, MCPRequest, MCPResponse};
use crate::services::GraphConnector;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, error, info, instrument, warn};

/// Run the MCP stdio server
///
/// Reads JSON-RPC requests from stdin and writes responses to stdout until
/// stdin is closed. Open transactions are rolled back and open cursors
/// closed on exit.
#[instrument(skip(connector))]
pub async fn run_mcp_server(connector: GraphConnector) -> anyhow::Result<()> {
    info!("🔌 MCP stdio server started");

    let session = McpSession::new(connector);
    let reader = BufReader::new(tokio::io::stdin());
    let writer = BufWriter::new(tokio::io::stdout());

    let result = serve_lines(&session, reader, writer).await;
    session.shutdown().await;

    info!("🔌 MCP stdio server stopped (stdin closed)");
    result
}

/// Serve line-delimited JSON-RPC from `reader` to `writer` until EOF
pub async fn serve_lines<R, W>(session: &McpSession, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!("📥 MCP request: {}", line);

        let request: MCPRequest = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                if let Ok(notification) = serde_json::from_str::<MCPNotification>(&line) {
                    debug!("📨 MCP notification '{}'", notification.method);
                    continue;
                }
                warn!("❌ Failed to parse JSON-RPC request: {}", e);
                let error_response = MCPResponse::error(
                    0, // Unknown ID since parsing failed
                    MCPError::parse_error(format!("Invalid JSON: {}", e)),
                );
                write_response(&mut writer, &error_response).await?;
                continue;
            }
        };

        let request_id = request.id;
        let method = request.method.clone();
        let response = handle_request(session, request).await;

        debug!("📤 MCP response for method '{}' (id={})", method, request_id);
        write_response(&mut writer, &response).await?;
    }

    Ok(())
}

/// Handle a JSON-RPC request and return a response
#[instrument(skip(session, request), fields(method = %request.method, id = %request.id))]
pub async fn handle_request(session: &McpSession, request: MCPRequest) -> MCPResponse {
    let params = request.params;
    let result = match request.method.as_str() {
        "initialize" => initialize::handle_initialize(params),
        "info" => query::handle_info(session).await,
        "query" => query::handle_query(session, params).await,
        "get_schema" => query::handle_get_schema(session).await,
        "begin_transaction" => transactions::handle_begin(session).await,
        "commit_transaction" => transactions::handle_commit(session, params).await,
        "rollback_transaction" => transactions::handle_rollback(session, params).await,
        "query_in_transaction" => transactions::handle_query_in_transaction(session, params).await,
        "cursor_open" => cursors::handle_open(session, params).await,
        "cursor_next" => cursors::handle_next(session, params).await,
        "cursor_all" => cursors::handle_all(session, params).await,
        "cursor_close" => cursors::handle_close(session, params).await,
        _ => {
            warn!("⚠️  Unknown MCP method: {}", request.method);
            Err(MCPError::method_not_found(&request.method))
        }
    };

    match result {
        Ok(result) => {
            debug!("✅ MCP request {} succeeded", request.id);
            MCPResponse::success(request.id, result)
        }
        Err(error) => {
            error!(
                "❌ MCP request {} failed: {} (code: {})",
                request.id, error.message, error.code
            );
            MCPResponse::error(request.id, error)
        }
    }
}

/// Write one JSON-RPC response line
async fn write_response<W>(writer: &mut W, response: &MCPResponse) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let json = serde_json::to_string(response)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
