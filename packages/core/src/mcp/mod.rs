//! Model Context Protocol (MCP) Integration
//!
//! Pure protocol implementation for a stdio-based JSON-RPC 2.0 server that
//! gives AI agents access to the graph connector.
//!
//! # Architecture
//!
//! - **Facade-backed**: handlers translate requests into `GraphConnector` calls
//! - **Session registries**: transactions and cursors outlive a single request
//!   and are addressed by generated ids
//! - **stdio transport**: JSON-RPC 2.0 over stdin/stdout, logs on stderr
//!
//! # Usage
//!
//! ```json
//! {"jsonrpc": "2.0", "id": 1, "method": "cursor_open",
//!  "params": {"query": "MATCH (p:Person) RETURN p", "page_size": 50}}
//! {"jsonrpc": "2.0", "id": 2, "method": "cursor_next",
//!  "params": {"cursor_id": "5f0c..."}}
//! ```

pub mod handlers;
pub mod server;
pub mod session;
pub mod types;

pub use server::{handle_request, run_mcp_server, serve_lines};
pub use session::McpSession;
pub use types::{MCPError, MCPNotification, MCPRequest, MCPResponse};
