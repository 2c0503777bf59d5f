//! Neo4j MCP Connector Core
//!
//! This crate exposes Neo4j graph-database operations through a Model
//! Context Protocol (MCP) abstraction and provides a cursor-based pagination
//! client over paged query execution.
//!
//! # Architecture
//!
//! - **Opaque executor**: the graph store is a [`db::QueryExecutor`] that runs
//!   parameterized queries; planning and isolation stay in the database
//! - **Explicit cursor state machine**: offset counter, exhausted flag and a
//!   buffered page, advanced only when the caller pulls
//! - **Thin facade**: [`services::GraphConnector`] maps each simplified
//!   operation onto one executor call
//! - **Bolt driver behind a feature**: `neo4rs` is compiled in with `neo4j`
//!
//! # Modules
//!
//! - [`models`] - Row values, query specifications, schema and connector info
//! - [`db`] - Executor trait, errors, in-memory and Neo4j executors
//! - [`services`] - Page fetcher, cursor, connector facade
//! - [`mcp`] - MCP stdio server for AI agent integration
//! - [`config`] - Environment-driven connector configuration
//! - [`logging`] - Tracing subscriber setup for binaries

pub mod config;
pub mod db;
pub mod logging;
pub mod mcp;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::ConnectorConfig;
pub use db::{DatabaseError, DbResult, ErrorKind, InMemoryExecutor, QueryExecutor, QueryResult};
pub use models::*;
pub use services::*;
