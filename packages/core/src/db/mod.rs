//! Database Layer
//!
//! This module handles every interaction with the graph store:
//!
//! - The [`QueryExecutor`] / [`Transaction`] abstraction the rest of the crate
//!   is written against
//! - The single connector error type, [`DatabaseError`]
//! - [`InMemoryExecutor`], a fixed-dataset executor for tests and demos
//! - `Neo4jExecutor`, the Bolt-driver executor (feature `neo4j`)
//!
//! # Architecture
//!
//! The store is treated as an opaque executor of parameterized queries.
//! Query planning, isolation and schema semantics stay in the database; this
//! layer only moves queries in and rows out.

mod error;
mod executor;
mod memory_store;
#[cfg(feature = "neo4j")]
mod neo4j_store;

pub use error::{DatabaseError, DbResult, ErrorKind};
pub use executor::{QueryExecutor, QueryResult, QuerySummary, Transaction};
pub use memory_store::{ExecutorCall, InMemoryExecutor};
#[cfg(feature = "neo4j")]
pub use neo4j_store::Neo4jExecutor;
