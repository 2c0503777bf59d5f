//! Database Error Types
//!
//! One error type covers every failure surfaced by the connector. Each error
//! carries an [`ErrorKind`] fixed at creation; enrichment helpers attach the
//! failing query, its parameters and extra context but never change the kind.

use crate::models::Params;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure category of a [`DatabaseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Store unreachable or authentication rejected
    ConnectionFailure,
    /// Malformed query or constraint violation reported by the store
    QueryFailure,
    /// Invalid page size or empty query, raised before any store call
    ConstructionError,
    /// Operation attempted on a closed cursor or unknown handle
    StateError,
}

impl ErrorKind {
    /// Stable machine-readable code
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::ConnectionFailure => "CONNECTION_FAILURE",
            ErrorKind::QueryFailure => "QUERY_FAILURE",
            ErrorKind::ConstructionError => "CONSTRUCTION_ERROR",
            ErrorKind::StateError => "STATE_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::ConnectionFailure => "connection failure",
            ErrorKind::QueryFailure => "query failure",
            ErrorKind::ConstructionError => "construction error",
            ErrorKind::StateError => "state error",
        };
        f.write_str(label)
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Connector error with kind, message, optional query context and cause
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct DatabaseError {
    kind: ErrorKind,
    message: String,
    query: Option<String>,
    params: Option<Params>,
    #[source]
    source: Option<BoxError>,
}

impl DatabaseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            query: None,
            params: None,
            source: None,
        }
    }

    /// Create a connection failure error
    pub fn connection_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConnectionFailure, message)
    }

    /// Create a query failure error
    pub fn query_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::QueryFailure, message)
    }

    /// Create a construction error
    pub fn construction(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConstructionError, message)
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StateError, message)
    }

    /// Attach the underlying cause
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the failing query and parameters
    ///
    /// The innermost context wins: an error that already names a query keeps it.
    pub fn with_query(mut self, query: impl Into<String>, params: &Params) -> Self {
        if self.query.is_none() {
            self.query = Some(query.into());
            self.params = Some(params.clone());
        }
        self
    }

    /// Prefix the message with caller context, keeping the kind
    pub fn context(mut self, context: impl fmt::Display) -> Self {
        self.message = format!("{}: {}", context, self.message);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    pub fn is_connection_failure(&self) -> bool {
        self.kind == ErrorKind::ConnectionFailure
    }
}

/// Shorthand used across the database and service layers
pub type DbResult<T> = Result<T, DatabaseError>;
