//! Connector Configuration
//!
//! Endpoint, credentials, database selector and pagination defaults, read
//! from environment variables:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `NEO4J_URI` | `bolt://localhost:7687` |
//! | `NEO4J_USER` | `neo4j` |
//! | `NEO4J_PASSWORD` | `password` |
//! | `NEO4J_DATABASE` | server default |
//! | `CURSOR_PAGE_SIZE` | `20` |
//! | `NEO4J_MAX_CONNECTIONS` | `16` |
//!
//! Unparseable numeric values fall back to the default with a warning.

use crate::models::PageSize;
use serde::Serialize;
use std::fmt;
use tracing::warn;

pub const DEFAULT_URI: &str = "bolt://localhost:7687";
pub const DEFAULT_USER: &str = "neo4j";
pub const DEFAULT_PASSWORD: &str = "password";
pub const DEFAULT_MAX_CONNECTIONS: usize = 16;

/// Settings consumed when constructing a connector
#[derive(Clone, Serialize)]
pub struct ConnectorConfig {
    pub uri: String,
    pub username: String,
    #[serde(skip_serializing)]
    password: String,
    /// Database name; `None` selects the server's default database
    pub database: Option<String>,
    pub default_page_size: PageSize,
    pub max_connections: usize,
}

impl ConnectorConfig {
    pub fn new(
        uri: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            username: username.into(),
            password: password.into(),
            database: None,
            default_page_size: PageSize::default(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    ///
    /// ```rust
    /// use neo4j_mcp_core::config::ConnectorConfig;
    ///
    /// let config = ConnectorConfig::from_lookup(|key| match key {
    ///     "NEO4J_URI" => Some("bolt://graph:7687".to_string()),
    ///     "CURSOR_PAGE_SIZE" => Some("50".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.uri, "bolt://graph:7687");
    /// assert_eq!(config.default_page_size.get(), 50);
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(
            lookup("NEO4J_URI").unwrap_or_else(|| DEFAULT_URI.to_string()),
            lookup("NEO4J_USER").unwrap_or_else(|| DEFAULT_USER.to_string()),
            lookup("NEO4J_PASSWORD").unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
        );

        config.database = lookup("NEO4J_DATABASE").filter(|db| !db.trim().is_empty());

        if let Some(raw) = lookup("CURSOR_PAGE_SIZE") {
            match raw.trim().parse::<i64>().map(PageSize::try_from) {
                Ok(Ok(size)) => config.default_page_size = size,
                _ => warn!("Ignoring invalid CURSOR_PAGE_SIZE '{}'", raw),
            }
        }

        if let Some(raw) = lookup("NEO4J_MAX_CONNECTIONS") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.max_connections = n,
                _ => warn!("Ignoring invalid NEO4J_MAX_CONNECTIONS '{}'", raw),
            }
        }

        config
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URI, DEFAULT_USER, DEFAULT_PASSWORD)
    }
}

impl fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("default_page_size", &self.default_page_size)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}
