//! Server Configuration
//!
//! Listen address from `HOST` (default `0.0.0.0`) and `PORT` (default
//! `5000`), plus the connector settings read by [`ConnectorConfig`].

use neo4j_mcp_core::ConnectorConfig;
use tracing::warn;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub connector: ConnectorConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST")
            .filter(|host| !host.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!("Ignoring invalid PORT '{}'", raw);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            host,
            port,
            connector: ConnectorConfig::from_lookup(lookup),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
