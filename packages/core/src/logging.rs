//! Tracing Setup
//!
//! Installs the global `tracing` subscriber for the connector binaries.
//! The filter comes from `RUST_LOG` and defaults to `info`. The MCP stdio
//! server must keep stdout free for protocol traffic, so it logs to stderr.

use tracing_subscriber::EnvFilter;

/// Destination of formatted log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    Stderr,
}

/// Install the global subscriber
///
/// Returns `false` if a subscriber was already installed (e.g. by a test
/// harness); the existing one is kept.
pub fn init_tracing(target: LogTarget) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match target {
        LogTarget::Stdout => builder.try_init().is_ok(),
        LogTarget::Stderr => builder
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .try_init()
            .is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        init_tracing(LogTarget::Stderr);
        assert!(!init_tracing(LogTarget::Stderr));
    }
}
