//! Tracing subscriber setup for embedders.
//!
//! The library itself only emits `tracing` events. Hosts that have no
//! subscriber of their own can call [`init_logging`] once at startup.

use tracing_subscriber::EnvFilter;

use crate::error::ChatError;

/// Environment variable consulted when `RUST_LOG` is unset
pub const LOG_LEVEL_ENV: &str = "DOCCHAT_LOG_LEVEL";

/// Build the filter: `RUST_LOG`, then `DOCCHAT_LOG_LEVEL`, then `default_filter`.
///
/// An unparsable directive falls back to `warn`.
pub fn log_filter(default_filter: &str) -> EnvFilter {
    let directive = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_LEVEL_ENV))
        .unwrap_or_else(|_| default_filter.to_string());

    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install a stderr `fmt` subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(default_filter: &str) -> Result<(), ChatError> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(default_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| ChatError::Config {
            message: format!("failed to install tracing subscriber: {}", e),
        })
}
