//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::store::Timeouts;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store URL; `memory://` selects the in-process store
    pub store_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Per-command timeout in milliseconds
    pub command_timeout_ms: u64,
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Seconds between reconnect attempts while the store is unreachable
    pub reconnect_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STORE_URL` - Store URL (default: redis://127.0.0.1:6379)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `COMMAND_TIMEOUT_MS` - Per-command timeout (default: 2000)
    /// - `CONNECT_TIMEOUT_MS` - Connect timeout (default: 5000)
    /// - `RECONNECT_INTERVAL` - Reconnect frequency in seconds (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            store_url: env::var("STORE_URL").unwrap_or(defaults.store_url),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            command_timeout_ms: parse_var("COMMAND_TIMEOUT_MS")
                .unwrap_or(defaults.command_timeout_ms),
            connect_timeout_ms: parse_var("CONNECT_TIMEOUT_MS")
                .unwrap_or(defaults.connect_timeout_ms),
            reconnect_interval: parse_var("RECONNECT_INTERVAL")
                .unwrap_or(defaults.reconnect_interval),
        }
    }

    /// Timeouts for the store connection handle.
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_millis(self.connect_timeout_ms),
            command: Duration::from_millis(self.command_timeout_ms),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: "redis://127.0.0.1:6379".to_string(),
            server_port: 8080,
            command_timeout_ms: 2000,
            connect_timeout_ms: 5000,
            reconnect_interval: 5,
        }
    }
}
