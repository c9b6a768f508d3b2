// crates/factory-client/src/config.rs

//! Client configuration.
//!
//! Values come from, lowest to highest priority:
//! - built-in defaults,
//! - an optional TOML file (`--config path`),
//! - command-line flags (applied in `main`).
//!
//! Example file:
//!
//! ```toml
//! ws_url = "ws://factories.example:5000/channel"
//! tcp_addr = "factories.example:5001"
//! preferred_transport = "websocket"
//! max_reconnect_attempts = 20
//! log_file = "factory-client.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::transport::TransportMode;

/// Configuration for the factory client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket endpoint, used in `websocket` mode.
    pub ws_url: String,

    /// `host:port` of the framed TCP endpoint, used in `tcp` mode.
    pub tcp_addr: String,

    /// Transport tried first on every connection attempt.
    pub preferred_transport: TransportMode,

    /// Per-mode bound on establishing a connection.
    pub connect_timeout_ms: u64,

    /// Delay before the first reconnect attempt; doubles per attempt.
    pub reconnect_delay_ms: u64,

    /// Upper bound on the reconnect delay.
    pub max_reconnect_delay_ms: u64,

    /// Give up after this many consecutive failed attempts (`None` = never).
    pub max_reconnect_attempts: Option<u32>,

    /// Heartbeat ping interval while connected (0 disables it).
    pub heartbeat_interval_secs: u64,

    /// Write logs here. Logging is off when unset and `--debug` is not given.
    pub log_file: Option<PathBuf>,

    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ws_url: "ws://127.0.0.1:5000/channel".to_string(),
            tcp_addr: "127.0.0.1:5001".to_string(),
            preferred_transport: TransportMode::WebSocket,
            connect_timeout_ms: 5000,
            reconnect_delay_ms: 1000,
            max_reconnect_delay_ms: 30_000,
            max_reconnect_attempts: None,
            heartbeat_interval_secs: 25,
            log_file: None,
            log_filter: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load a TOML file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ClientError> {
        let text = std::fs::read_to_string(path).map_err(|source| ClientError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ClientError> {
        Ok(toml::from_str(text)?)
    }

    /// Backoff before reconnect attempt `attempt` (1-based).
    pub fn reconnect_delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let delay = self.reconnect_delay_ms.saturating_mul(1u64 << shift);
        Duration::from_millis(delay.min(self.max_reconnect_delay_ms))
    }

    pub fn heartbeat_interval(&self) -> Option<Duration> {
        if self.heartbeat_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.heartbeat_interval_secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ClientConfig::from_toml(
            r#"
            tcp_addr = "10.0.0.5:7000"
            preferred_transport = "tcp"
            max_reconnect_attempts = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.tcp_addr, "10.0.0.5:7000");
        assert_eq!(config.preferred_transport, TransportMode::Tcp);
        assert_eq!(config.max_reconnect_attempts, Some(3));
        assert_eq!(config.ws_url, ClientConfig::default().ws_url);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(matches!(
            ClientConfig::from_toml("preferred_transport = 12"),
            Err(ClientError::ConfigParse(_))
        ));
    }

    #[test]
    fn reconnect_delay_doubles_and_caps() {
        let config = ClientConfig {
            reconnect_delay_ms: 500,
            max_reconnect_delay_ms: 3000,
            ..ClientConfig::default()
        };

        assert_eq!(config.reconnect_delay(1), Duration::from_millis(500));
        assert_eq!(config.reconnect_delay(2), Duration::from_millis(1000));
        assert_eq!(config.reconnect_delay(3), Duration::from_millis(2000));
        assert_eq!(config.reconnect_delay(4), Duration::from_millis(3000));
        assert_eq!(config.reconnect_delay(40), Duration::from_millis(3000));
    }

    #[test]
    fn zero_heartbeat_disables_it() {
        let config = ClientConfig {
            heartbeat_interval_secs: 0,
            ..ClientConfig::default()
        };
        assert_eq!(config.heartbeat_interval(), None);
    }
}
