// crates/factory-client/src/transport/mod.rs

//! Transport layer for the push channel.
//!
//! Two modes carry the same `{"event", "data"}` envelopes:
//! - `WebSocket`: one envelope per text frame (preferred, lowest latency)
//! - `Tcp`: length-prefixed frames over a plain TCP stream (fallback)
//!
//! The [`driver::TransportDriver`] owns the socket, the reconnect backoff
//! and the heartbeat. It reports lifecycle signals (`connect`,
//! `connect_error`, `reconnect_attempt`, `disconnect`) on the same inbound
//! channel as decoded server events, so the application sees one ordered
//! event stream.
//!
//! Which modes are tried, and in what order, is the [`TransportPreference`]
//! published by the connection manager through a `watch` channel. The
//! driver re-reads it before every attempt.

pub mod driver;
pub mod link;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use driver::TransportDriver;
pub use link::Link;

/// A way of reaching the server.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    WebSocket,
    Tcp,
}

impl TransportMode {
    /// The other mode, used when this one keeps failing.
    pub fn fallback(self) -> Self {
        match self {
            TransportMode::WebSocket => TransportMode::Tcp,
            TransportMode::Tcp => TransportMode::WebSocket,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "websocket" | "ws" => Some(TransportMode::WebSocket),
            "tcp" => Some(TransportMode::Tcp),
            _ => None,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::WebSocket => write!(f, "websocket"),
            TransportMode::Tcp => write!(f, "tcp"),
        }
    }
}

/// Ordered list of modes tried on each connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPreference {
    modes: Vec<TransportMode>,
}

impl TransportPreference {
    /// Only the preferred mode, as on first start.
    pub fn only(mode: TransportMode) -> Self {
        Self { modes: vec![mode] }
    }

    pub fn modes(&self) -> &[TransportMode] {
        &self.modes
    }

    pub fn is_widened(&self) -> bool {
        self.modes.len() > 1
    }

    /// Put the fallback mode first and keep the preferred one as a second
    /// choice. Returns false if already widened.
    pub fn widen(&mut self) -> bool {
        if self.is_widened() {
            return false;
        }
        let preferred = self.modes[0];
        self.modes = vec![preferred.fallback(), preferred];
        true
    }
}

impl fmt::Display for TransportPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.modes.iter().map(|m| m.to_string()).collect();
        write!(f, "{}", names.join(" > "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_puts_fallback_first_once() {
        let mut pref = TransportPreference::only(TransportMode::WebSocket);
        assert!(!pref.is_widened());

        assert!(pref.widen());
        assert_eq!(pref.modes(), &[TransportMode::Tcp, TransportMode::WebSocket]);

        assert!(!pref.widen());
        assert_eq!(pref.modes().len(), 2);
        assert_eq!(pref.to_string(), "tcp > websocket");
    }

    #[test]
    fn parse_modes() {
        assert_eq!(TransportMode::parse("WS"), Some(TransportMode::WebSocket));
        assert_eq!(TransportMode::parse("tcp"), Some(TransportMode::Tcp));
        assert_eq!(TransportMode::parse("polling"), None);
    }
}
