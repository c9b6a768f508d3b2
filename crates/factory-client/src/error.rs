// crates/factory-client/src/error.rs

use std::path::PathBuf;

use factory_protocol::ProtocolError;
use thiserror::Error;

/// Errors surfaced by the client library.
///
/// None of these reach the user as a crash: transport failures become
/// `connect_error`/`disconnect` events, protocol anomalies are logged and
/// dropped. Only configuration errors abort start-up.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// No mode in the transport preference accepted a connection.
    #[error("no transport available: {0}")]
    NoTransport(String),
}
