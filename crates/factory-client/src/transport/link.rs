// crates/factory-client/src/transport/link.rs

//! One established connection, in either transport mode.

use std::time::Duration;

use bytes::BytesMut;
use factory_protocol::frame;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::TransportMode;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A live connection carrying envelope strings.
pub enum Link {
    WebSocket(Box<WsStream>),
    Tcp {
        stream: TcpStream,
        read_buffer: BytesMut,
        write_buffer: BytesMut,
    },
}

impl Link {
    /// Open a connection in `mode`, bounded by the configured timeout.
    pub async fn connect(mode: TransportMode, config: &ClientConfig) -> Result<Self, ClientError> {
        let timeout = Duration::from_millis(config.connect_timeout_ms);
        match tokio::time::timeout(timeout, Self::open(mode, config)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("{} connect timed out after {:?}", mode, timeout),
            ))),
        }
    }

    async fn open(mode: TransportMode, config: &ClientConfig) -> Result<Self, ClientError> {
        match mode {
            TransportMode::WebSocket => {
                let (ws, _response) = tokio_tungstenite::connect_async(config.ws_url.as_str()).await?;
                Ok(Link::WebSocket(Box::new(ws)))
            }
            TransportMode::Tcp => {
                let stream = TcpStream::connect(&config.tcp_addr).await?;
                stream.set_nodelay(true)?;
                Ok(Link::Tcp {
                    stream,
                    read_buffer: BytesMut::with_capacity(64 * 1024),
                    write_buffer: BytesMut::with_capacity(4 * 1024),
                })
            }
        }
    }

    pub fn mode(&self) -> TransportMode {
        match self {
            Link::WebSocket(_) => TransportMode::WebSocket,
            Link::Tcp { .. } => TransportMode::Tcp,
        }
    }

    /// Send one envelope.
    pub async fn send(&mut self, text: String) -> Result<(), ClientError> {
        trace!(mode = %self.mode(), "send {}", text);
        match self {
            Link::WebSocket(ws) => {
                ws.send(Message::Text(text)).await?;
            }
            Link::Tcp {
                stream,
                write_buffer,
                ..
            } => {
                write_buffer.clear();
                frame::encode_frame(text.as_bytes(), write_buffer)?;
                stream.write_all(&write_buffer[..]).await?;
                stream.flush().await?;
            }
        }
        Ok(())
    }

    /// Receive the next envelope. `Ok(None)` means the peer closed.
    ///
    /// Cancel-safe: partial TCP frames stay in the read buffer.
    pub async fn recv(&mut self) -> Result<Option<String>, ClientError> {
        match self {
            Link::WebSocket(ws) => loop {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                    Some(Ok(Message::Binary(bytes))) => {
                        return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
                    }
                    Some(Ok(Message::Close(frame))) => {
                        debug!("websocket closed by peer: {:?}", frame);
                        return Ok(None);
                    }
                    // Ping/pong are answered by tungstenite itself.
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(None),
                }
            },
            Link::Tcp {
                stream,
                read_buffer,
                ..
            } => loop {
                if let Some(payload) = frame::decode_frame(read_buffer)? {
                    return Ok(Some(String::from_utf8_lossy(&payload).into_owned()));
                }
                let n = stream.read_buf(read_buffer).await?;
                if n == 0 {
                    return Ok(None);
                }
            },
        }
    }

    /// Best-effort close; errors are irrelevant at this point.
    pub async fn close(&mut self) {
        match self {
            Link::WebSocket(ws) => {
                let _ = (**ws).close(None).await;
            }
            Link::Tcp { stream, .. } => {
                let _ = stream.shutdown().await;
            }
        }
    }
}
