//! factory-protocol
//!
//! Wire-level encoding/decoding for the factory channel.
//!
//! This crate is responsible for turning logical messages into text and
//! bytes and back again, and for rejecting malformed payloads at the
//! boundary:
//!
//! - [`messages`]   : typed inbound events / outbound messages
//! - [`json_codec`] : `{"event", "data"}` envelope codec
//! - [`frame`]      : length-prefixed frames for the TCP mode

pub mod wire_types;
pub mod messages;
pub mod json_codec;
pub mod frame;

pub use messages::{InboundEvent, OutboundMessage};
pub use json_codec::{decode_inbound, decode_outbound, encode_inbound, encode_outbound};
pub use frame::{decode_frame, encode_frame};

use thiserror::Error;

/// Errors that can arise when encoding/decoding a message.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Not valid JSON, or not an `{"event", "data"}` envelope.
    #[error("invalid envelope: {0}")]
    Json(#[source] serde_json::Error),

    /// Known event name, payload of the wrong shape.
    #[error("malformed `{event}` payload: {source}")]
    MalformedPayload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// An edit without the id of the unit it edits.
    #[error("edit message without unit id")]
    MissingId,

    /// Frame length above `MAX_FRAME_SIZE`.
    #[error("frame too large: {0} bytes")]
    FrameTooLarge(usize),
}
