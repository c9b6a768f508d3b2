//! Length-prefixed framing for the TCP transport mode.
//!
//! ```text
//! +----------------+------------------------------------------+
//! | Length (4)     | JSON envelope (variable)                 |
//! | big-endian u32 |                                          |
//! +----------------+------------------------------------------+
//! ```
//!
//! The WebSocket mode does not use this; each text frame is already one
//! envelope.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::wire_types::MAX_FRAME_SIZE;
use crate::ProtocolError;

const HEADER_SIZE: usize = 4;

/// Append one frame carrying `payload` to `dst`.
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<(), ProtocolError> {
    if payload.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge(payload.len()));
    }

    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u32(payload.len() as u32);
    dst.extend_from_slice(payload);
    Ok(())
}

/// Split one complete frame payload off the front of `src`.
///
/// Returns `Ok(None)` when more bytes are needed; `src` is left intact in
/// that case so the caller can read more and retry.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Bytes>, ProtocolError> {
    if src.len() < HEADER_SIZE {
        return Ok(None);
    }

    let len = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge(len));
    }

    if src.len() < HEADER_SIZE + len {
        src.reserve(HEADER_SIZE + len - src.len());
        return Ok(None);
    }

    src.advance(HEADER_SIZE);
    Ok(Some(src.split_to(len).freeze()))
}
