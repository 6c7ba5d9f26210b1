//! Wire format encoding and decoding for chat frames.
//!
//! Implements the 2-byte header format:
//! ```text
//! ┌────────────┬──────────────────────────────┐
//! │ Length     │ Payload                      │
//! │ 2 bytes    │ text bytes + NUL terminator  │
//! │ uint16 LE  │                              │
//! └────────────┴──────────────────────────────┘
//! ```
//!
//! The length field is Little Endian and counts itself: its wire value is
//! always `payload length + 2`. Encoding and decoding operate on explicit
//! byte buffers, never on in-memory struct layout.

use bytes::Bytes;

use crate::error::{Error, Result};

/// Header size in bytes (fixed, exactly 2).
pub const HEADER_SIZE: usize = 2;

/// Size of the line buffer in the original protocol (8 KB per line).
pub const MAX_LINE_LENGTH: usize = 8 * 1024;

/// Longest text the send path accepts.
///
/// One byte of the line buffer is reserved for the header counting itself
/// on the wire and one for the implicit NUL terminator.
pub const MAX_TEXT_LENGTH: usize = MAX_LINE_LENGTH - HEADER_SIZE - 1;

/// Largest payload the receive path will allocate for a declared length.
pub const MAX_PAYLOAD_LENGTH: usize = MAX_LINE_LENGTH - HEADER_SIZE;

/// Encode the header for a payload of `payload_len` bytes.
///
/// # Panics
///
/// Debug-asserts that `payload_len` does not exceed [`MAX_PAYLOAD_LENGTH`];
/// callers validate the bound before encoding.
pub fn encode_header(payload_len: usize) -> [u8; HEADER_SIZE] {
    debug_assert!(payload_len <= MAX_PAYLOAD_LENGTH);
    ((payload_len + HEADER_SIZE) as u16).to_le_bytes()
}

/// Decode a header and return the declared payload length.
///
/// Rejects wire values below 2 (the field counts itself, so smaller values
/// would underflow) and values declaring more than [`MAX_PAYLOAD_LENGTH`]
/// bytes, so a malformed header can never trigger a large allocation.
pub fn decode_header(buf: &[u8; HEADER_SIZE]) -> Result<usize> {
    let wire_value = u16::from_le_bytes(*buf) as usize;
    let payload_len = wire_value
        .checked_sub(HEADER_SIZE)
        .ok_or_else(|| Error::Framing(format!("invalid length field {}", wire_value)))?;
    if payload_len > MAX_PAYLOAD_LENGTH {
        return Err(Error::Framing(format!(
            "declared payload of {} bytes exceeds maximum {}",
            payload_len, MAX_PAYLOAD_LENGTH
        )));
    }
    Ok(payload_len)
}

/// One decoded chat message.
///
/// Transient: one instance per framed transfer. The payload is the raw
/// bytes from the wire, conceptually a NUL-terminated text line, but the
/// framing itself is binary and terminator-agnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    payload: Bytes,
}

impl Message {
    /// Create a message from a decoded payload.
    pub fn new(payload: Bytes) -> Self {
        Self { payload }
    }

    /// Raw payload bytes, terminator included.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload length in bytes.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Payload as display text, with the trailing NUL (if any) stripped.
    pub fn text(&self) -> String {
        let bytes = match self.payload.split_last() {
            Some((&0, rest)) => rest,
            _ => &self.payload[..],
        };
        String::from_utf8_lossy(bytes).into_owned()
    }
}
