//! Protocol module - wire format and blocking framer.
//!
//! This module implements the length-prefixed message protocol carried on
//! the bulk endpoints:
//! - 2-byte little-endian header encoding/decoding
//! - blocking send/receive of one frame per call

mod framer;
mod wire_format;

pub use framer::{recv_message, send_message};
pub use wire_format::{
    decode_header, encode_header, Message, HEADER_SIZE, MAX_LINE_LENGTH, MAX_PAYLOAD_LENGTH,
    MAX_TEXT_LENGTH,
};
