//! Blocking message framer for the bulk endpoints.
//!
//! One frame is exactly one message: a 2-byte length header followed by the
//! payload (text plus one NUL terminator). Both sides are written against
//! the [`std::io::Read`] / [`std::io::Write`] seams so tests can drive them
//! with in-memory endpoints.
//!
//! Buffers are locally scoped per call; the send and receive paths never
//! alias each other.

use std::io::{self, Read, Write};

use bytes::{BufMut, BytesMut};

use crate::error::{Error, Result};

use super::wire_format::{
    decode_header, encode_header, Message, HEADER_SIZE, MAX_TEXT_LENGTH,
};

/// Send one line of text as a framed message on the bulk-in endpoint.
///
/// Appends the NUL terminator, so the wire payload is `text.len() + 1`
/// bytes and the header value `text.len() + 3`. The header and payload go
/// out as two whole-buffer writes, mirroring the wire contract of one
/// read/write pair per message part.
///
/// A link reset surfaces as [`Error::ConnectionLost`]; any other write
/// failure is [`Error::WriteFailed`].
pub fn send_message<W: Write>(ep: &mut W, text: &[u8]) -> Result<()> {
    if text.len() > MAX_TEXT_LENGTH {
        return Err(Error::Framing(format!(
            "line of {} bytes exceeds maximum {}",
            text.len(),
            MAX_TEXT_LENGTH
        )));
    }

    let payload_len = text.len() + 1;
    let header = encode_header(payload_len);

    ep.write_all(&header)
        .map_err(|e| map_write_error(e, "length"))?;

    let mut payload = BytesMut::with_capacity(payload_len);
    payload.put_slice(text);
    payload.put_u8(0);
    ep.write_all(&payload)
        .map_err(|e| map_write_error(e, "content"))?;

    tracing::trace!(bytes = payload_len, "sent message");
    Ok(())
}

/// Receive one framed message from the bulk-out endpoint.
///
/// Performs exactly one read for the header and one for the payload; a read
/// returning fewer bytes than expected is a framing error, never a
/// truncated success. A link reset on either read surfaces as
/// [`Error::ConnectionLost`].
pub fn recv_message<R: Read>(ep: &mut R) -> Result<Message> {
    let mut header = [0u8; HEADER_SIZE];
    let n = ep.read(&mut header).map_err(map_read_error)?;
    if n < HEADER_SIZE {
        return Err(Error::Framing("unable to receive length".to_string()));
    }

    let payload_len = decode_header(&header)?;
    let mut payload = BytesMut::zeroed(payload_len);
    let n = ep.read(&mut payload).map_err(map_read_error)?;
    if n < payload_len {
        return Err(Error::Framing(format!(
            "unable to receive content: got {} of {} bytes",
            n, payload_len
        )));
    }

    tracing::trace!(bytes = payload_len, "received message");
    Ok(Message::new(payload.freeze()))
}

fn map_write_error(e: io::Error, what: &'static str) -> Error {
    if e.kind() == io::ErrorKind::ConnectionReset {
        Error::ConnectionLost
    } else {
        Error::WriteFailed { what, source: e }
    }
}

fn map_read_error(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::ConnectionReset {
        Error::ConnectionLost
    } else {
        Error::Framing(e.to_string())
    }
}
