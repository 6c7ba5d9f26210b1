//! Error types for ffs-chat.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for all gadget and chat operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An endpoint file could not be opened.
    #[error("unable to open {path}: {source}")]
    OpenFailed {
        /// Path of the endpoint file that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The kernel rejected the descriptor or string configuration on ep0.
    #[error("unable to write {what}: {source}")]
    ConfigRejected {
        /// Which blob was being written ("descriptors" or "strings").
        what: &'static str,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Reading a control event from ep0 failed or returned no data.
    ///
    /// This means the control handle itself is broken, not a protocol-level
    /// condition; it is always fatal.
    #[error("unable to read event from ep0: {0}")]
    EventReadFailed(String),

    /// Malformed or truncated frame on a bulk endpoint.
    #[error("framing error: {0}")]
    Framing(String),

    /// A bulk write failed for a reason other than a link reset.
    #[error("unable to send {what}: {source}")]
    WriteFailed {
        /// Which part of the frame was being written ("length" or "content").
        what: &'static str,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The USB link was reset while a bulk transfer was in flight.
    ///
    /// Recoverable: the session returns to waiting for a fresh enable.
    #[error("connection lost")]
    ConnectionLost,

    /// Operator console I/O failed.
    #[error("console I/O failed: {0}")]
    Console(#[source] std::io::Error),

    /// Operator console input reached end of file.
    #[error("console input closed")]
    ConsoleClosed,
}

impl Error {
    /// True for the one recoverable condition, a link reset mid-transfer.
    #[inline]
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, Error::ConnectionLost)
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
