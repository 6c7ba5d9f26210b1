//! # ffs-chat
//!
//! Device side of an interactive text chat over a USB FunctionFS gadget.
//!
//! Given a FunctionFS mount, the crate opens the control endpoint (`ep0`)
//! and one bulk endpoint per direction, performs the one-time descriptor
//! handshake, and then runs a half-duplex chat with the host: messages are
//! 2-byte length-prefixed frames, connection lifecycle is tracked from ep0
//! events, and a link reset drops the session back to waiting for the next
//! enable.
//!
//! ## Architecture
//!
//! - **Transport**: [`transport::EndpointSet`] owns the three endpoint
//!   handles and writes the fixed descriptor/string configuration.
//! - **Control plane**: [`control::ControlMonitor`] consumes ep0 events,
//!   acknowledges setup requests, and derives the connection state.
//! - **Protocol**: [`protocol`] encodes and decodes the length-prefixed
//!   message frames on the bulk endpoints.
//! - **Session**: [`session::ChatSession`] alternates between waiting for a
//!   connection and exchanging one message per direction per turn.
//!
//! All I/O is blocking and single-threaded by design; there is no overlap
//! between waiting for the host and waiting for the operator.

pub mod console;
pub mod control;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transport;

pub use console::{Console, StdConsole};
pub use error::{Error, Result};
pub use session::{ChatSession, EXIT_COMMAND};
pub use transport::EndpointSet;
