//! Control plane module - ep0 events and the connection state machine.
//!
//! The kernel reports connection lifecycle on the control endpoint as
//! fixed-size records. This module decodes them, performs the mandatory
//! zero-length acknowledgement for setup requests, and derives the binary
//! [`ConnectionState`] the chat session polls between phases.

mod event;
mod monitor;

pub use event::{Direction, Event, EVENT_SIZE};
pub use monitor::{ConnectionState, ControlMonitor};
