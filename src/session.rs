//! Interactive chat session loop.
//!
//! The session alternates between two phases, forever:
//!
//! 1. **WaitConnect** - poll control events on ep0 until the host enables
//!    the interface. Any error here is fatal.
//! 2. **Active** - strict half-duplex turns: receive a message from the
//!    host, display it, read one line from the operator, send it. The
//!    `\exit` sentinel leaves the phase without sending; a link reset
//!    prints a transient notice and falls back to WaitConnect. Every other
//!    error is fatal and propagates.
//!
//! The active phase never polls control events mid-exchange; link loss is
//! only observed through the reset classification of bulk I/O errors.

use std::io::{Read, Write};

use crate::console::Console;
use crate::control::{ConnectionState, ControlMonitor};
use crate::error::{Error, Result};
use crate::protocol::{recv_message, send_message};

/// Typing this line leaves the active phase without sending it.
pub const EXIT_COMMAND: &str = "\\exit";

/// Prompt shown before reading operator input.
const PROMPT: &str = "device> ";

/// Why the active phase ended without a fatal error.
enum PhaseEnd {
    /// The operator typed the exit sentinel.
    ExitRequested,
    /// A bulk transfer observed a link reset.
    LinkLost,
}

/// One interactive chat session over a set of gadget endpoints.
pub struct ChatSession<C: Console> {
    monitor: ControlMonitor,
    console: C,
}

impl<C: Console> ChatSession<C> {
    /// Create a session; the connection starts out `Disconnected`.
    pub fn new(console: C) -> Self {
        Self {
            monitor: ControlMonitor::new(),
            console,
        }
    }

    /// Current connection state as derived from control events.
    pub fn connection_state(&self) -> ConnectionState {
        self.monitor.state()
    }

    /// Drive the chat until a fatal error.
    ///
    /// The loop itself never finishes voluntarily; the only exits are error
    /// returns (and process termination from outside).
    pub fn run<E0, In, Out>(
        &mut self,
        ep0: &mut E0,
        bulk_in: &mut In,
        bulk_out: &mut Out,
    ) -> Result<()>
    where
        E0: Read + Write,
        In: Write,
        Out: Read,
    {
        loop {
            self.wait_for_connection(ep0)?;
            match self.run_connected(bulk_in, bulk_out)? {
                PhaseEnd::ExitRequested => {
                    tracing::debug!("operator requested exit, restarting chat")
                }
                PhaseEnd::LinkLost => {
                    self.monitor.note_link_reset();
                    self.console
                        .status("Connection lost.")
                        .map_err(Error::Console)?;
                }
            }
        }
    }

    /// WaitConnect phase: block on ep0 until the interface is enabled.
    fn wait_for_connection<E0: Read + Write>(&mut self, ep0: &mut E0) -> Result<()> {
        self.console
            .status("Waiting for connection...")
            .map_err(Error::Console)?;
        while !self.monitor.is_connected() {
            self.monitor.poll_event(ep0)?;
        }
        Ok(())
    }

    /// Active phase: chat turns until exit, link loss, or a fatal error.
    fn run_connected<In, Out>(&mut self, bulk_in: &mut In, bulk_out: &mut Out) -> Result<PhaseEnd>
    where
        In: Write,
        Out: Read,
    {
        self.console.status("Chat started.").map_err(Error::Console)?;

        loop {
            let message = match recv_message(bulk_out) {
                Ok(message) => message,
                Err(Error::ConnectionLost) => return Ok(PhaseEnd::LinkLost),
                Err(e) => return Err(e),
            };
            self.console
                .peer_line(&message.text())
                .map_err(Error::Console)?;

            let line = self
                .console
                .read_line(PROMPT)
                .map_err(Error::Console)?
                .ok_or(Error::ConsoleClosed)?;

            if line == EXIT_COMMAND {
                return Ok(PhaseEnd::ExitRequested);
            }

            match send_message(bulk_in, line.as_bytes()) {
                Ok(()) => {}
                Err(Error::ConnectionLost) => return Ok(PhaseEnd::LinkLost),
                Err(e) => return Err(e),
            }
        }
    }
}
