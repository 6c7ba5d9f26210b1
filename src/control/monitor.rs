//! Connection state machine over the control endpoint.
//!
//! [`ControlMonitor`] owns the [`ConnectionState`] for the life of the
//! process. Every state transition happens here; the rest of the crate only
//! reads the state. Setup requests are acknowledged synchronously while
//! polling, before the next event can be read - leaving one unanswered
//! stalls the control pipe.

use std::io::{Read, Write};

use crate::error::{Error, Result};

use super::event::{Direction, Event, EVENT_SIZE};

/// Binary USB connection state derived from ep0 events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Interface not configured; bulk endpoints are unusable.
    Disconnected,
    /// Host has enabled the interface; traffic may flow.
    Connected,
}

/// Consumes ep0 events and tracks the connection state.
#[derive(Debug)]
pub struct ControlMonitor {
    state: ConnectionState,
}

impl ControlMonitor {
    /// Create a monitor in the initial `Disconnected` state.
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
        }
    }

    /// Current connection state.
    #[inline]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True while the host has the interface enabled.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Block for one event on ep0, acknowledge it if required, and apply it.
    ///
    /// A read that returns zero bytes (or fails) means the control handle
    /// itself is broken and yields [`Error::EventReadFailed`].
    pub fn poll_event<E: Read + Write>(&mut self, ep0: &mut E) -> Result<Event> {
        let mut raw = [0u8; EVENT_SIZE];
        let n = ep0
            .read(&mut raw)
            .map_err(|e| Error::EventReadFailed(e.to_string()))?;
        if n == 0 {
            return Err(Error::EventReadFailed("empty read".to_string()));
        }
        if n < EVENT_SIZE {
            return Err(Error::EventReadFailed(format!(
                "short event record: {} of {} bytes",
                n, EVENT_SIZE
            )));
        }

        let event = Event::decode(&raw);
        tracing::debug!(?event, "control event");

        if let Event::Setup { direction } = event {
            ack_setup(ep0, direction);
        }
        self.apply(event);
        Ok(event)
    }

    /// Apply one event to the connection state.
    ///
    /// Only `Enable` and `Disable` transition; setup and everything else
    /// leave the state untouched.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Enable => self.state = ConnectionState::Connected,
            Event::Disable => self.state = ConnectionState::Disconnected,
            _ => {}
        }
    }

    /// Record that a bulk transfer observed a link reset.
    ///
    /// The kernel will deliver a `Disable` for the teardown eventually, but
    /// the session must not re-enter traffic until a fresh `Enable`
    /// arrives, so the state drops to `Disconnected` right away.
    pub fn note_link_reset(&mut self) {
        tracing::debug!("link reset, marking disconnected");
        self.state = ConnectionState::Disconnected;
    }
}

impl Default for ControlMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Acknowledge a setup request with a zero-length transfer in the status
/// direction. The result is deliberately ignored, as in the original
/// protocol: the transfer itself is the acknowledgement.
fn ack_setup<E: Read + Write>(ep0: &mut E, direction: Direction) {
    match direction {
        Direction::DeviceToHost => {
            let _ = ep0.write(&[]);
        }
        Direction::HostToDevice => {
            let _ = ep0.read(&mut []);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;

    /// Minimal ep0 stand-in: queued reads plus counters for the
    /// zero-length acknowledgement transfers.
    struct MockEp0 {
        reads: VecDeque<Vec<u8>>,
        zero_writes: usize,
        zero_reads: usize,
    }

    impl MockEp0 {
        fn new(reads: Vec<Vec<u8>>) -> Self {
            Self {
                reads: reads.into(),
                zero_writes: 0,
                zero_reads: 0,
            }
        }
    }

    impl Read for MockEp0 {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if buf.is_empty() {
                self.zero_reads += 1;
                return Ok(0);
            }
            match self.reads.pop_front() {
                Some(data) => {
                    buf[..data.len()].copy_from_slice(&data);
                    Ok(data.len())
                }
                None => Ok(0),
            }
        }
    }

    impl Write for MockEp0 {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.is_empty() {
                self.zero_writes += 1;
            }
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn record(event_type: u8, request_type: u8) -> Vec<u8> {
        let mut raw = vec![0u8; EVENT_SIZE];
        raw[0] = request_type;
        raw[8] = event_type;
        raw
    }

    #[test]
    fn test_enable_from_any_state() {
        let mut monitor = ControlMonitor::new();
        monitor.apply(Event::Enable);
        assert_eq!(monitor.state(), ConnectionState::Connected);
        monitor.apply(Event::Enable);
        assert_eq!(monitor.state(), ConnectionState::Connected);
    }

    #[test]
    fn test_disable_from_any_state() {
        let mut monitor = ControlMonitor::new();
        monitor.apply(Event::Disable);
        assert_eq!(monitor.state(), ConnectionState::Disconnected);
        monitor.apply(Event::Enable);
        monitor.apply(Event::Disable);
        assert_eq!(monitor.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_setup_never_changes_state() {
        let setup = Event::Setup {
            direction: Direction::DeviceToHost,
        };
        let mut monitor = ControlMonitor::new();
        monitor.apply(setup);
        assert_eq!(monitor.state(), ConnectionState::Disconnected);
        monitor.apply(Event::Enable);
        monitor.apply(setup);
        assert_eq!(monitor.state(), ConnectionState::Connected);
    }

    #[test]
    fn test_other_events_ignored() {
        let mut monitor = ControlMonitor::new();
        for event in [
            Event::Bind,
            Event::Unbind,
            Event::Suspend,
            Event::Resume,
            Event::Other(200),
        ] {
            monitor.apply(event);
            assert_eq!(monitor.state(), ConnectionState::Disconnected);
        }
    }

    #[test]
    fn test_poll_applies_enable() {
        let mut ep0 = MockEp0::new(vec![record(2, 0)]);
        let mut monitor = ControlMonitor::new();
        let event = monitor.poll_event(&mut ep0).unwrap();
        assert_eq!(event, Event::Enable);
        assert!(monitor.is_connected());
    }

    #[test]
    fn test_poll_acks_in_setup_with_zero_length_write() {
        let mut ep0 = MockEp0::new(vec![record(4, 0x80)]);
        let mut monitor = ControlMonitor::new();
        monitor.poll_event(&mut ep0).unwrap();
        assert_eq!(ep0.zero_writes, 1);
        assert_eq!(ep0.zero_reads, 0);
    }

    #[test]
    fn test_poll_acks_out_setup_with_zero_length_read() {
        let mut ep0 = MockEp0::new(vec![record(4, 0x00)]);
        let mut monitor = ControlMonitor::new();
        monitor.poll_event(&mut ep0).unwrap();
        assert_eq!(ep0.zero_reads, 1);
        assert_eq!(ep0.zero_writes, 0);
    }

    #[test]
    fn test_poll_empty_read_is_fatal() {
        let mut ep0 = MockEp0::new(vec![]);
        let mut monitor = ControlMonitor::new();
        let result = monitor.poll_event(&mut ep0);
        assert!(matches!(result, Err(Error::EventReadFailed(_))));
    }

    #[test]
    fn test_poll_short_record_is_fatal() {
        let mut ep0 = MockEp0::new(vec![vec![0u8; 5]]);
        let mut monitor = ControlMonitor::new();
        let result = monitor.poll_event(&mut ep0);
        assert!(matches!(result, Err(Error::EventReadFailed(_))));
    }

    #[test]
    fn test_note_link_reset_requires_fresh_enable() {
        let mut monitor = ControlMonitor::new();
        monitor.apply(Event::Enable);
        monitor.note_link_reset();
        assert_eq!(monitor.state(), ConnectionState::Disconnected);
        monitor.apply(Event::Enable);
        assert!(monitor.is_connected());
    }
}
