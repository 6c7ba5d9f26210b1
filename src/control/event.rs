//! FunctionFS control event records.
//!
//! The kernel delivers structural notifications on ep0 as fixed-size
//! records:
//! ```text
//! ┌──────────────────────────┬────────┬─────────┐
//! │ setup packet             │ type   │ padding │
//! │ 8 bytes                  │ 1 byte │ 3 bytes │
//! └──────────────────────────┴────────┴─────────┘
//! ```
//! Only setup events carry meaningful data in the first 8 bytes; for them
//! bit 7 of `bmRequestType` (offset 0) gives the transfer direction.

/// Size of one event record on ep0.
pub const EVENT_SIZE: usize = 12;

/// Offset of the event type byte within a record.
const TYPE_OFFSET: usize = 8;

/// Direction bit in `bmRequestType`: set means device-to-host.
const USB_DIR_IN: u8 = 0x80;

// Event type values from the FunctionFS ABI.
const EVENT_BIND: u8 = 0;
const EVENT_UNBIND: u8 = 1;
const EVENT_ENABLE: u8 = 2;
const EVENT_DISABLE: u8 = 3;
const EVENT_SETUP: u8 = 4;
const EVENT_SUSPEND: u8 = 5;
const EVENT_RESUME: u8 = 6;

/// Transfer direction of a setup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Host expects data from the device (IN).
    DeviceToHost,
    /// Host sends data to the device (OUT).
    HostToDevice,
}

/// One classified control event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Function bound to the gadget.
    Bind,
    /// Function unbound.
    Unbind,
    /// Host configured the interface; endpoints are usable.
    Enable,
    /// Interface torn down (unplug, reset, reconfiguration).
    Disable,
    /// Host configuration request that must be acknowledged immediately.
    Setup {
        /// Direction of the requested transfer.
        direction: Direction,
    },
    /// Bus suspended.
    Suspend,
    /// Bus resumed.
    Resume,
    /// Unknown event type, ignored.
    Other(u8),
}

impl Event {
    /// Decode one raw event record.
    pub fn decode(raw: &[u8; EVENT_SIZE]) -> Self {
        match raw[TYPE_OFFSET] {
            EVENT_BIND => Event::Bind,
            EVENT_UNBIND => Event::Unbind,
            EVENT_ENABLE => Event::Enable,
            EVENT_DISABLE => Event::Disable,
            EVENT_SETUP => {
                let direction = if raw[0] & USB_DIR_IN != 0 {
                    Direction::DeviceToHost
                } else {
                    Direction::HostToDevice
                };
                Event::Setup { direction }
            }
            EVENT_SUSPEND => Event::Suspend,
            EVENT_RESUME => Event::Resume,
            other => Event::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(event_type: u8, request_type: u8) -> [u8; EVENT_SIZE] {
        let mut raw = [0u8; EVENT_SIZE];
        raw[0] = request_type;
        raw[TYPE_OFFSET] = event_type;
        raw
    }

    #[test]
    fn test_decode_lifecycle_events() {
        assert_eq!(Event::decode(&record(0, 0)), Event::Bind);
        assert_eq!(Event::decode(&record(1, 0)), Event::Unbind);
        assert_eq!(Event::decode(&record(2, 0)), Event::Enable);
        assert_eq!(Event::decode(&record(3, 0)), Event::Disable);
        assert_eq!(Event::decode(&record(5, 0)), Event::Suspend);
        assert_eq!(Event::decode(&record(6, 0)), Event::Resume);
    }

    #[test]
    fn test_decode_setup_direction() {
        assert_eq!(
            Event::decode(&record(4, 0x80)),
            Event::Setup {
                direction: Direction::DeviceToHost
            }
        );
        // Class request to interface, direction bit clear.
        assert_eq!(
            Event::decode(&record(4, 0x21)),
            Event::Setup {
                direction: Direction::HostToDevice
            }
        );
    }

    #[test]
    fn test_decode_unknown_type() {
        assert_eq!(Event::decode(&record(42, 0)), Event::Other(42));
    }
}
