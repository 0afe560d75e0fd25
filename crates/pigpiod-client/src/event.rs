//! Notification records and their decoding into typed events.

use pigpiod_protocol::Bitmap;

/// Size of one notification record on the wire.
pub const RECORD_SIZE: usize = 12;

/// Flag bit marking a keep-alive record.
pub const FLAG_ALIVE: u16 = 1 << 6;

/// Flag bit marking a watchdog record.
pub const FLAG_WATCHDOG: u16 = 1 << 5;

const WATCHDOG_PIN_MASK: u16 = 0x1f;

/// One fixed-size record as the daemon writes it to the pipe.
///
/// The field order matches the daemon build this client targets; the record
/// is treated as an opaque 12-byte frame with no alignment padding assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationRecord {
    /// Record sequence number.
    pub seq: u32,
    /// Daemon microsecond counter at the time of the report.
    pub tick: u32,
    /// Record kind flags; zero for a plain level report.
    pub flags: u16,
    /// Level bits at the time of the report.
    pub level: u16,
}

impl NotificationRecord {
    /// Decodes one record from its little-endian wire form.
    pub fn decode(bytes: &[u8; RECORD_SIZE]) -> Self {
        Self {
            seq: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            tick: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            flags: u16::from_le_bytes([bytes[8], bytes[9]]),
            level: u16::from_le_bytes([bytes[10], bytes[11]]),
        }
    }

    fn is_alive(&self) -> bool {
        self.flags & FLAG_ALIVE != 0
    }

    fn is_watchdog(&self) -> bool {
        self.flags & FLAG_WATCHDOG != 0
    }

    fn watchdog_pin(&self) -> u8 {
        (self.flags & WATCHDOG_PIN_MASK) as u8
    }
}

/// A decoded notification, handed to the registered handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpioEvent {
    /// Periodic keep-alive report carrying the full level snapshot.
    Alive {
        tick: u32,
        level: u16,
        /// Pins whose level bit is high in the snapshot.
        high_pins: Vec<u8>,
    },
    /// A subscribed pin changed level.
    LevelChanged { pin: u8, level: bool, tick: u32 },
    /// A watchdog expired for a pin.
    Watchdog { pin: u8, tick: u32 },
}

/// Turns records into events, tracking the previous level snapshot for edge
/// detection.
#[derive(Debug)]
pub struct EventDecoder {
    subscribed: Bitmap,
    last_level: u16,
}

impl EventDecoder {
    /// Creates a decoder for the given pin subscription.
    pub fn new(subscribed: Bitmap) -> Self {
        Self {
            subscribed,
            last_level: 0,
        }
    }

    /// Replaces the pin subscription, keeping the level snapshot.
    pub fn set_subscription(&mut self, subscribed: Bitmap) {
        self.subscribed = subscribed;
    }

    /// Decodes one record into its events.
    ///
    /// A keep-alive or watchdog record yields exactly one event; a level
    /// report yields one `LevelChanged` per subscribed pin whose bit differs
    /// from the previous snapshot. The snapshot is updated after every
    /// record regardless of variant.
    pub fn decode(&mut self, record: &NotificationRecord) -> Vec<GpioEvent> {
        let events = if record.is_alive() {
            vec![GpioEvent::Alive {
                tick: record.tick,
                level: record.level,
                high_pins: Bitmap::from_mask(u32::from(record.level)).pins(),
            }]
        } else if record.is_watchdog() {
            vec![GpioEvent::Watchdog {
                pin: record.watchdog_pin(),
                tick: record.tick,
            }]
        } else {
            let changed = u32::from(record.level ^ self.last_level) & self.subscribed.mask();
            Bitmap::from_mask(changed)
                .pins()
                .into_iter()
                .map(|pin| GpioEvent::LevelChanged {
                    pin,
                    level: u32::from(record.level) & (1 << pin) != 0,
                    tick: record.tick,
                })
                .collect()
        };
        self.last_level = record.level;
        events
    }
}
