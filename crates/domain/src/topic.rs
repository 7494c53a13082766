//! Bus topic and payload contract.
//!
//! | Topic | Payload |
//! |-------|---------|
//! | `{base}/water` | water level in liters, decimal text |
//! | `{base}/humidity` | humidity in sensor units, decimal text |
//! | `{base}/pump` | `True` / `False` |
//!
//! Inbound pump payloads are decoded strictly: anything other than the exact
//! text `True` means off.

use crate::event::{Channel, EngineEvent};

/// Base topic used when none is configured.
pub const DEFAULT_BASE_TOPIC: &str = "Watering_system";

const TRUE_PAYLOAD: &str = "True";
const FALSE_PAYLOAD: &str = "False";

/// One of the three logical bus topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Water,
    Humidity,
    Pump,
}

impl Topic {
    pub const ALL: [Self; 3] = [Self::Water, Self::Humidity, Self::Pump];

    /// Last path segment of the topic.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Humidity => "humidity",
            Self::Pump => "pump",
        }
    }

    /// Full topic path under `base`.
    #[must_use]
    pub fn path(self, base: &str) -> String {
        format!("{base}/{}", self.suffix())
    }

    /// Resolve a full topic path published under `base`.
    #[must_use]
    pub fn parse(base: &str, path: &str) -> Option<Self> {
        let suffix = path.strip_prefix(base)?.strip_prefix('/')?;
        Self::ALL.into_iter().find(|topic| topic.suffix() == suffix)
    }

    /// Topic a level report for `channel` is published on.
    #[must_use]
    pub fn for_channel(channel: Channel) -> Self {
        match channel {
            Channel::Water => Self::Water,
            Channel::Humidity => Self::Humidity,
        }
    }

    /// Topic and payload an engine event is published as, if it is published
    /// at all.
    #[must_use]
    pub fn encode_event(event: &EngineEvent) -> Option<(Self, String)> {
        match event {
            EngineEvent::LevelReport { channel, value } => {
                Some((Self::for_channel(*channel), value.to_string()))
            }
            EngineEvent::PumpCommand { on } => Some((Self::Pump, encode_bool(*on).to_string())),
            EngineEvent::Alert(_) => None,
        }
    }
}

/// Encode a boolean the way the bus expects it.
#[must_use]
pub fn encode_bool(value: bool) -> &'static str {
    if value { TRUE_PAYLOAD } else { FALSE_PAYLOAD }
}

/// Decode an inbound pump payload. Only the exact text `True` switches the
/// pump on; malformed payloads fall back to off.
#[must_use]
pub fn decode_pump(payload: &[u8]) -> bool {
    std::str::from_utf8(payload).is_ok_and(|text| text == TRUE_PAYLOAD)
}
