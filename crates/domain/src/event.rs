//! Events emitted by the watering engine.
//!
//! The engine never performs IO. Each state transition returns the events
//! it produced, in the order they happened, and the caller decides how to
//! deliver them (bus publication, mail, logging).

use serde::Serialize;

/// A measured quantity reported after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Water in the tank, liters.
    Water,
    /// Soil humidity, sensor units.
    Humidity,
}

/// Which bound of the reservoir was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    TankFull,
    TankEmpty,
}

/// A tank alert, with the levels at the moment it fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub water_level: u32,
    pub max_volume: u32,
}

/// Something the engine wants the outside world to know or do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// The new value of a channel after a tick.
    LevelReport { channel: Channel, value: u32 },
    /// Request to switch the pump.
    PumpCommand { on: bool },
    /// The tank reached one of its bounds.
    Alert(Alert),
}

impl EngineEvent {
    /// Return the pump command carried by this event, if any.
    #[must_use]
    pub fn pump_command(&self) -> Option<bool> {
        match self {
            Self::PumpCommand { on } => Some(*on),
            _ => None,
        }
    }

    /// Return the alert carried by this event, if any.
    #[must_use]
    pub fn alert(&self) -> Option<&Alert> {
        match self {
            Self::Alert(alert) => Some(alert),
            _ => None,
        }
    }
}
