//! Watering engine — the physical-state model of one reservoir and the soil
//! it irrigates.
//!
//! Two independent axes advance one tick at a time:
//!
//! - **Water**: the tank drains while the pump runs and refills passively.
//!   The level is clamped to the reservoir bounds on every tick. Reaching a
//!   bound raises a single alert per excursion; the alert re-arms once the
//!   level is strictly inside the bounds again. An empty tank always
//!   commands the pump off.
//! - **Humidity**: the soil gets wetter while the pump waters it and dries
//!   otherwise. A two-threshold hysteresis commands the pump off at
//!   [`HUMIDITY_UPPER`] and on again at [`HUMIDITY_LOWER`].
//!
//! The engine only *requests* pump changes through
//! [`EngineEvent::PumpCommand`]; the pump state changes through
//! [`WateringEngine::set_pump`] alone.

use serde::Serialize;

use crate::error::ValidationError;
use crate::event::{Alert, AlertKind, Channel, EngineEvent};
use crate::reservoir::{InitialReading, ReservoirSpec};

/// Humidity gained per tick while the pump waters the soil.
pub const HUMIDITY_STEP_UP: u32 = 30;
/// Humidity lost per tick while the soil is not watered.
pub const HUMIDITY_STEP_DOWN: u32 = 20;
/// At or above this humidity the pump is commanded off.
pub const HUMIDITY_UPPER: u32 = 700;
/// At or below this humidity (with water available) the pump is commanded on.
pub const HUMIDITY_LOWER: u32 = 300;

/// Position of the water level relative to the reservoir bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterState {
    Empty,
    Normal,
    Full,
}

/// Position of the soil humidity relative to the hysteresis thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HumidityState {
    Dry,
    Mid,
    Saturated,
}

/// Read-only copy of every engine field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub spec: ReservoirSpec,
    pub water_level: u32,
    pub humidity_level: u32,
    pub pump_on: bool,
    pub tank_alert_active: bool,
}

impl Snapshot {
    #[must_use]
    pub fn water_state(&self) -> WaterState {
        if self.water_level <= self.spec.min_volume {
            WaterState::Empty
        } else if self.water_level >= self.spec.max_volume {
            WaterState::Full
        } else {
            WaterState::Normal
        }
    }

    #[must_use]
    pub fn humidity_state(&self) -> HumidityState {
        if self.humidity_level <= HUMIDITY_LOWER {
            HumidityState::Dry
        } else if self.humidity_level >= HUMIDITY_UPPER {
            HumidityState::Saturated
        } else {
            HumidityState::Mid
        }
    }

    /// Humidity as a whole percentage (sensor units are tenths of a percent).
    #[must_use]
    pub fn humidity_percent(&self) -> u32 {
        self.humidity_level / 10
    }
}

/// State-transition engine for one reservoir.
#[derive(Debug, Clone)]
pub struct WateringEngine {
    spec: ReservoirSpec,
    water_level: u32,
    humidity_level: u32,
    pump_on: bool,
    tank_alert_active: bool,
}

impl WateringEngine {
    /// Create an engine from validated reservoir parameters and the
    /// reading observed at startup.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the bounds are empty or the initial
    /// water level lies outside them.
    pub fn new(spec: ReservoirSpec, reading: InitialReading) -> Result<Self, ValidationError> {
        spec.validate()?;
        if !spec.contains(reading.water_level) {
            return Err(ValidationError::LevelOutOfRange {
                level: reading.water_level,
                min: spec.min_volume,
                max: spec.max_volume,
            });
        }
        Ok(Self {
            spec,
            water_level: reading.water_level,
            humidity_level: reading.humidity_level,
            pump_on: reading.pump_on,
            tank_alert_active: false,
        })
    }

    /// Advance the water axis by one tick.
    pub fn tick_water(&mut self) -> Vec<EngineEvent> {
        let drain = if self.pump_on { self.spec.out_rate } else { 0 };
        // Add before subtracting so the saturating floor at zero only kicks
        // in when the true result is already at or below any valid minimum.
        let level = self
            .water_level
            .saturating_add(self.spec.in_rate)
            .saturating_sub(drain);

        let mut events = Vec::with_capacity(3);
        if level >= self.spec.max_volume {
            self.water_level = self.spec.max_volume;
            self.raise_alert(AlertKind::TankFull, &mut events);
        } else if level <= self.spec.min_volume {
            self.water_level = self.spec.min_volume;
            events.push(EngineEvent::PumpCommand { on: false });
            self.raise_alert(AlertKind::TankEmpty, &mut events);
        } else {
            self.water_level = level;
            self.tank_alert_active = false;
        }

        events.push(EngineEvent::LevelReport {
            channel: Channel::Water,
            value: self.water_level,
        });
        events
    }

    /// Advance the humidity axis by one tick.
    pub fn tick_humidity(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::with_capacity(2);
        if self.pump_on && self.has_water() {
            self.humidity_level = self.humidity_level.saturating_add(HUMIDITY_STEP_UP);
            if self.humidity_level >= HUMIDITY_UPPER {
                events.push(EngineEvent::PumpCommand { on: false });
            }
        } else {
            self.humidity_level = self.humidity_level.saturating_sub(HUMIDITY_STEP_DOWN);
            if self.humidity_level <= HUMIDITY_LOWER && self.has_water() {
                events.push(EngineEvent::PumpCommand { on: true });
            }
        }

        events.push(EngineEvent::LevelReport {
            channel: Channel::Humidity,
            value: self.humidity_level,
        });
        events
    }

    /// Switch the pump. Returns `true` when the state actually changed.
    pub fn set_pump(&mut self, on: bool) -> bool {
        let changed = self.pump_on != on;
        self.pump_on = on;
        changed
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            spec: self.spec,
            water_level: self.water_level,
            humidity_level: self.humidity_level,
            pump_on: self.pump_on,
            tank_alert_active: self.tank_alert_active,
        }
    }

    fn has_water(&self) -> bool {
        self.water_level > 0
    }

    fn raise_alert(&mut self, kind: AlertKind, events: &mut Vec<EngineEvent>) {
        if self.tank_alert_active {
            return;
        }
        self.tank_alert_active = true;
        events.push(EngineEvent::Alert(Alert {
            kind,
            water_level: self.water_level,
            max_volume: self.spec.max_volume,
        }));
    }
}
