//! Reservoir parameters and the sensor reading the engine starts from.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Fixed physical parameters of a water reservoir.
///
/// Volumes are in liters, rates in liters per tick. The values never change
/// for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservoirSpec {
    /// Lowest level the tank can physically reach.
    pub min_volume: u32,
    /// Level at which the overflow valve holds the tank.
    pub max_volume: u32,
    /// Drain rate while the pump is running.
    pub out_rate: u32,
    /// Passive refill rate, applied every tick.
    pub in_rate: u32,
}

impl Default for ReservoirSpec {
    fn default() -> Self {
        Self {
            min_volume: 0,
            max_volume: 1000,
            out_rate: 15,
            in_rate: 5,
        }
    }
}

impl ReservoirSpec {
    /// Check that the bounds describe a non-empty interval.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyRange`] when `min_volume >= max_volume`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_volume >= self.max_volume {
            return Err(ValidationError::EmptyRange {
                min: self.min_volume,
                max: self.max_volume,
            });
        }
        Ok(())
    }

    /// Whether `level` lies within `[min_volume, max_volume]`.
    #[must_use]
    pub fn contains(&self, level: u32) -> bool {
        (self.min_volume..=self.max_volume).contains(&level)
    }
}

/// Sensor values observed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialReading {
    /// Water in the tank, liters.
    pub water_level: u32,
    /// Soil humidity, sensor units (tenths of a percent).
    pub humidity_level: u32,
    /// Whether the pump is running.
    pub pump_on: bool,
}

impl Default for InitialReading {
    fn default() -> Self {
        Self {
            water_level: 600,
            humidity_level: 400,
            pump_on: false,
        }
    }
}
