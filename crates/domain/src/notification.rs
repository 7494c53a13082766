//! Mail notification templates.

use crate::engine::Snapshot;
use crate::event::{Alert, AlertKind};

pub const SUBJECT_TANK_FULL: &str = "Warning! The tank is full.";
pub const SUBJECT_TANK_EMPTY: &str = "Warning! The tank is empty.";
pub const SUBJECT_REMINDER: &str = "Automatic watering system notification.";

/// A plain-text mail, ready for a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// Mail sent when the tank hits one of its bounds.
    #[must_use]
    pub fn alert(alert: &Alert) -> Self {
        let subject = match alert.kind {
            AlertKind::TankFull => SUBJECT_TANK_FULL,
            AlertKind::TankEmpty => SUBJECT_TANK_EMPTY,
        };
        Self {
            subject: subject.to_string(),
            body: level_body(alert.water_level, alert.max_volume),
        }
    }

    /// Periodic status mail.
    #[must_use]
    pub fn reminder(snapshot: &Snapshot) -> Self {
        Self {
            subject: SUBJECT_REMINDER.to_string(),
            body: level_body(snapshot.water_level, snapshot.spec.max_volume),
        }
    }
}

fn level_body(water_level: u32, max_volume: u32) -> String {
    format!("The water level in the tank is {water_level}/{max_volume} liters.")
}
