//! Textual status line shown by the interactive console.

use std::fmt;

use crate::engine::Snapshot;

/// Renders a [`Snapshot`] as the multi-line status block.
pub struct StatusReport<'a>(pub &'a Snapshot);

impl fmt::Display for StatusReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snap = self.0;
        writeln!(f, "######### System Info #########")?;
        writeln!(f, "Pump: {}", if snap.pump_on { "on" } else { "off" })?;
        writeln!(f, "Water level: {} l", snap.water_level)?;
        writeln!(f, "Humidity: {} %", snap.humidity_percent())?;
        write!(f, "###############################")
    }
}
