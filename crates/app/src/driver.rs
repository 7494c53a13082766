//! Tick driver — decides *when* the engine advances.
//!
//! | Mode | Water/humidity ticks | Inbound water/humidity messages |
//! |------|----------------------|---------------------------------|
//! | [`TickMode::Timer`] | every `interval`, water then humidity | ignored (echoes of our own reports) |
//! | [`TickMode::Bus`] | one per inbound message on that topic | paced to one per `interval` per channel |
//!
//! Inbound pump messages switch the pump in both modes. Everything runs on
//! one task. In bus mode an inbound level message only books a tick; booked
//! ticks wait for their pacer slot as a branch of the run loop, so shutdown
//! and pump commands are never stuck behind the pacing interval.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::{mpsc, watch};
use tokio::time::{MissedTickBehavior, sleep_until};

use autowater_domain::topic::{Topic, decode_pump};

use crate::controller::WateringController;
use crate::pacer::Pacer;
use crate::ports::{BusPublisher, InboundMessage};

/// Source of water and humidity ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickMode {
    /// A local periodic timer.
    #[default]
    Timer,
    /// Messages arriving on the water and humidity topics.
    Bus,
}

pub struct Driver<B> {
    controller: Arc<WateringController<B>>,
    mode: TickMode,
    interval: Duration,
    water_pacer: Pacer,
    humidity_pacer: Pacer,
    /// Bus-mode ticks booked but not yet applied.
    pending_water: u32,
    pending_humidity: u32,
}

impl<B: BusPublisher> Driver<B> {
    pub fn new(controller: Arc<WateringController<B>>, mode: TickMode, interval: Duration) -> Self {
        Self {
            controller,
            mode,
            interval,
            water_pacer: Pacer::new(interval),
            humidity_pacer: Pacer::new(interval),
            pending_water: 0,
            pending_humidity: 0,
        }
    }

    /// Run until `shutdown` changes (or its sender is dropped). In bus mode
    /// the driver also stops once the inbound channel closes and every booked
    /// tick has been applied.
    pub async fn run(
        mut self,
        mut inbound: mpsc::Receiver<InboundMessage>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut inbound_open = true;

        tracing::info!(mode = ?self.mode, interval = ?self.interval, "tick driver started");
        loop {
            if self.mode == TickMode::Bus && !inbound_open && !self.has_pending() {
                break;
            }
            tokio::select! {
                biased;

                _ = shutdown.changed() => break,

                message = inbound.recv(), if inbound_open => match message {
                    Some(message) => self.handle_inbound(message).await,
                    None => {
                        inbound_open = false;
                        tracing::info!("inbound channel closed");
                    }
                },

                _ = ticker.tick(), if self.mode == TickMode::Timer => {
                    self.controller.tick_water().await;
                    self.controller.tick_humidity().await;
                }

                () = sleep_until(self.water_pacer.next_at()), if self.pending_water > 0 => {
                    self.pending_water -= 1;
                    self.water_pacer.mark();
                    self.controller.tick_water().await;
                }

                () = sleep_until(self.humidity_pacer.next_at()), if self.pending_humidity > 0 => {
                    self.pending_humidity -= 1;
                    self.humidity_pacer.mark();
                    self.controller.tick_humidity().await;
                }
            }
        }
        tracing::info!("tick driver stopped");
    }

    async fn handle_inbound(&mut self, message: InboundMessage) {
        match (message.topic, self.mode) {
            (Topic::Pump, _) => {
                let on = decode_pump(&message.payload);
                tracing::debug!(pump_on = on, "pump command received");
                self.controller.set_pump(on).await;
            }
            (Topic::Water, TickMode::Bus) => {
                self.pending_water = self.pending_water.saturating_add(1);
            }
            (Topic::Humidity, TickMode::Bus) => {
                self.pending_humidity = self.pending_humidity.saturating_add(1);
            }
            (Topic::Water | Topic::Humidity, TickMode::Timer) => {
                tracing::trace!(topic = ?message.topic, "ignoring level message in timer mode");
            }
        }
    }

    fn has_pending(&self) -> bool {
        self.pending_water > 0 || self.pending_humidity > 0
    }
}
