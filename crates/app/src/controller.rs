//! Watering controller — the single owner of the [`WateringEngine`].
//!
//! Every engine call runs to completion under the engine lock, so status
//! reads never observe a half-applied tick. IO (publication, mail queueing,
//! pump settling) happens only after the lock is released.
//!
//! Pump settling waits in the calling task: a tick that emits a pump command
//! returns only once the command is applied, so the tick driver is the one
//! that waits. Only the async pacer lock is held meanwhile, never the engine
//! lock, so snapshots and status reads stay responsive.
//!
//! Pump commands emitted by the engine are applied locally *and* published:
//! an emptied tank stops the pump even while the bus is unreachable.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use autowater_domain::engine::{Snapshot, WateringEngine};
use autowater_domain::event::EngineEvent;
use autowater_domain::status::StatusReport;
use autowater_domain::topic::{Topic, encode_bool};

use crate::gateway::NotificationGateway;
use crate::pacer::Pacer;
use crate::ports::BusPublisher;

pub struct WateringController<B> {
    engine: Mutex<WateringEngine>,
    gateway: NotificationGateway<B>,
    pump_pacer: tokio::sync::Mutex<Pacer>,
}

impl<B: BusPublisher> WateringController<B> {
    /// Create a controller. Consecutive pump-state changes are spaced at
    /// least `pump_settle` apart.
    pub fn new(
        engine: WateringEngine,
        gateway: NotificationGateway<B>,
        pump_settle: Duration,
    ) -> Self {
        Self {
            engine: Mutex::new(engine),
            gateway,
            pump_pacer: tokio::sync::Mutex::new(Pacer::new(pump_settle)),
        }
    }

    /// Advance the water level by one tick and deliver the resulting events.
    pub async fn tick_water(&self) -> Vec<EngineEvent> {
        let events = self.lock_engine().tick_water();
        self.dispatch(&events).await;
        events
    }

    /// Advance the soil humidity by one tick and deliver the resulting events.
    pub async fn tick_humidity(&self) -> Vec<EngineEvent> {
        let events = self.lock_engine().tick_humidity();
        self.dispatch(&events).await;
        events
    }

    /// Switch the pump, waiting out the settling interval if the state
    /// changes. Returns whether it changed.
    pub async fn set_pump(&self, on: bool) -> bool {
        let mut pacer = self.pump_pacer.lock().await;
        if self.snapshot().pump_on == on {
            return false;
        }
        pacer.ready().await;
        let changed = self.lock_engine().set_pump(on);
        if changed {
            tracing::info!(pump_on = on, "pump switched");
        }
        changed
    }

    /// Publish every current level, as done whenever the bus (re)connects.
    pub async fn publish_state(&self) {
        let snapshot = self.snapshot();
        self.gateway
            .publish(Topic::Water, snapshot.water_level.to_string())
            .await;
        self.gateway
            .publish(Topic::Humidity, snapshot.humidity_level.to_string())
            .await;
        self.gateway
            .publish(Topic::Pump, encode_bool(snapshot.pump_on).to_string())
            .await;
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.lock_engine().snapshot()
    }

    /// The console status block for the current state.
    #[must_use]
    pub fn status(&self) -> String {
        StatusReport(&self.snapshot()).to_string()
    }

    #[must_use]
    pub fn gateway(&self) -> &NotificationGateway<B> {
        &self.gateway
    }

    async fn dispatch(&self, events: &[EngineEvent]) {
        tracing::trace!(?events, "engine events");
        self.gateway.deliver(events).await;
        for on in events.iter().filter_map(EngineEvent::pump_command) {
            self.set_pump(on).await;
        }
    }

    fn lock_engine(&self) -> MutexGuard<'_, WateringEngine> {
        self.engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
