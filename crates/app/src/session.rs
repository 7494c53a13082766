//! Full-state publication at the start of every bus session.
//!
//! The bus adapter bumps a session counter once its subscriptions are
//! queued, so the state published here always follows them on the wire.

use std::sync::Arc;

use tokio::sync::watch;

use crate::controller::WateringController;
use crate::ports::BusPublisher;

/// Publish the full state each time `sessions` changes, until `shutdown`
/// changes or the session sender is dropped.
pub async fn run_state_publisher<B: BusPublisher>(
    controller: Arc<WateringController<B>>,
    mut sessions: watch::Receiver<u64>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            biased;

            _ = shutdown.changed() => break,

            changed = sessions.changed() => {
                if changed.is_err() {
                    break;
                }
                let session = *sessions.borrow_and_update();
                tracing::debug!(session, "bus session started, publishing state");
                controller.publish_state().await;
            }
        }
    }
}
