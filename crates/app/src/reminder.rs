//! Daily reminder mails carrying the current water level.

use std::sync::Arc;

use tokio::sync::watch;

use autowater_domain::notification::MailMessage;
use autowater_domain::schedule::DailySchedule;
use autowater_domain::time::local_now;

use crate::controller::WateringController;
use crate::ports::BusPublisher;

/// Queue a reminder at every scheduled local time until `shutdown` changes.
pub async fn run_reminders<B: BusPublisher>(
    schedule: DailySchedule,
    controller: Arc<WateringController<B>>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let now = local_now();
        let next = schedule.next_after(now);
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::debug!(%next, "next reminder scheduled");

        tokio::select! {
            _ = shutdown.changed() => break,
            () = tokio::time::sleep(wait) => {
                let snapshot = controller.snapshot();
                controller.gateway().enqueue(MailMessage::reminder(&snapshot));
            }
        }
    }
}
