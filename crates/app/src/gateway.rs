//! Notification gateway — turns engine events into bus publications and
//! queued mails.
//!
//! Delivery never fails from the caller's point of view: publish errors are
//! logged (the controller keeps running offline) and mails go through a
//! bounded queue drained by the [`MailWorker`](crate::mail_worker::MailWorker),
//! so SMTP latency never holds up a tick.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use autowater_domain::event::EngineEvent;
use autowater_domain::notification::MailMessage;
use autowater_domain::topic::Topic;

use crate::ports::BusPublisher;

pub struct NotificationGateway<B> {
    bus: B,
    mail_tx: mpsc::Sender<MailMessage>,
}

impl<B: BusPublisher> NotificationGateway<B> {
    pub fn new(bus: B, mail_tx: mpsc::Sender<MailMessage>) -> Self {
        Self { bus, mail_tx }
    }

    /// Deliver events in the order the engine emitted them.
    pub async fn deliver(&self, events: &[EngineEvent]) {
        for event in events {
            if let Some(alert) = event.alert() {
                tracing::warn!(
                    kind = ?alert.kind,
                    water_level = alert.water_level,
                    max_volume = alert.max_volume,
                    "tank alert"
                );
                self.enqueue(MailMessage::alert(alert));
            } else if let Some((topic, payload)) = Topic::encode_event(event) {
                self.publish(topic, payload).await;
            }
        }
    }

    /// Publish one payload, logging instead of failing.
    pub async fn publish(&self, topic: Topic, payload: String) {
        if let Err(err) = self.bus.publish(topic, payload).await {
            tracing::debug!(?topic, error = ?err, "bus publish failed");
        }
    }

    /// Queue a mail without waiting. Returns `false` if it had to be dropped.
    pub fn enqueue(&self, message: MailMessage) -> bool {
        match self.mail_tx.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(message)) => {
                tracing::warn!(subject = %message.subject, "mail queue full, dropping mail");
                false
            }
            Err(TrySendError::Closed(message)) => {
                tracing::warn!(subject = %message.subject, "mail worker stopped, dropping mail");
                false
            }
        }
    }
}
