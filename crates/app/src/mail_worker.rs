//! Background mail delivery.

use tokio::sync::mpsc;

use autowater_domain::notification::MailMessage;

use crate::ports::Mailer;
use crate::retry::RetryPolicy;

/// Drains the mail queue, sending each message under a [`RetryPolicy`].
pub struct MailWorker<M> {
    mailer: M,
    policy: RetryPolicy,
}

impl<M: Mailer> MailWorker<M> {
    pub fn new(mailer: M, policy: RetryPolicy) -> Self {
        Self { mailer, policy }
    }

    /// Run until every sender of the queue is dropped.
    pub async fn run(self, mut rx: mpsc::Receiver<MailMessage>) {
        while let Some(message) = rx.recv().await {
            self.deliver(&message).await;
        }
        tracing::debug!("mail queue closed, worker stopping");
    }

    /// Send one message. Returns whether it was delivered; a failure after
    /// the last attempt is logged and otherwise ignored.
    pub async fn deliver(&self, message: &MailMessage) -> bool {
        match self.policy.run(|_| self.mailer.send(message)).await {
            Ok(()) => {
                tracing::info!(subject = %message.subject, "mail sent");
                true
            }
            Err(err) => {
                tracing::error!(
                    subject = %message.subject,
                    attempts = self.policy.max_attempts(),
                    error = ?err,
                    "giving up on mail"
                );
                false
            }
        }
    }
}
