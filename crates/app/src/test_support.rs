//! In-memory port implementations shared by the unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use autowater_domain::error::AutowaterError;
use autowater_domain::notification::MailMessage;
use autowater_domain::topic::Topic;

use crate::ports::{BusPublisher, Mailer};

/// Records every publication; can be switched offline.
#[derive(Default)]
pub struct RecordingBus {
    published: Mutex<Vec<(Topic, String)>>,
    offline: AtomicBool,
}

impl RecordingBus {
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn published(&self) -> Vec<(Topic, String)> {
        self.published.lock().unwrap().clone()
    }

    pub fn on(&self, topic: Topic) -> Vec<String> {
        self.published()
            .into_iter()
            .filter(|(t, _)| *t == topic)
            .map(|(_, payload)| payload)
            .collect()
    }
}

impl BusPublisher for RecordingBus {
    async fn publish(&self, topic: Topic, payload: String) -> Result<(), AutowaterError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AutowaterError::Transport(Box::new(std::io::Error::other(
                "offline",
            ))));
        }
        self.published.lock().unwrap().push((topic, payload));
        Ok(())
    }
}

/// Fails the first `failures` sends, then records deliveries.
#[derive(Default)]
pub struct FlakyMailer {
    failures: AtomicU32,
    pub attempts: AtomicU32,
    sent: Mutex<Vec<MailMessage>>,
}

impl FlakyMailer {
    pub fn failing(failures: u32) -> Self {
        Self {
            failures: AtomicU32::new(failures),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for FlakyMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), AutowaterError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(AutowaterError::Transport(Box::new(std::io::Error::other(
                "smtp unavailable",
            ))));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
