//! SMTP mail configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for outgoing notification mail.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Send real mail. When `false` notifications are only logged.
    pub enabled: bool,
    /// SMTP relay hostname.
    pub smtp_host: String,
    /// SMTP submission port (STARTTLS).
    pub smtp_port: u16,
    /// SMTP login.
    pub username: String,
    /// SMTP password. Prefer `AUTOWATER_SMTP_PASSWORD` over the file.
    pub password: String,
    /// Sender address. Falls back to `username` when empty.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Upper bound for a single SMTP exchange, in seconds.
    pub timeout_secs: u64,
    /// Delivery attempts per mail, including the first one.
    pub max_attempts: u32,
    /// Base delay between attempts, in milliseconds.
    pub retry_backoff_ms: u64,
}

impl MailConfig {
    /// Address used in the `From` header.
    #[must_use]
    pub fn sender(&self) -> &str {
        if self.from.is_empty() {
            &self.username
        } else {
            &self.from
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from: String::new(),
            to: String::new(),
            timeout_secs: 10,
            max_attempts: 3,
            retry_backoff_ms: 2000,
        }
    }
}
