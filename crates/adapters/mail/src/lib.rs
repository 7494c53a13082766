//! # autowater-adapter-mail
//!
//! Mail adapter — delivers alert and reminder mails.
//!
//! ## Responsibilities
//! - [`SmtpMailer`]: plain-text mail over SMTP with STARTTLS, login
//!   credentials and a bounded exchange timeout
//! - [`LogMailer`]: logs each mail instead of sending it, used when mail is
//!   disabled in the configuration
//!
//! Retries are not handled here; the application's mail worker wraps every
//! [`Mailer`] in its own retry policy.
//!
//! ## Dependency rule
//! Same as other adapters: depends on `autowater-app` and `autowater-domain`.

mod config;
mod error;

pub use config::MailConfig;
pub use error::MailError;

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use autowater_app::ports::Mailer;
use autowater_domain::error::AutowaterError;
use autowater_domain::notification::MailMessage;

/// Sends mail through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer from configuration. No connection is opened until the
    /// first mail is sent.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Address`] if the sender or recipient is not a
    /// valid address, or [`MailError::Transport`] if the relay cannot be set up.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let from = config.sender().parse()?;
        let to = config.to.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout()))
            .build();

        tracing::info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            to = %config.to,
            "SMTP mailer configured"
        );
        Ok(Self { transport, from, to })
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), AutowaterError> {
        let email = build_message(self.from.clone(), self.to.clone(), message)?;
        let response = self.transport.send(email).await.map_err(MailError::from)?;
        tracing::debug!(code = %response.code(), subject = %message.subject, "SMTP accepted mail");
        Ok(())
    }
}

fn build_message(from: Mailbox, to: Mailbox, message: &MailMessage) -> Result<Message, MailError> {
    let email = Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())?;
    Ok(email)
}

/// Logs mails instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), AutowaterError> {
        tracing::info!(subject = %message.subject, body = %message.body, "mail disabled, not sending");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_tank() -> MailMessage {
        MailMessage {
            subject: "Warning! The tank is full.".to_string(),
            body: "The water level in the tank is 1000/1000 liters.".to_string(),
        }
    }

    fn configured() -> MailConfig {
        MailConfig {
            enabled: true,
            username: "garden@example.com".to_string(),
            password: "secret".to_string(),
            to: "owner@example.com".to_string(),
            ..MailConfig::default()
        }
    }

    #[test]
    fn should_build_plain_text_message() {
        let email = build_message(
            "garden@example.com".parse().unwrap(),
            "owner@example.com".parse().unwrap(),
            &full_tank(),
        )
        .unwrap();

        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("From: garden@example.com"));
        assert!(raw.contains("To: owner@example.com"));
        assert!(raw.contains("Subject: Warning! The tank is full."));
        assert!(raw.contains("Content-Type: text/plain"));
        assert!(raw.contains("The water level in the tank is 1000/1000 liters."));
    }

    #[test]
    fn should_create_mailer_without_connecting() {
        assert!(SmtpMailer::new(&configured()).is_ok());
    }

    #[test]
    fn should_reject_missing_recipient() {
        let config = MailConfig {
            to: String::new(),
            ..configured()
        };
        assert!(matches!(
            SmtpMailer::new(&config),
            Err(MailError::Address(_))
        ));
    }

    #[tokio::test]
    async fn should_accept_every_mail_when_logging() {
        assert!(LogMailer.send(&full_tank()).await.is_ok());
    }
}
