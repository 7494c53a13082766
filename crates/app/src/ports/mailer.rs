//! Mail port — delivery of notification mails.

use std::future::Future;

use autowater_domain::error::AutowaterError;
use autowater_domain::notification::MailMessage;

/// Delivers a single mail. Implementations should bound their own IO time;
/// retries are handled by the caller.
pub trait Mailer {
    fn send(&self, message: &MailMessage) -> impl Future<Output = Result<(), AutowaterError>> + Send;
}

impl<T: Mailer + Send + Sync> Mailer for std::sync::Arc<T> {
    fn send(&self, message: &MailMessage) -> impl Future<Output = Result<(), AutowaterError>> + Send {
        (**self).send(message)
    }
}
