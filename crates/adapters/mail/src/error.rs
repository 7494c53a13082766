//! Mail adapter error types.

use autowater_domain::error::AutowaterError;

/// Errors specific to the mail adapter.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// A sender or recipient address could not be parsed.
    #[error("invalid mail address")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("failed to build mail message")]
    Build(#[from] lettre::error::Error),

    /// The SMTP exchange failed.
    #[error("SMTP transport error")]
    Transport(#[from] lettre::transport::smtp::Error),
}

impl MailError {
    /// Convert into an [`AutowaterError::Transport`] for propagation across
    /// port boundaries.
    #[must_use]
    pub fn into_domain(self) -> AutowaterError {
        AutowaterError::Transport(Box::new(self))
    }
}

impl From<MailError> for AutowaterError {
    fn from(err: MailError) -> Self {
        err.into_domain()
    }
}
