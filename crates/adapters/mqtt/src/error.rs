//! MQTT adapter error types.

use autowater_domain::error::AutowaterError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The bus is disconnected (never started, or stopped from the console).
    #[error("MQTT client not connected")]
    NotConnected,

    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[from] rumqttc::ClientError),
}

impl MqttError {
    /// Convert into an [`AutowaterError::Transport`] for propagation across
    /// port boundaries.
    #[must_use]
    pub fn into_domain(self) -> AutowaterError {
        AutowaterError::Transport(Box::new(self))
    }
}

impl From<MqttError> for AutowaterError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
