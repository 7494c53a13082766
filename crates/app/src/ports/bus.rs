//! Message bus port — outbound publication and the shape of inbound messages.

use std::future::Future;

use autowater_domain::error::AutowaterError;
use autowater_domain::topic::Topic;

/// Publishes payloads on the watering system's bus topics.
pub trait BusPublisher {
    /// Publish `payload` on `topic`.
    fn publish(
        &self,
        topic: Topic,
        payload: String,
    ) -> impl Future<Output = Result<(), AutowaterError>> + Send;
}

impl<T: BusPublisher + Send + Sync> BusPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        topic: Topic,
        payload: String,
    ) -> impl Future<Output = Result<(), AutowaterError>> + Send {
        (**self).publish(topic, payload)
    }
}

/// A message received on one of the watering system's topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: Topic,
    pub payload: Vec<u8>,
}
