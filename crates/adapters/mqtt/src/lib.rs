//! # autowater-adapter-mqtt
//!
//! MQTT adapter — carries the watering system's topics over an MQTT broker.
//!
//! ## Responsibilities
//! - Connect to the broker and (re)subscribe to the water, humidity and pump
//!   topics after every successful `CONNACK`, then signal a new session
//!   through [`MqttBus::sessions`]
//! - Forward inbound publications as [`InboundMessage`]s
//! - Implement [`BusPublisher`] without ever blocking the caller: publications
//!   are handed to the client queue with `try_publish`
//! - Stop and restart on request (console `Stop` / `Start`)
//!
//! ## Dependency rule
//! Same as other adapters: depends on `autowater-app` and `autowater-domain`.

mod config;
mod error;

pub use config::MqttConfig;
pub use error::MqttError;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rumqttc::{AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use autowater_app::ports::{BusPublisher, InboundMessage};
use autowater_domain::error::AutowaterError;
use autowater_domain::topic::Topic;

/// How long [`MqttBus::disconnect`] waits for the `DISCONNECT` packet to go out.
const DISCONNECT_GRACE: Duration = Duration::from_secs(1);

struct Connection {
    client: AsyncClient,
    task: JoinHandle<()>,
}

/// MQTT-backed message bus.
pub struct MqttBus {
    config: MqttConfig,
    inbound_tx: mpsc::Sender<InboundMessage>,
    sessions: Arc<watch::Sender<u64>>,
    connection: Mutex<Option<Connection>>,
}

impl MqttBus {
    /// Create a disconnected bus. Inbound messages will be sent to
    /// `inbound_tx` once [`connect`](Self::connect) is called.
    #[must_use]
    pub fn new(config: MqttConfig, inbound_tx: mpsc::Sender<InboundMessage>) -> Self {
        let (sessions, _) = watch::channel(0);
        Self {
            config,
            inbound_tx,
            sessions: Arc::new(sessions),
            connection: Mutex::new(None),
        }
    }

    /// Counter bumped after every successful `CONNACK`, once the topic
    /// subscriptions are queued. Anything published after observing a
    /// change reaches the broker behind those subscriptions.
    #[must_use]
    pub fn sessions(&self) -> watch::Receiver<u64> {
        self.sessions.subscribe()
    }

    /// Start the client and its event loop, replacing any running one.
    ///
    /// The broker connection itself is established by the event loop; a
    /// broker that is down is logged and retried, never reported here.
    pub async fn connect(&self) {
        self.disconnect().await;

        let mut options = MqttOptions::new(
            &self.config.client_id,
            &self.config.broker_host,
            self.config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(self.config.keep_alive_secs)));
        let (client, eventloop) = AsyncClient::new(options, self.config.channel_capacity);

        let task = tokio::spawn(poll_loop(
            eventloop,
            client.clone(),
            self.config.base_topic.clone(),
            self.inbound_tx.clone(),
            Arc::clone(&self.sessions),
            Duration::from_millis(self.config.reconnect_delay_ms),
        ));
        *self.lock_connection() = Some(Connection { client, task });

        tracing::info!(
            host = %self.config.broker_host,
            port = self.config.broker_port,
            client_id = %self.config.client_id,
            "MQTT bus started"
        );
    }

    /// Send `DISCONNECT` and stop the event loop. No-op when not connected.
    pub async fn disconnect(&self) {
        let Some(Connection { client, mut task }) = self.lock_connection().take() else {
            return;
        };
        if let Err(err) = client.try_disconnect() {
            tracing::debug!(error = %err, "could not queue MQTT disconnect");
        }
        if tokio::time::timeout(DISCONNECT_GRACE, &mut task).await.is_err() {
            task.abort();
        }
        tracing::info!("MQTT bus stopped");
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.lock_connection().is_some()
    }

    fn client(&self) -> Result<AsyncClient, MqttError> {
        self.lock_connection()
            .as_ref()
            .map(|conn| conn.client.clone())
            .ok_or(MqttError::NotConnected)
    }

    fn lock_connection(&self) -> MutexGuard<'_, Option<Connection>> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl BusPublisher for MqttBus {
    async fn publish(&self, topic: Topic, payload: String) -> Result<(), AutowaterError> {
        let client = self.client()?;
        client
            .try_publish(topic.path(&self.config.base_topic), QoS::AtMostOnce, false, payload)
            .map_err(MqttError::from)?;
        Ok(())
    }
}

/// Map a raw publication onto one of our topics. Foreign topics yield `None`.
fn to_inbound(base_topic: &str, topic: &str, payload: &[u8]) -> Option<InboundMessage> {
    Topic::parse(base_topic, topic).map(|topic| InboundMessage {
        topic,
        payload: payload.to_vec(),
    })
}

async fn poll_loop(
    mut eventloop: EventLoop,
    client: AsyncClient,
    base_topic: String,
    inbound_tx: mpsc::Sender<InboundMessage>,
    sessions: Arc<watch::Sender<u64>>,
    reconnect_delay: Duration,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                if ack.code == ConnectReturnCode::Success {
                    tracing::info!("connected to MQTT broker");
                    subscribe_all(&client, &base_topic);
                    sessions.send_modify(|session| *session += 1);
                } else {
                    tracing::warn!(code = ?ack.code, "MQTT broker refused connection");
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let topic = String::from_utf8_lossy(publish.topic.as_ref());
                let Some(message) = to_inbound(&base_topic, &topic, &publish.payload) else {
                    tracing::trace!(%topic, "ignoring foreign topic");
                    continue;
                };
                if inbound_tx.send(message).await.is_err() {
                    tracing::debug!("inbound receiver dropped, stopping MQTT loop");
                    break;
                }
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                tracing::debug!("MQTT disconnect sent");
                break;
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "MQTT connection error, retrying");
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}

fn subscribe_all(client: &AsyncClient, base_topic: &str) {
    for topic in Topic::ALL {
        let path = topic.path(base_topic);
        if let Err(err) = client.try_subscribe(&path, QoS::AtMostOnce) {
            tracing::warn!(topic = %path, error = %err, "MQTT subscribe failed");
        }
    }
}
