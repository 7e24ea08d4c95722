// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT broker session delivering control values.
//!
//! The session is established with a clean session and a bounded connection
//! timeout. Afterwards the event loop keeps polling through disconnects,
//! which makes `rumqttc` reconnect; every bound topic is subscribed again
//! once the broker acknowledges the new session.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use elgato_mqtt::protocol::MqttBroker;
//!
//! # async fn example() -> elgato_mqtt::Result<()> {
//! let broker = MqttBroker::builder()
//!     .host("192.168.1.200")
//!     .port(1883)
//!     .build()
//!     .await?;
//!
//! broker
//!     .bind("office/light/brightness", Arc::new(|value: f64| println!("{value}")))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use tokio::sync::oneshot;

use crate::error::ProtocolError;
use crate::protocol::{Handler, TopicRouter};

/// Quality of service for control topics.
const SUBSCRIBE_QOS: QoS = QoS::ExactlyOnce;

/// Configuration for an MQTT broker connection.
#[derive(Debug, Clone)]
pub struct MqttBrokerConfig {
    host: String,
    port: u16,
    client_id: Option<String>,
    keep_alive: Duration,
    connection_timeout: Duration,
    reconnect_delay: Duration,
}

impl Default for MqttBrokerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 1883,
            client_id: None,
            keep_alive: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            reconnect_delay: Duration::from_secs(1),
        }
    }
}

/// A live session with the MQTT broker.
///
/// `MqttBroker` is cheaply cloneable (via `Arc`). Messages on bound topics
/// are delivered one at a time on the session's event loop task.
#[derive(Clone)]
pub struct MqttBroker {
    inner: Arc<MqttBrokerInner>,
}

struct MqttBrokerInner {
    client: AsyncClient,
    router: TopicRouter,
    config: MqttBrokerConfig,
    client_id: String,
    connected: AtomicBool,
    shutting_down: AtomicBool,
}

impl MqttBroker {
    /// Creates a new builder for configuring an MQTT broker connection.
    #[must_use]
    pub fn builder() -> MqttBrokerBuilder {
        MqttBrokerBuilder::default()
    }

    /// Returns whether the broker is currently connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    /// Returns the host address of the broker.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.inner.config.host
    }

    /// Returns the port of the broker.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.inner.config.port
    }

    /// Returns the client id used for this session.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.inner.client_id
    }

    /// Returns the router holding the topic bindings.
    #[must_use]
    pub fn router(&self) -> &TopicRouter {
        &self.inner.router
    }

    /// Binds `handler` to `topic` and subscribes to it.
    ///
    /// The handler is invoked with the parsed payload of every message on
    /// `topic`. Messages whose payload is not a floating point literal are
    /// logged and dropped without invoking the handler.
    ///
    /// # Errors
    ///
    /// Returns error if the subscribe request cannot be queued.
    pub async fn bind(
        &self,
        topic: impl Into<String>,
        handler: Handler,
    ) -> Result<(), ProtocolError> {
        let topic = topic.into();
        self.inner.router.bind(topic.clone(), handler);

        self.inner
            .client
            .subscribe(&topic, SUBSCRIBE_QOS)
            .await
            .map_err(ProtocolError::Mqtt)?;

        tracing::info!(topic = %topic, "Subscribed to topic");
        Ok(())
    }

    /// Subscribes again to every bound topic.
    async fn resubscribe(&self) {
        for topic in self.inner.router.topics() {
            if let Err(e) = self.inner.client.subscribe(&topic, SUBSCRIBE_QOS).await {
                tracing::warn!(topic = %topic, error = %e, "Failed to resubscribe to topic");
            } else {
                tracing::debug!(topic = %topic, "Resubscribed to topic");
            }
        }
    }

    /// Handles one inbound publish.
    fn deliver(&self, topic: &str, payload: &[u8]) {
        let Ok(payload) = std::str::from_utf8(payload) else {
            tracing::warn!(topic = %topic, "Dropping message with non UTF-8 payload");
            return;
        };

        tracing::debug!(topic = %topic, payload = %payload, "MQTT message received");

        if let Err(e) = self.inner.router.route(topic, payload) {
            tracing::warn!(topic = %topic, error = %e, "Dropping message");
        }
    }

    /// Disconnects from the broker and stops the event loop.
    ///
    /// All bindings are removed, which drops their handlers.
    ///
    /// # Errors
    ///
    /// Returns error if the disconnect request cannot be queued.
    pub async fn disconnect(&self) -> Result<(), ProtocolError> {
        tracing::info!(
            host = %self.inner.config.host,
            port = %self.inner.config.port,
            "Disconnecting from MQTT broker"
        );

        self.inner.shutting_down.store(true, Ordering::Release);
        self.inner.router.clear();
        self.inner
            .client
            .disconnect()
            .await
            .map_err(ProtocolError::Mqtt)?;

        self.inner.connected.store(false, Ordering::Release);
        Ok(())
    }

    fn is_shutting_down(&self) -> bool {
        self.inner.shutting_down.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for MqttBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttBroker")
            .field("host", &self.inner.config.host)
            .field("port", &self.inner.config.port)
            .field("client_id", &self.inner.client_id)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Builder for creating an MQTT broker connection.
///
/// # Examples
///
/// ```no_run
/// use elgato_mqtt::protocol::MqttBroker;
/// use std::time::Duration;
///
/// # async fn example() -> elgato_mqtt::Result<()> {
/// let broker = MqttBroker::builder()
///     .host("192.168.1.200")
///     .port(1883)
///     .keep_alive(Duration::from_secs(60))
///     .connection_timeout(Duration::from_secs(5))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MqttBrokerBuilder {
    config: MqttBrokerConfig,
}

impl MqttBrokerBuilder {
    /// Sets the broker host address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the broker port (default: 1883).
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets the client id (default: `elgato_mqtt_<uuid>`).
    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.client_id = Some(client_id.into());
        self
    }

    /// Sets the keep-alive interval (default: 30 seconds).
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.config.keep_alive = duration;
        self
    }

    /// Sets the connection timeout (default: 10 seconds).
    #[must_use]
    pub fn connection_timeout(mut self, duration: Duration) -> Self {
        self.config.connection_timeout = duration;
        self
    }

    /// Sets the pause between reconnection attempts (default: 1 second).
    #[must_use]
    pub fn reconnect_delay(mut self, duration: Duration) -> Self {
        self.config.reconnect_delay = duration;
        self
    }

    /// Builds and connects to the MQTT broker.
    ///
    /// Waits until the broker acknowledges the session.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Host is not set
    /// - No session is acknowledged within the connection timeout
    pub async fn build(self) -> Result<MqttBroker, ProtocolError> {
        if self.config.host.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "MQTT broker host is required".to_string(),
            ));
        }

        let client_id = self
            .config
            .client_id
            .clone()
            .unwrap_or_else(|| format!("elgato_mqtt_{}", uuid::Uuid::new_v4()));

        let mut mqtt_options = MqttOptions::new(&client_id, &self.config.host, self.config.port);
        mqtt_options.set_keep_alive(self.config.keep_alive);
        mqtt_options.set_clean_session(true);

        let (client, event_loop) = AsyncClient::new(mqtt_options, 10);

        let inner = MqttBrokerInner {
            client,
            router: TopicRouter::new(),
            config: self.config.clone(),
            client_id,
            connected: AtomicBool::new(false),
            shutting_down: AtomicBool::new(false),
        };

        let broker = MqttBroker {
            inner: Arc::new(inner),
        };

        let (connack_tx, connack_rx) = oneshot::channel();

        let events = tokio::spawn(handle_broker_events(
            event_loop,
            broker.clone(),
            connack_tx,
        ));

        tracing::info!(
            host = %self.config.host,
            port = %self.config.port,
            client_id = %broker.client_id(),
            "Connecting to MQTT broker"
        );

        let timeout = self.config.connection_timeout;
        match tokio::time::timeout(timeout, connack_rx).await {
            Ok(Ok(())) => {
                tracing::info!(
                    host = %self.config.host,
                    port = %self.config.port,
                    "Connected to MQTT broker"
                );
                Ok(broker)
            }
            Ok(Err(_)) => Err(ProtocolError::ConnectionFailed(
                "MQTT event loop terminated unexpectedly".to_string(),
            )),
            Err(_) => {
                events.abort();
                Err(ProtocolError::ConnectionFailed(format!(
                    "MQTT connection timeout after {}s",
                    timeout.as_secs_f32()
                )))
            }
        }
    }
}

/// Handles MQTT events for the broker session.
///
/// Runs until [`MqttBroker::disconnect`] is called.
async fn handle_broker_events(
    mut event_loop: EventLoop,
    broker: MqttBroker,
    connack_tx: oneshot::Sender<()>,
) {
    let mut connack_tx = Some(connack_tx);
    let reconnect_delay = broker.inner.config.reconnect_delay;

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT broker connected");
                broker.inner.connected.store(true, Ordering::Release);
                if let Some(tx) = connack_tx.take() {
                    let _ = tx.send(());
                } else {
                    tracing::info!("Reconnected to MQTT broker");
                    // Queued from a separate task: the request channel is
                    // drained by this loop.
                    let broker = broker.clone();
                    tokio::spawn(async move { broker.resubscribe().await });
                }
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                broker.deliver(&publish.topic, &publish.payload);
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                tracing::info!("MQTT broker closed the session");
                broker.inner.connected.store(false, Ordering::Release);
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) if broker.is_shutting_down() => {
                tracing::debug!("MQTT event loop stopped");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                broker.inner.connected.store(false, Ordering::Release);
                if broker.is_shutting_down() {
                    break;
                }
                if connack_tx.is_some() {
                    tracing::debug!(error = %e, "MQTT connection attempt failed");
                } else {
                    tracing::warn!(error = %e, "MQTT connection lost, reconnecting");
                }
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}
