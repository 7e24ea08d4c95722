// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration of the bridge.

use std::time::Duration;

use crate::command::Control;
use crate::error::ParseError;
use crate::types::HostAddress;

/// Everything needed to start a [`Bridge`](crate::Bridge).
///
/// # Examples
///
/// ```
/// use elgato_mqtt::BridgeConfig;
/// use elgato_mqtt::command::Control;
///
/// let config = BridgeConfig::new(
///     "192.168.1.100:9123".parse().unwrap(),
///     "192.168.1.200:1883".parse().unwrap(),
///     "office/light",
/// )
/// .unwrap();
///
/// assert_eq!(config.topic(Control::Brightness), "office/light/brightness");
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    light: HostAddress,
    broker: HostAddress,
    topic_prefix: String,
    connection_timeout: Duration,
    request_timeout: Duration,
    keep_alive: Duration,
}

impl BridgeConfig {
    /// Default time allowed for the broker to acknowledge the session.
    pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default timeout of a single HTTP request to the light.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default MQTT keep-alive interval.
    pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

    /// Creates a configuration with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::BlankPrefix`] if `topic_prefix` is blank.
    pub fn new(
        light: HostAddress,
        broker: HostAddress,
        topic_prefix: impl Into<String>,
    ) -> Result<Self, ParseError> {
        let topic_prefix = topic_prefix.into();
        if topic_prefix.trim().is_empty() {
            return Err(ParseError::BlankPrefix);
        }

        Ok(Self {
            light,
            broker,
            topic_prefix,
            connection_timeout: Self::DEFAULT_CONNECTION_TIMEOUT,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            keep_alive: Self::DEFAULT_KEEP_ALIVE,
        })
    }

    /// Sets the broker connection timeout.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the MQTT keep-alive interval.
    #[must_use]
    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Returns the light's address.
    #[must_use]
    pub fn light(&self) -> &HostAddress {
        &self.light
    }

    /// Returns the broker's address.
    #[must_use]
    pub fn broker(&self) -> &HostAddress {
        &self.broker
    }

    /// Returns the topic prefix.
    #[must_use]
    pub fn topic_prefix(&self) -> &str {
        &self.topic_prefix
    }

    /// Returns the broker connection timeout.
    #[must_use]
    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    /// Returns the HTTP request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the MQTT keep-alive interval.
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        self.keep_alive
    }

    /// Returns the topic for `control` under the configured prefix.
    #[must_use]
    pub fn topic(&self, control: Control) -> String {
        control.topic(&self.topic_prefix)
    }
}
