// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP access to the light's state endpoint.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::DeviceError;
use crate::protocol::StateTransport;
use crate::state::LightState;
use crate::types::HostAddress;

/// Path of the state resource on the light.
const STATE_PATH: &str = "/elgato/lights";

/// Configuration for the light's HTTP API.
///
/// # Examples
///
/// ```
/// use elgato_mqtt::protocol::LightConfig;
/// use std::time::Duration;
///
/// let config = LightConfig::new("192.168.1.100")
///     .with_port(9123)
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.state_url(), "http://192.168.1.100:9123/elgato/lights");
/// ```
#[derive(Debug, Clone)]
pub struct LightConfig {
    host: String,
    port: u16,
    timeout: Duration,
}

impl LightConfig {
    /// Port the light listens on out of the box.
    pub const DEFAULT_PORT: u16 = 9123;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the specified host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the URL of the state resource.
    #[must_use]
    pub fn state_url(&self) -> String {
        format!("http://{}:{}{STATE_PATH}", self.host, self.port)
    }

    /// Creates an `HttpTransport` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_transport(self) -> Result<HttpTransport, DeviceError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(DeviceError::Communication)?;

        Ok(HttpTransport {
            url: self.state_url(),
            client,
        })
    }
}

impl From<&HostAddress> for LightConfig {
    fn from(address: &HostAddress) -> Self {
        Self::new(address.host()).with_port(address.port())
    }
}

/// HTTP transport for the light's state resource.
///
/// Reads with `GET` and writes the full state document with `PUT`. The
/// light answers both with its resulting state.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    url: String,
    client: Client,
}

impl HttpTransport {
    /// Returns the URL of the state resource.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl StateTransport for HttpTransport {
    async fn fetch(&self) -> Result<LightState, DeviceError> {
        tracing::debug!(url = %self.url, "Fetching light state");

        let response = self.client.get(&self.url).send().await?;
        decode(response).await
    }

    async fn store(&self, state: &LightState) -> Result<LightState, DeviceError> {
        tracing::debug!(url = %self.url, ?state, "Writing light state");

        let response = self.client.put(&self.url).json(state).send().await?;
        decode(response).await
    }
}

/// Checks the status and decodes the state document from a response.
async fn decode(response: Response) -> Result<LightState, DeviceError> {
    let body = response.error_for_status()?.text().await?;

    tracing::debug!(body = %body, "Received light state");

    Ok(serde_json::from_str(&body)?)
}
