// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wiring of broker topics to the light.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::command::Control;
use crate::config::BridgeConfig;
use crate::device::{Light, LightHandle, LightWorker};
use crate::error::Result;
use crate::protocol::{LightConfig, MqttBroker};

/// How long shutdown waits for queued commands to reach the light.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A running bridge between the broker and the light.
///
/// # Examples
///
/// ```no_run
/// use elgato_mqtt::{Bridge, BridgeConfig};
///
/// # async fn example() -> elgato_mqtt::Result<()> {
/// let config = BridgeConfig::new(
///     "192.168.1.100:9123".parse()?,
///     "192.168.1.200:1883".parse()?,
///     "office/light",
/// )?;
///
/// let bridge = Bridge::start(config).await?;
/// tokio::signal::ctrl_c().await.ok();
/// bridge.shutdown().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bridge {
    broker: MqttBroker,
    light: LightHandle,
    worker: JoinHandle<()>,
}

impl Bridge {
    /// Connects to the broker and binds every [`Control`] topic to the light.
    ///
    /// Nothing is subscribed unless the broker session is established.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created, the broker is
    /// unreachable within the connection timeout, or a subscription fails.
    pub async fn start(config: BridgeConfig) -> Result<Self> {
        let light = Light::http(
            LightConfig::from(config.light()).with_timeout(config.request_timeout()),
        )?;

        let broker = MqttBroker::builder()
            .host(config.broker().host())
            .port(config.broker().port())
            .keep_alive(config.keep_alive())
            .connection_timeout(config.connection_timeout())
            .build()
            .await?;

        let (handle, worker) = LightWorker::spawn(light);

        for control in Control::ALL {
            broker
                .bind(config.topic(control), handle.handler(control))
                .await?;
        }

        Ok(Self {
            broker,
            light: handle,
            worker,
        })
    }

    /// Returns the broker session.
    #[must_use]
    pub fn broker(&self) -> &MqttBroker {
        &self.broker
    }

    /// Returns a handle for sending commands to the light directly.
    #[must_use]
    pub fn light(&self) -> &LightHandle {
        &self.light
    }

    /// Disconnects from the broker and lets the light worker finish.
    ///
    /// Commands already queued are still applied. The worker is aborted if
    /// it does not finish within a few seconds.
    ///
    /// # Errors
    ///
    /// Returns error if the disconnect request cannot be queued. The worker
    /// is stopped either way.
    pub async fn shutdown(self) -> Result<()> {
        let Self {
            broker,
            light,
            mut worker,
        } = self;

        let disconnected = broker.disconnect().await;
        drop(light);

        if tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut worker)
            .await
            .is_err()
        {
            tracing::warn!(
                timeout = ?SHUTDOWN_TIMEOUT,
                "Light worker did not finish, aborting"
            );
            worker.abort();
        }

        disconnected?;
        Ok(())
    }
}
