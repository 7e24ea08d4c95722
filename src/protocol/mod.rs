// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol implementations on both sides of the bridge.
//!
//! - [`HttpTransport`]: reads and writes the light's state over its REST API
//! - [`MqttBroker`]: broker session delivering control values
//! - [`TopicRouter`]: topic to handler bindings used by the broker

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "mqtt")]
mod mqtt_broker;
mod topic_router;

#[cfg(feature = "http")]
pub use http::{HttpTransport, LightConfig};
#[cfg(feature = "mqtt")]
pub use mqtt_broker::{MqttBroker, MqttBrokerBuilder, MqttBrokerConfig};
pub use topic_router::{Handler, TopicRouter, parse_payload};

use std::future::Future;
use std::sync::Arc;

use crate::error::DeviceError;
use crate::state::LightState;

/// Access to the state resource of a single light.
///
/// Implementations perform exactly one network round trip per call and
/// never cache state.
pub trait StateTransport {
    /// Reads the current state of the light.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the request fails or the response cannot be
    /// decoded.
    fn fetch(&self) -> impl Future<Output = Result<LightState, DeviceError>> + Send;

    /// Writes `state` to the light and returns the state it acknowledged.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the request fails or the response cannot be
    /// decoded.
    fn store(
        &self,
        state: &LightState,
    ) -> impl Future<Output = Result<LightState, DeviceError>> + Send;
}

impl<T: StateTransport + Send + Sync> StateTransport for Arc<T> {
    fn fetch(&self) -> impl Future<Output = Result<LightState, DeviceError>> + Send {
        (**self).fetch()
    }

    fn store(
        &self,
        state: &LightState,
    ) -> impl Future<Output = Result<LightState, DeviceError>> + Send {
        (**self).store(state)
    }
}
