// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the bridge.
//!
//! Errors are split by where they originate: parsing of user supplied text
//! (addresses, topic prefixes, message payloads), the light's HTTP API, and
//! the MQTT broker session.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed address, prefix, or message payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Failure while talking to the light.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// Failure while talking to the MQTT broker.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Errors raised while parsing user supplied text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The address did not have the `<host>:<port>` shape.
    #[error("address '{0}' must be of format <host>:<port>")]
    SegmentCount(String),

    /// The host part of an address was blank.
    #[error("host cannot be blank")]
    BlankHost,

    /// The port part of an address was not an integer.
    #[error("cannot parse port: '{0}'")]
    MalformedPort(String),

    /// The port part of an address was zero or negative.
    #[error("port must be positive, got {0}")]
    NonPositivePort(i64),

    /// The topic prefix was blank.
    #[error("topic prefix cannot be blank")]
    BlankPrefix,

    /// A message payload was not a floating point literal.
    #[error("invalid payload on '{topic}': '{payload}'")]
    InvalidPayload {
        /// The topic the payload arrived on.
        topic: String,
        /// The offending payload.
        payload: String,
    },
}

/// Errors related to the light's HTTP state endpoint.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device does not report exactly one light.
    #[error("aborting, not exactly one light: {number_of_lights} reported, {lights} listed")]
    Unsupported {
        /// The `numberOfLights` field reported by the device.
        number_of_lights: u32,
        /// The number of entries in the `lights` array.
        lights: usize,
    },

    /// The HTTP request failed or the device answered with an error status.
    #[cfg(feature = "http")]
    #[error("request failed: {0}")]
    Communication(#[from] reqwest::Error),

    /// The response body did not match the expected state shape.
    #[error("cannot parse response: {0}")]
    Protocol(#[from] serde_json::Error),

    /// The light worker is no longer running.
    #[error("light worker stopped")]
    WorkerStopped,

    /// The light worker has too many commands waiting.
    #[error("light worker queue is full")]
    QueueFull,
}

/// Errors related to the MQTT broker session.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT client request failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// The broker session could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid broker address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
