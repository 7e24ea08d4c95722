// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `elgato_mqtt` - Control an Elgato Key Light from MQTT.
//!
//! The bridge subscribes to three topics under a prefix and turns every
//! message into a change of the light's state over its HTTP API:
//!
//! | Topic | Payload | Effect |
//! |-------|---------|--------|
//! | `<prefix>/brightness` | `0.0` - `1.0` | Brightness 3% - 100% |
//! | `<prefix>/temperature` | `0.0` - `1.0` | Color temperature 143 - 344 |
//! | `<prefix>/onoff` | `0` or other | Off / On |
//!
//! Values outside `[0.0, 1.0]` are clamped. Each change fetches the light's
//! full state, replaces one field and writes the state back. Changes are
//! applied one at a time by a single worker so that concurrent messages on
//! different topics do not overwrite each other.
//!
//! # Quick Start
//!
//! ## Running the bridge
//!
//! ```no_run
//! use elgato_mqtt::{Bridge, BridgeConfig};
//!
//! #[tokio::main]
//! async fn main() -> elgato_mqtt::Result<()> {
//!     let config = BridgeConfig::new(
//!         "192.168.1.100:9123".parse()?,
//!         "192.168.1.200:1883".parse()?,
//!         "office/light",
//!     )?;
//!
//!     let bridge = Bridge::start(config).await?;
//!     tokio::signal::ctrl_c().await.ok();
//!     bridge.shutdown().await
//! }
//! ```
//!
//! ## Controlling the light directly
//!
//! ```no_run
//! use elgato_mqtt::Light;
//! use elgato_mqtt::protocol::LightConfig;
//!
//! #[tokio::main]
//! async fn main() -> elgato_mqtt::Result<()> {
//!     let light = Light::http(LightConfig::new("192.168.1.100").with_port(9123))?;
//!
//!     light.set_power(true).await?;
//!     light.set_brightness(0.75).await?;
//!     Ok(())
//! }
//! ```

#[cfg(all(feature = "http", feature = "mqtt"))]
mod bridge;
pub mod command;
mod config;
mod device;
pub mod error;
pub mod protocol;
pub mod state;
pub mod types;

#[cfg(all(feature = "http", feature = "mqtt"))]
pub use bridge::Bridge;
pub use command::{Control, LightCommand};
pub use config::BridgeConfig;
pub use device::{Light, LightHandle, LightWorker};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result};
pub use protocol::{StateTransport, TopicRouter};
pub use state::{LightState, LightUnit};
pub use types::{DeviceRange, HostAddress, PowerState};
