// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commands that change the state of the light.
//!
//! A [`LightCommand`] is a pure transformation of the light's previous state.
//! It never talks to the network on its own; the [`Light`](crate::Light)
//! client fetches the current state, applies the command and writes the
//! result back.
//!
//! | Command | Topic suffix | Effect |
//! |---------|--------------|--------|
//! | [`LightCommand::SetBrightness`] | `brightness` | Maps `[0.0, 1.0]` onto `3..=100` |
//! | [`LightCommand::SetTemperature`] | `temperature` | Maps `[0.0, 1.0]` onto `143..=344` |
//! | [`LightCommand::SetPower`] | `onoff` | `0.0` turns off, anything else on |
//!
//! # Examples
//!
//! ```
//! use elgato_mqtt::command::LightCommand;
//! use elgato_mqtt::state::{LightState, LightUnit};
//! use elgato_mqtt::types::PowerState;
//!
//! let state = LightState::single(LightUnit {
//!     on: PowerState::On,
//!     brightness: 40,
//!     temperature: 213,
//! });
//!
//! let updated = LightCommand::SetBrightness(1.0).apply(&state).unwrap();
//! assert_eq!(updated.lights[0].brightness, 100);
//! assert_eq!(updated.lights[0].temperature, 213);
//! ```

mod control;

pub use control::Control;

use std::fmt;

use crate::error::DeviceError;
use crate::state::{LightState, LightUnit};
use crate::types::{DeviceRange, PowerState};

/// A single change to the light's state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightCommand {
    /// Set brightness from a normalized amount.
    SetBrightness(f64),
    /// Set color temperature from a normalized amount.
    SetTemperature(f64),
    /// Turn the light on or off.
    SetPower(bool),
}

impl LightCommand {
    /// Applies this command to a full light state.
    ///
    /// Only the targeted field of the single light unit changes; everything
    /// else is carried over from `state`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Unsupported`] unless `state` describes exactly
    /// one light.
    pub fn apply(&self, state: &LightState) -> Result<LightState, DeviceError> {
        state.map_single_light(|light| self.apply_to_unit(light))
    }

    /// Applies this command to a single light unit.
    #[must_use]
    pub fn apply_to_unit(&self, light: LightUnit) -> LightUnit {
        match *self {
            Self::SetBrightness(amount) => LightUnit {
                brightness: DeviceRange::BRIGHTNESS.map(amount),
                ..light
            },
            Self::SetTemperature(amount) => LightUnit {
                temperature: DeviceRange::TEMPERATURE.map(amount),
                ..light
            },
            Self::SetPower(on) => LightUnit {
                on: PowerState::from(on),
                ..light
            },
        }
    }
}

impl fmt::Display for LightCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetBrightness(amount) => write!(f, "brightness {amount}"),
            Self::SetTemperature(amount) => write!(f, "temperature {amount}"),
            Self::SetPower(on) => write!(f, "power {}", PowerState::from(*on)),
        }
    }
}
