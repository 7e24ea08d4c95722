// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State of the light as exchanged with its HTTP API.
//!
//! The same document is returned by `GET /elgato/lights`, sent as the body of
//! `PUT /elgato/lights`, and echoed back by the light after a `PUT`:
//!
//! ```json
//! { "numberOfLights": 1, "lights": [ { "on": 1, "brightness": 40, "temperature": 213 } ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DeviceError;
use crate::types::PowerState;

/// Full reported state of the light.
///
/// The whole document is written back on every update so that fields which
/// are not being changed keep their current values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightState {
    /// Number of physical light units reported by the device.
    pub number_of_lights: u32,
    /// One entry per light unit, in device order.
    pub lights: Vec<LightUnit>,
}

/// State of a single light unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightUnit {
    /// Whether the light is on.
    pub on: PowerState,
    /// Brightness in percent, `3..=100`.
    pub brightness: i32,
    /// Color temperature in device units, `143..=344`.
    pub temperature: i32,
}

impl LightState {
    /// Creates a state describing exactly one light.
    #[must_use]
    pub fn single(light: LightUnit) -> Self {
        Self {
            number_of_lights: 1,
            lights: vec![light],
        }
    }

    /// Returns the only light unit.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Unsupported`] unless the device reports and
    /// lists exactly one light.
    pub fn single_light(&self) -> Result<&LightUnit, DeviceError> {
        match self.lights.as_slice() {
            [light] if self.number_of_lights == 1 => Ok(light),
            _ => Err(DeviceError::Unsupported {
                number_of_lights: self.number_of_lights,
                lights: self.lights.len(),
            }),
        }
    }

    /// Returns a copy of this state with the only light unit replaced by
    /// `update(current)`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Unsupported`] unless there is exactly one light.
    pub fn map_single_light(
        &self,
        update: impl FnOnce(LightUnit) -> LightUnit,
    ) -> Result<Self, DeviceError> {
        let light = *self.single_light()?;
        Ok(Self {
            number_of_lights: self.number_of_lights,
            lights: vec![update(light)],
        })
    }
}
