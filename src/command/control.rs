// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The controllable dimensions of the light and their topics.

use std::fmt;

use super::LightCommand;

/// One controllable dimension of the light.
///
/// Each dimension is exposed as `<prefix>/<suffix>` on the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// `<prefix>/brightness`
    Brightness,
    /// `<prefix>/temperature`
    Temperature,
    /// `<prefix>/onoff`
    Power,
}

impl Control {
    /// All controls, in subscription order.
    pub const ALL: [Self; 3] = [Self::Brightness, Self::Temperature, Self::Power];

    /// Returns the topic suffix for this control.
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Temperature => "temperature",
            Self::Power => "onoff",
        }
    }

    /// Returns the full topic for this control under `prefix`.
    ///
    /// # Examples
    ///
    /// ```
    /// use elgato_mqtt::command::Control;
    ///
    /// assert_eq!(Control::Power.topic("office/light"), "office/light/onoff");
    /// ```
    #[must_use]
    pub fn topic(&self, prefix: &str) -> String {
        format!("{prefix}/{}", self.suffix())
    }

    /// Converts a received scalar into the command for this control.
    ///
    /// For [`Control::Power`], `0.0` means off and any other value means on.
    #[must_use]
    pub fn command(&self, value: f64) -> LightCommand {
        match self {
            Self::Brightness => LightCommand::SetBrightness(value),
            Self::Temperature => LightCommand::SetTemperature(value),
            Self::Power => LightCommand::SetPower(value != 0.0),
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
