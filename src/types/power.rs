// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of a light.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Represents the power state of a light.
///
/// The light reports and accepts the state as an integer, `0` for off and
/// `1` for on.
///
/// # Examples
///
/// ```
/// use elgato_mqtt::types::PowerState;
///
/// assert_eq!(PowerState::from(true), PowerState::On);
/// assert_eq!(PowerState::Off.as_num(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerState {
    /// Light is off.
    #[default]
    Off,
    /// Light is on.
    On,
}

impl PowerState {
    /// Returns the numeric value used on the wire.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    /// Returns whether the light is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("OFF"),
            Self::On => f.write_str("ON"),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl Serialize for PowerState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_num())
    }
}

impl<'de> Deserialize<'de> for PowerState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Unsigned(u64::from(other)),
                &"0 or 1",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bool() {
        assert_eq!(PowerState::from(true), PowerState::On);
        assert_eq!(PowerState::from(false), PowerState::Off);
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&PowerState::On).unwrap(), "1");
        assert_eq!(serde_json::to_string(&PowerState::Off).unwrap(), "0");
    }

    #[test]
    fn deserializes_from_integer() {
        let on: PowerState = serde_json::from_str("1").unwrap();
        let off: PowerState = serde_json::from_str("0").unwrap();
        assert_eq!(on, PowerState::On);
        assert_eq!(off, PowerState::Off);
    }

    #[test]
    fn rejects_unknown_value() {
        assert!(serde_json::from_str::<PowerState>("2").is_err());
        assert!(serde_json::from_str::<PowerState>("\"ON\"").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(PowerState::On.to_string(), "ON");
        assert_eq!(PowerState::Off.to_string(), "OFF");
    }
}
