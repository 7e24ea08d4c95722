// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for light control.
//!
//! # Types
//!
//! - [`HostAddress`] - Validated `<host>:<port>` pair
//! - [`PowerState`] - On/Off state as reported by the light
//! - [`DeviceRange`] - Device-native integer range with linear mapping

mod address;
mod power;
mod range;

pub use address::HostAddress;
pub use power::PowerState;
pub use range::{DeviceRange, map};
