// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mapping of normalized control values onto device-native ranges.
//!
//! Controllers publish values in `[0.0, 1.0]`. The light speaks integers in
//! fixed ranges, so every incoming value goes through [`map`] before it is
//! written.

/// Linearly interpolates `amount` between `min` and `max`.
///
/// `amount` is clamped into `[0.0, 1.0]` first, so the result always lies
/// within the range. `NaN` is treated as `0.0`. The interpolated value is
/// rounded down.
///
/// # Examples
///
/// ```
/// use elgato_mqtt::types::map;
///
/// assert_eq!(map(3, 100, 0.0), 3);
/// assert_eq!(map(3, 100, 1.0), 100);
/// assert_eq!(map(3, 100, 1.5), 100);
/// assert_eq!(map(0, 10, 0.55), 5);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn map(min: i32, max: i32, amount: f64) -> i32 {
    let amount = if amount.is_nan() {
        0.0
    } else {
        amount.clamp(0.0, 1.0)
    };
    let span = f64::from(max) - f64::from(min);
    // Always within [min, max] because amount is clamped.
    (f64::from(min) + span * amount).floor() as i32
}

/// An inclusive device-native integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceRange {
    min: i32,
    max: i32,
}

impl DeviceRange {
    /// Brightness range of the light, in percent.
    pub const BRIGHTNESS: Self = Self::new(3, 100);

    /// Color temperature range of the light, in device units.
    ///
    /// 143 is the warmest (about 7000 K), 344 the coolest (about 2900 K).
    pub const TEMPERATURE: Self = Self::new(143, 344);

    /// Creates a new range.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Returns the lower bound.
    #[must_use]
    pub const fn min(&self) -> i32 {
        self.min
    }

    /// Returns the upper bound.
    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Returns whether `value` lies within the range.
    #[must_use]
    pub const fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Maps a normalized amount onto this range. See [`map`].
    #[must_use]
    pub fn map(&self, amount: f64) -> i32 {
        map(self.min, self.max, amount)
    }
}
