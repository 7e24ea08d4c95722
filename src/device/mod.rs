// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-modify-write client for a single light.
//!
//! Every change fetches the light's full current state, transforms it, and
//! writes the whole document back, so fields that are not being changed
//! keep the values the light reported. Nothing is cached between calls.
//!
//! [`Light`] does not serialize concurrent calls. Use [`LightWorker`] to get
//! a single writer that applies commands one at a time.

mod worker;

pub use worker::{LightHandle, LightWorker};

use crate::command::LightCommand;
use crate::error::DeviceError;
use crate::protocol::StateTransport;
use crate::state::LightState;

#[cfg(feature = "http")]
use crate::protocol::{HttpTransport, LightConfig};

/// A light controlled through its state resource.
///
/// # Examples
///
/// ```no_run
/// use elgato_mqtt::Light;
/// use elgato_mqtt::protocol::LightConfig;
///
/// # async fn example() -> elgato_mqtt::Result<()> {
/// let light = Light::http(LightConfig::new("192.168.1.100"))?;
///
/// light.set_power(true).await?;
/// light.set_brightness(0.5).await?;
/// light.set_temperature(0.2).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Light<T> {
    transport: T,
}

#[cfg(feature = "http")]
impl Light<HttpTransport> {
    /// Creates a light reached over HTTP.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn http(config: LightConfig) -> Result<Self, DeviceError> {
        Ok(Self::new(config.into_transport()?))
    }
}

impl<T: StateTransport> Light<T> {
    /// Creates a light on top of the given transport.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Reads the current state of the light.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the request fails or the response cannot be
    /// decoded.
    pub async fn fetch_state(&self) -> Result<LightState, DeviceError> {
        self.transport.fetch().await
    }

    /// Fetches the current state, applies `mutator` and writes the result.
    ///
    /// `mutator` receives the full previous state and must return the full
    /// new state. Returns the state acknowledged by the light.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Unsupported`] without writing anything unless
    /// the light reports exactly one unit, or any error of the fetch or the
    /// write.
    pub async fn apply_mutation<F>(&self, mutator: F) -> Result<LightState, DeviceError>
    where
        F: FnOnce(LightState) -> LightState,
    {
        let state = self.transport.fetch().await?;
        state.single_light()?;
        self.transport.store(&mutator(state)).await
    }

    /// Applies a [`LightCommand`] through [`Light::apply_mutation`].
    ///
    /// # Errors
    ///
    /// Same as [`Light::apply_mutation`].
    pub async fn apply_command(&self, command: LightCommand) -> Result<LightState, DeviceError> {
        self.apply_mutation(|mut state| {
            for light in &mut state.lights {
                *light = command.apply_to_unit(*light);
            }
            state
        })
        .await
    }

    /// Sets brightness from a normalized amount in `[0.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// Same as [`Light::apply_mutation`].
    pub async fn set_brightness(&self, amount: f64) -> Result<LightState, DeviceError> {
        self.apply_command(LightCommand::SetBrightness(amount)).await
    }

    /// Sets color temperature from a normalized amount in `[0.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// Same as [`Light::apply_mutation`].
    pub async fn set_temperature(&self, amount: f64) -> Result<LightState, DeviceError> {
        self.apply_command(LightCommand::SetTemperature(amount)).await
    }

    /// Turns the light on or off.
    ///
    /// # Errors
    ///
    /// Same as [`Light::apply_mutation`].
    pub async fn set_power(&self, on: bool) -> Result<LightState, DeviceError> {
        self.apply_command(LightCommand::SetPower(on)).await
    }
}

/// In-memory light used by unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use parking_lot::Mutex;

    use crate::error::DeviceError;
    use crate::protocol::StateTransport;
    use crate::state::{LightState, LightUnit};
    use crate::types::PowerState;

    /// Behaves like a light: `store` replaces the state and echoes it.
    ///
    /// `fetch` yields to the scheduler after reading so that unsynchronized
    /// read-modify-write cycles interleave.
    #[derive(Debug)]
    pub(crate) struct FakeLight {
        state: Mutex<LightState>,
        fetches: Mutex<usize>,
        writes: Mutex<Vec<LightState>>,
    }

    impl FakeLight {
        pub(crate) fn new(state: LightState) -> Self {
            Self {
                state: Mutex::new(state),
                fetches: Mutex::new(0),
                writes: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn with_unit(on: PowerState, brightness: i32, temperature: i32) -> Self {
            Self::new(LightState::single(LightUnit {
                on,
                brightness,
                temperature,
            }))
        }

        pub(crate) fn state(&self) -> LightState {
            self.state.lock().clone()
        }

        pub(crate) fn fetches(&self) -> usize {
            *self.fetches.lock()
        }

        pub(crate) fn writes(&self) -> Vec<LightState> {
            self.writes.lock().clone()
        }
    }

    impl StateTransport for FakeLight {
        async fn fetch(&self) -> Result<LightState, DeviceError> {
            let state = self.state.lock().clone();
            *self.fetches.lock() += 1;
            tokio::task::yield_now().await;
            Ok(state)
        }

        async fn store(&self, state: &LightState) -> Result<LightState, DeviceError> {
            *self.state.lock() = state.clone();
            self.writes.lock().push(state.clone());
            Ok(state.clone())
        }
    }
}
