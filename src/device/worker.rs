// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single writer for a light.
//!
//! Broker handlers run for several topics at once, but every change is a
//! read-modify-write cycle on the same device. Two overlapping cycles would
//! read the same state and the later write would drop the earlier change.
//! The [`LightWorker`] owns the [`Light`] and applies queued commands one at
//! a time; [`LightHandle`]s only enqueue. The queue is bounded, so a slow
//! light makes handlers drop values instead of building up a backlog of
//! stale changes.
//!
//! ```text
//!  brightness handler ─┐
//! temperature handler ─┼─► mpsc ─► LightWorker ─► Light (GET, PUT)
//!       onoff handler ─┘
//! ```

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::command::{Control, LightCommand};
use crate::device::Light;
use crate::error::DeviceError;
use crate::protocol::{Handler, StateTransport};
use crate::state::LightState;

type Reply = oneshot::Sender<Result<LightState, DeviceError>>;

/// A queued command, optionally with a channel for the outcome.
struct Request {
    command: LightCommand,
    reply: Option<Reply>,
}

/// Cloneable handle enqueuing commands for a [`LightWorker`].
#[derive(Debug, Clone)]
pub struct LightHandle {
    tx: mpsc::Sender<Request>,
}

impl LightHandle {
    /// Enqueues `command` without waiting for it to be applied.
    ///
    /// Failures while applying are logged by the worker.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::QueueFull`] if the worker is still busy with
    /// earlier commands, or [`DeviceError::WorkerStopped`] if it has exited.
    pub fn submit(&self, command: LightCommand) -> Result<(), DeviceError> {
        self.tx
            .try_send(Request {
                command,
                reply: None,
            })
            .map_err(|e| match e {
                TrySendError::Full(_) => DeviceError::QueueFull,
                TrySendError::Closed(_) => DeviceError::WorkerStopped,
            })
    }

    /// Enqueues `command` and waits for the state acknowledged by the light.
    ///
    /// Waits for room in the queue if it is full.
    ///
    /// # Errors
    ///
    /// Returns the error of applying the command, or
    /// [`DeviceError::WorkerStopped`] if the worker has exited.
    pub async fn apply(&self, command: LightCommand) -> Result<LightState, DeviceError> {
        let (reply, outcome) = oneshot::channel();
        self.tx
            .send(Request {
                command,
                reply: Some(reply),
            })
            .await
            .map_err(|_| DeviceError::WorkerStopped)?;
        outcome.await.map_err(|_| DeviceError::WorkerStopped)?
    }

    /// Returns a topic handler that submits the command for `control`.
    ///
    /// Values arriving while the queue is full are dropped with a warning.
    #[must_use]
    pub fn handler(&self, control: Control) -> Handler {
        let handle = self.clone();
        Arc::new(move |value| {
            if let Err(e) = handle.submit(control.command(value)) {
                tracing::warn!(control = %control, value, error = %e, "Dropping value");
            }
        })
    }
}

/// Applies commands to a light one at a time.
///
/// The worker runs until every [`LightHandle`] has been dropped, after
/// applying whatever is still queued.
#[derive(Debug)]
pub struct LightWorker<T> {
    light: Light<T>,
    rx: mpsc::Receiver<Request>,
}

impl<T> LightWorker<T>
where
    T: StateTransport + Send + Sync + 'static,
{
    /// Default number of commands that may wait for the worker.
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Creates a worker owning `light` and a handle feeding it.
    #[must_use]
    pub fn new(light: Light<T>) -> (Self, LightHandle) {
        Self::with_capacity(light, Self::DEFAULT_CAPACITY)
    }

    /// Creates a worker whose queue holds at most `capacity` commands.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(light: Light<T>, capacity: usize) -> (Self, LightHandle) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { light, rx }, LightHandle { tx })
    }

    /// Spawns a worker for `light` on the current runtime.
    #[must_use]
    pub fn spawn(light: Light<T>) -> (LightHandle, JoinHandle<()>) {
        let (worker, handle) = Self::new(light);
        (handle, tokio::spawn(worker.run()))
    }

    /// Applies queued commands until all handles are dropped.
    pub async fn run(mut self) {
        tracing::debug!("Light worker started");

        while let Some(Request { command, reply }) = self.rx.recv().await {
            let result = self.light.apply_command(command).await;

            match &result {
                Ok(state) => tracing::info!(%command, ?state, "Applied command"),
                Err(e) => tracing::warn!(%command, error = %e, "Failed to apply command"),
            }

            if let Some(reply) = reply {
                // The caller may have stopped waiting.
                let _ = reply.send(result);
            }
        }

        tracing::debug!("Light worker stopped");
    }
}
