// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT topic routing to scalar handlers.
//!
//! The [`TopicRouter`] maps exact topic names to handlers taking the parsed
//! payload value. The broker event loop calls [`TopicRouter::route`] for
//! every inbound publish.
//!
//! ```text
//! MQTT Message: office/light/brightness → "0.75"
//!                     ↓
//!             TopicRouter.route()
//!                     ↓
//!          parse_payload() → 0.75
//!                     ↓
//!            handler(0.75) invoked
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ParseError;

/// Handler invoked with the parsed value of each message on a topic.
pub type Handler = Arc<dyn Fn(f64) + Send + Sync>;

/// Routes MQTT messages to bound handlers.
///
/// Bindings are added at startup and stay for the lifetime of the router.
#[derive(Default)]
pub struct TopicRouter {
    bindings: RwLock<HashMap<String, Handler>>,
}

impl TopicRouter {
    /// Creates a new empty topic router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `topic`.
    ///
    /// Returns `true` if an earlier binding for the same topic was replaced.
    pub fn bind(&self, topic: impl Into<String>, handler: Handler) -> bool {
        let topic = topic.into();
        tracing::debug!(topic = %topic, "Binding topic handler");
        self.bindings.write().insert(topic, handler).is_some()
    }

    /// Returns whether a handler is bound to `topic`.
    #[must_use]
    pub fn is_bound(&self, topic: &str) -> bool {
        self.bindings.read().contains_key(topic)
    }

    /// Returns all bound topics, sorted.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.bindings.read().keys().cloned().collect();
        topics.sort();
        topics
    }

    /// Returns the number of bound topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    /// Returns whether no topic is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// Removes every binding and drops the handlers.
    pub fn clear(&self) {
        self.bindings.write().clear();
    }

    /// Routes a message to the handler bound to its topic.
    ///
    /// Returns `Ok(false)` if no handler is bound to `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidPayload`] if the payload is not a
    /// floating point literal. The handler is not invoked in that case.
    pub fn route(&self, topic: &str, payload: &str) -> Result<bool, ParseError> {
        // Clone the handler out so it runs without the lock held.
        let handler = self.bindings.read().get(topic).cloned();

        let Some(handler) = handler else {
            tracing::trace!(topic = %topic, "No handler bound to topic");
            return Ok(false);
        };

        let value = parse_payload(topic, payload)?;
        tracing::debug!(topic = %topic, value, "Dispatching value");
        handler(value);
        Ok(true)
    }
}

impl fmt::Debug for TopicRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopicRouter")
            .field("topics", &self.topics())
            .finish()
    }
}

/// Parses a message payload as a floating point value.
///
/// Surrounding whitespace is ignored. No fallback value is substituted for a
/// malformed payload.
///
/// # Errors
///
/// Returns [`ParseError::InvalidPayload`] if `payload` is not a floating
/// point literal.
pub fn parse_payload(topic: &str, payload: &str) -> Result<f64, ParseError> {
    payload
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidPayload {
            topic: topic.to_string(),
            payload: payload.to_string(),
        })
}
