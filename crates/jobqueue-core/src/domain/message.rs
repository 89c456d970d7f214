//! Queue message: serialized job + retry bookkeeping.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::MessageId;

/// Opaque serialized job. The core never looks inside; the codec does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(String);

impl Payload {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A queue's wrapper around a job payload.
///
/// Ownership split:
/// - the backend assigns `identifier` on first submit and owns visibility;
/// - the executor owns `execution_count` and the finish/resubmit decision.
///
/// A resubmitted message keeps both its identifier and its count, so retry
/// accounting survives as long as the backend keeps the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    identifier: Option<MessageId>,
    payload: Payload,
    execution_count: u32,
}

impl Message {
    /// A brand-new message: no identifier yet, zero executions.
    pub fn new(payload: Payload) -> Self {
        Self {
            identifier: None,
            payload,
            execution_count: 0,
        }
    }

    /// Rebuild a message a backend already knows about.
    pub fn restore(identifier: MessageId, payload: Payload, execution_count: u32) -> Self {
        Self {
            identifier: Some(identifier),
            payload,
            execution_count,
        }
    }

    /// `None` until the message has been submitted once.
    pub fn identifier(&self) -> Option<MessageId> {
        self.identifier
    }

    /// Called by backends on first submit. An identifier, once set, is kept.
    pub fn assign_identifier(&mut self, identifier: MessageId) -> MessageId {
        *self.identifier.get_or_insert(identifier)
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn execution_count(&self) -> u32 {
        self.execution_count
    }

    /// Record one execution attempt. Called exactly once per reservation.
    pub fn count_execution(&mut self) -> u32 {
        self.execution_count = self.execution_count.saturating_add(1);
        self.execution_count
    }
}
