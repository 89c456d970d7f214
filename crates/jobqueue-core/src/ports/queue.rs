//! Queue port - the backend that stores and hands out messages.
//!
//! The core only needs the operations below. Storage, transport and
//! durability are the backend's business.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{Message, MessageId};

/// Errors raised by a queue backend.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("operation failed: {0}")]
    OperationFailed(String),

    #[error("message has no identifier; it was never submitted")]
    MissingIdentifier,
}

/// A named queue.
///
/// # Contract
/// - `submit` makes a message visible to future reservations. A fresh
///   message gets an identifier; a resubmitted one keeps its identifier and
///   execution count.
/// - `wait_and_reserve` claims one visible message. `None` timeout waits
///   forever; `Some(d)` gives up after `d` and returns `Ok(None)`. A reserved
///   message is invisible to other callers until `finish`.
/// - `finish` releases the reservation and removes the message. Returns
///   `false` when the message was not reserved.
/// - `peek` and `count` only look at visible messages and mutate nothing.
#[async_trait]
pub trait Queue: Send + Sync {
    fn name(&self) -> &str;

    async fn submit(&self, message: Message) -> Result<MessageId, QueueError>;

    async fn wait_and_reserve(
        &self,
        timeout: Option<Duration>,
    ) -> Result<Option<Message>, QueueError>;

    async fn finish(&self, message: &Message) -> Result<bool, QueueError>;

    async fn peek(&self, limit: usize) -> Result<Vec<Message>, QueueError>;

    async fn count(&self) -> Result<usize, QueueError>;
}
