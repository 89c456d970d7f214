//! In-memory queue backend.
//!
//! Visible messages wait in a FIFO; reserved ones sit in a map keyed by
//! identifier until they are finished or resubmitted. Waiters park on a
//! `Notify` and re-check the FIFO after every wake-up.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;
use tracing::debug;

use crate::domain::{Message, MessageId};
use crate::ports::{IdGenerator, Queue, QueueError, SystemClock, UlidGenerator};

/// Snapshot of how many messages are in each state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueCounts {
    pub visible: usize,
    pub reserved: usize,
}

#[derive(Default)]
struct InMemoryQueueState {
    /// Messages available for reservation, oldest first.
    ready: VecDeque<Message>,

    /// Messages handed out by `wait_and_reserve` and not finished yet.
    reserved: HashMap<MessageId, Message>,
}

pub struct InMemoryQueue {
    name: String,
    state: Mutex<InMemoryQueueState>,
    notify: Notify,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryQueue {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id_generator(name, Arc::new(UlidGenerator::new(SystemClock)))
    }

    pub fn with_id_generator(name: impl Into<String>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(InMemoryQueueState::default()),
            notify: Notify::new(),
            ids,
        }
    }

    pub async fn counts(&self) -> QueueCounts {
        let state = self.state.lock().await;
        QueueCounts {
            visible: state.ready.len(),
            reserved: state.reserved.len(),
        }
    }
}

#[async_trait]
impl Queue for InMemoryQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn submit(&self, mut message: Message) -> Result<MessageId, QueueError> {
        let id = message.assign_identifier(self.ids.generate_message_id());
        {
            let mut state = self.state.lock().await;
            // resubmitting a reserved message releases the reservation
            state.reserved.remove(&id);
            state.ready.push_back(message);
        }
        // notify outside the lock
        self.notify.notify_one();
        debug!(queue = %self.name, message_id = %id, "message submitted");
        Ok(id)
    }

    async fn wait_and_reserve(
        &self,
        timeout: Option<Duration>,
    ) -> Result<Option<Message>, QueueError> {
        // unrepresentable deadlines wait forever
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        loop {
            let notified = self.notify.notified();
            {
                let mut state = self.state.lock().await;
                if let Some(message) = state.ready.pop_front() {
                    let Some(id) = message.identifier() else {
                        return Err(QueueError::MissingIdentifier);
                    };
                    state.reserved.insert(id, message.clone());
                    debug!(queue = %self.name, message_id = %id, "message reserved");
                    return Ok(Some(message));
                }
            }

            match deadline {
                Some(deadline) => {
                    if tokio::time::timeout_at(deadline, notified).await.is_err() {
                        return Ok(None);
                    }
                }
                None => notified.await,
            }
        }
    }

    async fn finish(&self, message: &Message) -> Result<bool, QueueError> {
        let id = message.identifier().ok_or(QueueError::MissingIdentifier)?;
        let released = self.state.lock().await.reserved.remove(&id).is_some();
        debug!(queue = %self.name, message_id = %id, released, "message finished");
        Ok(released)
    }

    async fn peek(&self, limit: usize) -> Result<Vec<Message>, QueueError> {
        let state = self.state.lock().await;
        Ok(state.ready.iter().take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<usize, QueueError> {
        Ok(self.state.lock().await.ready.len())
    }
}
