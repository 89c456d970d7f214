//! Test fixtures: jobs with scripted outcomes and a queue that counts calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::app::JobManager;
use crate::config::ManagerConfig;
use crate::domain::{JobFault, Message, MessageId, Payload};
use crate::impls::{InMemoryQueue, QueueManager};
use crate::ports::{Queue, QueueError};
use crate::typed::{Job, JobRegistry, PayloadCodec, TypedJob};

/// Succeeds or fails (returns `false`) as configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountingJob {
    pub name: String,
    pub succeed: bool,
}

impl CountingJob {
    pub fn succeeding(name: &str) -> Self {
        Self {
            name: name.to_string(),
            succeed: true,
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            succeed: false,
        }
    }
}

#[async_trait]
impl Job for CountingJob {
    async fn execute(&self, _queue: &dyn Queue, _message: &Message) -> Result<bool, JobFault> {
        Ok(self.succeed)
    }

    fn label(&self) -> String {
        format!("counting {}", self.name)
    }
}

impl TypedJob for CountingJob {
    const TYPE: &'static str = "test.counting.v1";
}

/// Always raises a fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultingJob {
    pub reason: String,
}

#[async_trait]
impl Job for FaultingJob {
    async fn execute(&self, _queue: &dyn Queue, _message: &Message) -> Result<bool, JobFault> {
        Err(JobFault::new(self.reason.clone()))
    }
}

impl TypedJob for FaultingJob {
    const TYPE: &'static str = "test.faulting.v1";
}

/// Panics inside `execute`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanickingJob;

#[async_trait]
impl Job for PanickingJob {
    async fn execute(&self, _queue: &dyn Queue, _message: &Message) -> Result<bool, JobFault> {
        panic!("kaboom");
    }
}

impl TypedJob for PanickingJob {
    const TYPE: &'static str = "test.panicking.v1";
}

/// Fails until the message has been attempted `succeed_on` times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlakyJob {
    pub succeed_on: u32,
}

#[async_trait]
impl Job for FlakyJob {
    async fn execute(&self, _queue: &dyn Queue, message: &Message) -> Result<bool, JobFault> {
        Ok(message.execution_count() >= self.succeed_on)
    }
}

impl TypedJob for FlakyJob {
    const TYPE: &'static str = "test.flaky.v1";
}

pub fn registry() -> Arc<JobRegistry> {
    let mut registry = JobRegistry::new();
    registry.register::<CountingJob>().unwrap();
    registry.register::<FaultingJob>().unwrap();
    registry.register::<PanickingJob>().unwrap();
    registry.register::<FlakyJob>().unwrap();
    Arc::new(registry)
}

pub fn codec() -> Arc<PayloadCodec> {
    Arc::new(PayloadCodec::new(registry()))
}

/// Wraps an `InMemoryQueue` and records every `submit` and `finish`.
pub struct SpyQueue {
    inner: InMemoryQueue,
    submits: AtomicUsize,
    finishes: AtomicUsize,
    finished: Mutex<Vec<MessageId>>,
    reject_submits: AtomicBool,
}

impl SpyQueue {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryQueue::new(name),
            submits: AtomicUsize::new(0),
            finishes: AtomicUsize::new(0),
            finished: Mutex::new(Vec::new()),
            reject_submits: AtomicBool::new(false),
        })
    }

    pub fn submits(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn finishes(&self) -> usize {
        self.finishes.load(Ordering::SeqCst)
    }

    pub async fn finished(&self) -> Vec<MessageId> {
        self.finished.lock().await.clone()
    }

    pub fn reset_counters(&self) {
        self.submits.store(0, Ordering::SeqCst);
        self.finishes.store(0, Ordering::SeqCst);
    }

    /// Make every later `submit` fail with a backend error.
    pub fn reject_submits(&self) {
        self.reject_submits.store(true, Ordering::SeqCst);
    }

    /// Put a message with an arbitrary payload and count, bypassing the codec.
    pub async fn seed(&self, payload: Payload, execution_count: u32) -> MessageId {
        let mut message = Message::new(payload);
        for _ in 0..execution_count {
            message.count_execution();
        }
        self.inner.submit(message).await.unwrap()
    }
}

#[async_trait]
impl Queue for SpyQueue {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn submit(&self, message: Message) -> Result<MessageId, QueueError> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        if self.reject_submits.load(Ordering::SeqCst) {
            return Err(QueueError::OperationFailed("submit rejected".into()));
        }
        self.inner.submit(message).await
    }

    async fn wait_and_reserve(
        &self,
        timeout: Option<Duration>,
    ) -> Result<Option<Message>, QueueError> {
        self.inner.wait_and_reserve(timeout).await
    }

    async fn finish(&self, message: &Message) -> Result<bool, QueueError> {
        self.finishes.fetch_add(1, Ordering::SeqCst);
        if let Some(id) = message.identifier() {
            self.finished.lock().await.push(id);
        }
        self.inner.finish(message).await
    }

    async fn peek(&self, limit: usize) -> Result<Vec<Message>, QueueError> {
        self.inner.peek(limit).await
    }

    async fn count(&self) -> Result<usize, QueueError> {
        self.inner.count().await
    }
}

/// A manager over a single spy queue named `q`.
pub fn spy_manager() -> (Arc<JobManager>, Arc<SpyQueue>) {
    let queue = SpyQueue::new("q");
    let queues = QueueManager::new().with_queue(queue.clone());
    let manager = JobManager::new(Arc::new(queues), codec(), ManagerConfig::default());
    (Arc::new(manager), queue)
}
