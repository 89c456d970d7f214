//! QueueResolver port - looks up queues by name.

use std::sync::Arc;

use super::queue::Queue;

/// The requested queue is not configured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("queue '{name}' not found")]
pub struct QueueNotFound {
    name: String,
}

impl QueueNotFound {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

pub trait QueueResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<Arc<dyn Queue>, QueueNotFound>;
}
