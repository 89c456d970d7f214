//! QueueManager - name -> queue lookup for a process.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ports::{Queue, QueueNotFound, QueueResolver};

/// Holds the queues a process works with, keyed by `Queue::name`.
#[derive(Default)]
pub struct QueueManager {
    queues: HashMap<String, Arc<dyn Queue>>,
}

impl QueueManager {
    pub fn new() -> Self {
        Self {
            queues: HashMap::new(),
        }
    }

    pub fn with_queue(mut self, queue: Arc<dyn Queue>) -> Self {
        self.insert(queue);
        self
    }

    /// Returns the queue previously registered under the same name.
    pub fn insert(&mut self, queue: Arc<dyn Queue>) -> Option<Arc<dyn Queue>> {
        self.queues.insert(queue.name().to_string(), queue)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.queues.keys().cloned().collect();
        names.sort();
        names
    }
}

impl QueueResolver for QueueManager {
    fn resolve(&self, name: &str) -> Result<Arc<dyn Queue>, QueueNotFound> {
        self.queues
            .get(name)
            .cloned()
            .ok_or_else(|| QueueNotFound::new(name))
    }
}
