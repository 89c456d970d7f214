//! EventSink port - where a worker reports what it did.

use crate::domain::WorkerEvent;

/// Receives worker events. Implementations must not fail the worker:
/// emitting is fire-and-forget.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &WorkerEvent);
}
