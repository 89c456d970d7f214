//! Events - what a worker reports while it runs.

use super::errors::{JobExecutionError, JobQueueError};
use super::ids::MessageId;
use super::outcome::WorkerSummary;

/// Events emitted by `WorkerLoop` to its `EventSink`.
#[derive(Debug)]
pub enum WorkerEvent {
    Started {
        queue: String,
    },
    Executed {
        queue: String,
        message_id: MessageId,
        label: String,
    },
    /// A wait ended without a message.
    Idle {
        queue: String,
    },
    /// An attempt failed; the message was requeued or removed.
    Failed {
        queue: String,
        error: JobExecutionError,
    },
    /// Anything else that went wrong in one iteration (backend errors, ...).
    Unexpected {
        queue: String,
        error: JobQueueError,
    },
    Stopped {
        queue: String,
        summary: WorkerSummary,
    },
}
