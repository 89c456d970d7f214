//! Outcome model: what one executor call or one worker run produced.

use std::fmt;
use std::sync::Arc;

use super::errors::JobExecutionError;
use super::ids::MessageId;
use crate::typed::{CodecError, Job};

/// Result of `JobManager::wait_and_execute`.
///
/// Timeouts and failed attempts are ordinary values here; only
/// configuration or backend problems are returned as `Err`.
pub enum Execution {
    /// The job ran and reported success. The message is finished.
    Executed {
        message_id: MessageId,
        job: Arc<dyn Job>,
    },

    /// Nothing arrived before the timeout.
    NoMessage,

    /// The attempt failed; the message was requeued or removed.
    Failed(JobExecutionError),
}

impl Execution {
    pub fn is_executed(&self) -> bool {
        matches!(self, Execution::Executed { .. })
    }

    pub fn failure(&self) -> Option<&JobExecutionError> {
        match self {
            Execution::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Debug for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Execution::Executed { message_id, job } => f
                .debug_struct("Executed")
                .field("message_id", message_id)
                .field("job", &job.label())
                .finish(),
            Execution::NoMessage => f.write_str("NoMessage"),
            Execution::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}

/// One entry of `JobManager::peek`.
pub enum PeekedJob {
    Job {
        message_id: Option<MessageId>,
        job: Arc<dyn Job>,
    },
    Undecodable {
        message_id: Option<MessageId>,
        error: CodecError,
    },
}

impl PeekedJob {
    /// Line shown by the list command.
    pub fn label(&self) -> String {
        match self {
            PeekedJob::Job { job, .. } => job.label(),
            PeekedJob::Undecodable { message_id, error } => match message_id {
                Some(id) => format!("<undecodable {id}: {error}>"),
                None => format!("<undecodable: {error}>"),
            },
        }
    }
}

impl fmt::Debug for PeekedJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeekedJob::Job { message_id, job } => f
                .debug_struct("Job")
                .field("message_id", message_id)
                .field("label", &job.label())
                .finish(),
            PeekedJob::Undecodable { message_id, error } => f
                .debug_struct("Undecodable")
                .field("message_id", message_id)
                .field("error", error)
                .finish(),
        }
    }
}

/// Counters for one `WorkerLoop::run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    pub attempts: u64,
    pub executed: u64,
    pub requeued: u64,
    pub removed: u64,
    pub idle: u64,
    pub unexpected: u64,
}

impl WorkerSummary {
    pub fn failed(&self) -> u64 {
        self.requeued + self.removed + self.unexpected
    }
}
