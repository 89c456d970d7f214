//! Errors - faults raised by jobs and failures reported by the executor.

use std::fmt;

use thiserror::Error;

use super::ids::MessageId;
use crate::ports::{QueueError, QueueNotFound};
use crate::typed::CodecError;

/// What went wrong inside one execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The job's `execute` returned an error.
    Failed,
    /// The payload could not be turned back into a job.
    Decode,
    /// The job panicked while executing.
    Panicked,
}

/// A fault raised during an attempt. Kept as the cause of `JobExecutionError`.
#[derive(Debug)]
pub struct JobFault {
    kind: FaultKind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl JobFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::Failed,
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, keeping it in the source chain.
    pub fn from_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind: FaultKind::Failed,
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    pub fn decode(error: CodecError) -> Self {
        Self {
            kind: FaultKind::Decode,
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    pub fn panicked(message: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::Panicked,
            message: message.into(),
            source: None,
        }
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for JobFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FaultKind::Failed => f.write_str(&self.message),
            FaultKind::Decode => write!(f, "undecodable payload: {}", self.message),
            FaultKind::Panicked => write!(f, "job panicked: {}", self.message),
        }
    }
}

impl std::error::Error for JobFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// What happened to a message after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Resubmitted for another attempt.
    Requeued,
    /// Retries exhausted; the message is gone.
    Removed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Requeued => f.write_str("Requeued"),
            FailureKind::Removed => f.write_str("Removed"),
        }
    }
}

/// A failed attempt, after the message has been requeued or retired.
#[derive(Debug, Error)]
#[error(
    "Job execution for \"{message_id}\" failed ({execution_count}/{max_retries} trials) - {kind}"
)]
pub struct JobExecutionError {
    pub kind: FailureKind,
    pub message_id: MessageId,
    pub execution_count: u32,
    pub max_retries: u32,
    #[source]
    pub cause: Option<JobFault>,
}

impl JobExecutionError {
    pub fn is_requeued(&self) -> bool {
        self.kind == FailureKind::Requeued
    }

    pub fn is_removed(&self) -> bool {
        self.kind == FailureKind::Removed
    }
}

/// Errors returned by `JobManager` and `WorkerLoop`.
///
/// Per-job failures are not here: they come back as `Execution::Failed`.
#[derive(Debug, Error)]
pub enum JobQueueError {
    #[error(transparent)]
    QueueNotFound(#[from] QueueNotFound),

    #[error("queue backend error: {0}")]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The attempt failed and the message could not be put back. It is
    /// finished, so it is gone; `failure` keeps the job's fault.
    #[error("{failure}; resubmitting failed: {source}")]
    Resubmit {
        failure: Box<JobExecutionError>,
        #[source]
        source: QueueError,
    },
}

impl JobQueueError {
    /// The failed attempt behind a `Resubmit` error.
    pub fn failure(&self) -> Option<&JobExecutionError> {
        match self {
            JobQueueError::Resubmit { failure, .. } => Some(&**failure),
            _ => None,
        }
    }

    /// Configuration-level failures end a worker; everything else is per attempt.
    pub fn is_fatal(&self) -> bool {
        matches!(self, JobQueueError::QueueNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use ulid::Ulid;

    #[test]
    fn execution_error_message_reports_trials() {
        let id = MessageId::from_ulid(Ulid::new());
        let err = JobExecutionError {
            kind: FailureKind::Requeued,
            message_id: id,
            execution_count: 1,
            max_retries: 10,
            cause: None,
        };
        assert_eq!(
            err.to_string(),
            format!("Job execution for \"{id}\" failed (1/10 trials) - Requeued")
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn execution_error_keeps_fault_as_source() {
        let err = JobExecutionError {
            kind: FailureKind::Removed,
            message_id: MessageId::from_ulid(Ulid::new()),
            execution_count: 11,
            max_retries: 10,
            cause: Some(JobFault::new("disk full")),
        };
        assert!(err.is_removed());
        assert_eq!(err.source().unwrap().to_string(), "disk full");
    }

    #[test]
    fn fault_wraps_underlying_error() {
        let io = std::io::Error::other("connection reset");
        let fault = JobFault::from_error(io);
        assert_eq!(fault.kind(), FaultKind::Failed);
        assert_eq!(fault.source().unwrap().to_string(), "connection reset");
    }

    #[test]
    fn resubmit_error_keeps_failure_and_backend_source() {
        let failure = JobExecutionError {
            kind: FailureKind::Removed,
            message_id: MessageId::from_ulid(Ulid::new()),
            execution_count: 2,
            max_retries: 10,
            cause: Some(JobFault::new("disk full")),
        };
        let err = JobQueueError::Resubmit {
            failure: Box::new(failure),
            source: QueueError::OperationFailed("offline".into()),
        };

        assert!(!err.is_fatal());
        assert_eq!(err.failure().unwrap().cause.as_ref().unwrap().message(), "disk full");
        assert_eq!(err.source().unwrap().to_string(), "operation failed: offline");
        assert!(err.to_string().contains("(2/10 trials) - Removed; resubmitting failed"));
    }

    #[test]
    fn only_missing_queue_is_fatal() {
        let missing = JobQueueError::from(QueueNotFound::new("nope"));
        let backend = JobQueueError::from(QueueError::OperationFailed("boom".into()));
        assert!(missing.is_fatal());
        assert!(!backend.is_fatal());
    }
}
