//! TracingEventSink - worker events as log records.

use tracing::{debug, info, warn};

use crate::domain::WorkerEvent;
use crate::ports::EventSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &WorkerEvent) {
        match event {
            WorkerEvent::Started { queue } => info!(%queue, "worker started"),
            WorkerEvent::Executed {
                queue,
                message_id,
                label,
            } => info!(%queue, %message_id, %label, "job executed"),
            WorkerEvent::Idle { queue } => debug!(%queue, "no message before timeout"),
            WorkerEvent::Failed { queue, error } => {
                let cause = error.cause.as_ref().map(ToString::to_string);
                warn!(
                    %queue,
                    message_id = %error.message_id,
                    kind = %error.kind,
                    execution_count = error.execution_count,
                    max_retries = error.max_retries,
                    cause = cause.as_deref().unwrap_or("-"),
                    "job execution failed"
                );
            }
            WorkerEvent::Unexpected { queue, error } => {
                let cause = error
                    .failure()
                    .and_then(|f| f.cause.as_ref())
                    .map(ToString::to_string);
                warn!(
                    %queue,
                    error = %error,
                    cause = cause.as_deref().unwrap_or("-"),
                    "unexpected error during job execution"
                )
            }
            WorkerEvent::Stopped { queue, summary } => info!(
                %queue,
                attempts = summary.attempts,
                executed = summary.executed,
                failed = summary.failed(),
                "worker stopped"
            ),
        }
    }
}
