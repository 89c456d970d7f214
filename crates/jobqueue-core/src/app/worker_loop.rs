//! WorkerLoop - repeated attempts against one queue.
//!
//! The loop body always runs at least once. After each attempt it checks the
//! attempt limit and the time budget; with neither set it runs until the
//! shutdown signal (if any) fires.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::Instant;

use super::manager::{JobManager, Reservation};
use crate::config::WorkerOptions;
use crate::domain::{Execution, FailureKind, JobQueueError, WorkerEvent, WorkerSummary};
use crate::impls::TracingEventSink;
use crate::ports::EventSink;

pub struct WorkerLoop {
    manager: Arc<JobManager>,
    options: WorkerOptions,
    events: Arc<dyn EventSink>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl WorkerLoop {
    pub fn new(manager: Arc<JobManager>, options: WorkerOptions) -> Self {
        Self {
            manager,
            options,
            events: Arc::new(TracingEventSink),
            shutdown: None,
        }
    }

    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Stop taking new messages once `true` is sent. A job that is already
    /// running is allowed to finish.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Run attempts against `queue_name` until a bound is reached.
    ///
    /// A missing queue ends the loop with `Err`. Any other error is reported
    /// as `WorkerEvent::Unexpected` and the loop carries on.
    pub async fn run(&self, queue_name: &str) -> Result<WorkerSummary, JobQueueError> {
        // a budget too large to represent is no budget at all
        let deadline = self
            .options
            .max_time
            .and_then(|max| Instant::now().checked_add(max));
        let mut shutdown = self.shutdown.clone();
        let mut summary = WorkerSummary::default();

        self.events.emit(&WorkerEvent::Started {
            queue: queue_name.to_string(),
        });

        loop {
            if shutdown.as_ref().is_some_and(|rx| *rx.borrow()) {
                break;
            }

            let timeout = deadline.map(|end| end.saturating_duration_since(Instant::now()));
            let Some(reserved) = self.reserve_or_stop(queue_name, timeout, &mut shutdown).await
            else {
                break;
            };
            summary.attempts += 1;

            let result = match reserved {
                Ok(Some(reservation)) => self.manager.execute(reservation).await,
                Ok(None) => Ok(Execution::NoMessage),
                Err(err) => Err(err),
            };
            self.record(queue_name, result, &mut summary)?;

            if !self.should_continue(&summary, deadline) {
                break;
            }
        }

        self.events.emit(&WorkerEvent::Stopped {
            queue: queue_name.to_string(),
            summary,
        });
        Ok(summary)
    }

    /// Wait for a message, or return `None` if shutdown fires first.
    async fn reserve_or_stop(
        &self,
        queue_name: &str,
        timeout: Option<std::time::Duration>,
        shutdown: &mut Option<watch::Receiver<bool>>,
    ) -> Option<Result<Option<Reservation>, JobQueueError>> {
        let reserve = self.manager.reserve(queue_name, timeout);
        match shutdown {
            Some(rx) => tokio::select! {
                result = reserve => Some(result),
                _ = shutdown_requested(rx) => None,
            },
            None => Some(reserve.await),
        }
    }

    fn record(
        &self,
        queue_name: &str,
        result: Result<Execution, JobQueueError>,
        summary: &mut WorkerSummary,
    ) -> Result<(), JobQueueError> {
        let queue = queue_name.to_string();
        let event = match result {
            Ok(Execution::Executed { message_id, job }) => {
                summary.executed += 1;
                WorkerEvent::Executed {
                    queue,
                    message_id,
                    label: job.label(),
                }
            }
            Ok(Execution::NoMessage) => {
                summary.idle += 1;
                WorkerEvent::Idle { queue }
            }
            Ok(Execution::Failed(error)) => {
                match error.kind {
                    FailureKind::Requeued => summary.requeued += 1,
                    FailureKind::Removed => summary.removed += 1,
                }
                WorkerEvent::Failed { queue, error }
            }
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => {
                summary.unexpected += 1;
                WorkerEvent::Unexpected { queue, error }
            }
        };
        self.events.emit(&event);
        Ok(())
    }

    fn should_continue(&self, summary: &WorkerSummary, deadline: Option<Instant>) -> bool {
        let under_limit = self
            .options
            .limit
            .is_none_or(|limit| summary.attempts < limit);
        let in_time = deadline.is_none_or(|end| Instant::now() < end);
        under_limit && in_time
    }
}

/// Resolves once `true` is observed. A dropped sender never resolves.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Message, MessageId, Payload};
    use crate::ports::{Queue, QueueError};
    use crate::testing::{CountingJob, spy_manager};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Keeps every event for inspection.
    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn kinds(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl EventSink for RecordingSink {
        fn emit(&self, event: &WorkerEvent) {
            let kind = match event {
                WorkerEvent::Started { .. } => "started",
                WorkerEvent::Executed { .. } => "executed",
                WorkerEvent::Idle { .. } => "idle",
                WorkerEvent::Failed { .. } => "failed",
                WorkerEvent::Unexpected { .. } => "unexpected",
                WorkerEvent::Stopped { .. } => "stopped",
            };
            self.events.lock().unwrap().push(kind.to_string());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn limit_bounds_number_of_attempts() {
        let (manager, queue) = spy_manager();
        for name in ["a", "b", "c", "d", "e"] {
            manager.queue("q", &CountingJob::succeeding(name)).await.unwrap();
        }

        let worker = WorkerLoop::new(manager.clone(), WorkerOptions::new(3, 0));
        let summary = worker.run("q").await.unwrap();

        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.executed, 3);
        assert_eq!(queue.finishes(), 3);
        assert_eq!(manager.count("q").await.unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn max_time_on_empty_queue_waits_out_the_budget() {
        let (manager, _queue) = spy_manager();
        let started = Instant::now();

        let worker = WorkerLoop::new(manager, WorkerOptions::new(0, 5));
        let summary = worker.run("q").await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(5));
        assert!(started.elapsed() < Duration::from_secs(6));
        assert_eq!(summary.executed, 0);
        assert_eq!(summary.attempts, summary.idle);
    }

    #[tokio::test(start_paused = true)]
    async fn huge_max_time_does_not_overflow() {
        let (manager, _queue) = spy_manager();
        manager.queue("q", &CountingJob::succeeding("x")).await.unwrap();

        let worker = WorkerLoop::new(manager, WorkerOptions::new(1, u64::MAX));
        let summary = worker.run("q").await.unwrap();

        assert_eq!(summary.attempts, 1);
        assert_eq!(summary.executed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn body_runs_once_even_when_budget_is_tiny() {
        let (manager, _queue) = spy_manager();

        let worker = WorkerLoop::new(
            manager,
            WorkerOptions::default().with_max_time(Duration::from_millis(1)),
        );
        let summary = worker.run("q").await.unwrap();

        assert_eq!(summary.attempts, 1);
        assert_eq!(summary.idle, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_stop_the_loop() {
        let (manager, _queue) = spy_manager();
        manager.queue("q", &CountingJob::failing("bad")).await.unwrap();
        manager.queue("q", &CountingJob::succeeding("good")).await.unwrap();
        let sink = Arc::new(RecordingSink::default());

        let worker = WorkerLoop::new(manager, WorkerOptions::new(3, 0)).with_event_sink(sink.clone());
        let summary = worker.run("q").await.unwrap();

        // bad (requeued), good, bad again
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.executed, 1);
        assert_eq!(summary.requeued, 2);
        assert_eq!(
            sink.kinds(),
            vec!["started", "failed", "executed", "failed", "stopped"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn undecodable_message_is_reported_and_loop_continues() {
        let (manager, queue) = spy_manager();
        queue.seed(Payload::new("junk"), 10).await;
        manager.queue("q", &CountingJob::succeeding("after")).await.unwrap();

        let worker = WorkerLoop::new(manager.clone(), WorkerOptions::new(2, 0));
        let summary = worker.run("q").await.unwrap();

        assert_eq!(summary.removed, 1);
        assert_eq!(summary.executed, 1);
        assert_eq!(manager.count("q").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_queue_ends_the_loop() {
        let (manager, _queue) = spy_manager();

        let worker = WorkerLoop::new(manager, WorkerOptions::new(3, 0));
        let err = worker.run("nope").await.unwrap_err();

        assert!(err.is_fatal());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_an_idle_wait() {
        let (manager, _queue) = spy_manager();
        let (tx, rx) = watch::channel(false);

        let worker = WorkerLoop::new(manager, WorkerOptions::default()).with_shutdown(rx);
        let handle = tokio::spawn(async move { worker.run("q").await });

        tokio::time::sleep(Duration::from_secs(30)).await;
        tx.send(true).unwrap();

        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.attempts, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_before_start_runs_nothing() {
        let (manager, queue) = spy_manager();
        manager.queue("q", &CountingJob::succeeding("x")).await.unwrap();
        let (_tx, rx) = watch::channel(true);

        let worker = WorkerLoop::new(manager, WorkerOptions::default()).with_shutdown(rx);
        let summary = worker.run("q").await.unwrap();

        assert_eq!(summary.attempts, 0);
        assert_eq!(queue.finishes(), 0);
    }

    /// Fails every reservation with a backend error.
    struct BrokenQueue;

    #[async_trait::async_trait]
    impl Queue for BrokenQueue {
        fn name(&self) -> &str {
            "broken"
        }

        async fn submit(&self, _message: Message) -> Result<MessageId, QueueError> {
            Err(QueueError::OperationFailed("offline".into()))
        }

        async fn wait_and_reserve(
            &self,
            _timeout: Option<Duration>,
        ) -> Result<Option<Message>, QueueError> {
            Err(QueueError::OperationFailed("offline".into()))
        }

        async fn finish(&self, _message: &Message) -> Result<bool, QueueError> {
            Ok(false)
        }

        async fn peek(&self, _limit: usize) -> Result<Vec<Message>, QueueError> {
            Ok(Vec::new())
        }

        async fn count(&self) -> Result<usize, QueueError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn backend_errors_are_reported_not_fatal() {
        let queues = crate::impls::QueueManager::new().with_queue(Arc::new(BrokenQueue));
        let manager = JobManager::new(
            Arc::new(queues),
            crate::testing::codec(),
            crate::config::ManagerConfig::default(),
        );
        let sink = Arc::new(RecordingSink::default());

        let worker = WorkerLoop::new(Arc::new(manager), WorkerOptions::new(2, 0))
            .with_event_sink(sink.clone());
        let summary = worker.run("broken").await.unwrap();

        assert_eq!(summary.unexpected, 2);
        assert_eq!(
            sink.kinds(),
            vec!["started", "unexpected", "unexpected", "stopped"]
        );
    }
}
