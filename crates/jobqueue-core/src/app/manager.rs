//! JobManager - enqueue, inspect, and run one attempt of a queued job.
//!
//! # Attempt flow
//! 1. resolve the queue by name
//! 2. reserve a message (or time out -> `Execution::NoMessage`)
//! 3. bump the message's execution count
//! 4. decode the payload and run the job on its own task
//! 5. `finish` the message, once, whatever happened in 4
//! 6. on failure ask the `Decider`: resubmit (`Requeued`) or drop (`Removed`)

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::status::QueueListing;
use crate::config::ManagerConfig;
use crate::domain::{
    Decider, Decision, DefaultDecider, Execution, FailureKind, JobExecutionError, JobFault,
    JobQueueError, Message, MessageId, PeekedJob,
};
use crate::ports::{Queue, QueueError, QueueResolver};
use crate::typed::{Job, PayloadCodec, TypedJob};

/// A message claimed from a queue, not yet attempted.
pub struct Reservation {
    queue: Arc<dyn Queue>,
    message: Message,
}

/// What one attempt produced, before finish and the retry decision.
enum Attempt {
    Succeeded(Arc<dyn Job>),
    Failed(Option<JobFault>),
}

pub struct JobManager {
    queues: Arc<dyn QueueResolver>,
    codec: Arc<PayloadCodec>,
    decider: Arc<dyn Decider>,
}

impl JobManager {
    pub fn new(
        queues: Arc<dyn QueueResolver>,
        codec: Arc<PayloadCodec>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            queues,
            codec,
            decider: Arc::new(DefaultDecider::new(config.max_retries)),
        }
    }

    /// Replace the retry policy.
    pub fn with_decider(mut self, decider: Arc<dyn Decider>) -> Self {
        self.decider = decider;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.decider.max_retries()
    }

    /// Serialize `job` and submit it as a fresh message.
    pub async fn queue<T: Job + TypedJob>(
        &self,
        queue_name: &str,
        job: &T,
    ) -> Result<MessageId, JobQueueError> {
        let queue = self.queues.resolve(queue_name)?;
        let payload = self.codec.encode(job)?;
        let message_id = queue.submit(Message::new(payload)).await?;
        debug!(queue = queue_name, %message_id, job_type = T::TYPE, "job queued");
        Ok(message_id)
    }

    /// Wait up to `timeout` (forever if `None`) for a message and attempt it.
    pub async fn wait_and_execute(
        &self,
        queue_name: &str,
        timeout: Option<Duration>,
    ) -> Result<Execution, JobQueueError> {
        match self.reserve(queue_name, timeout).await? {
            Some(reservation) => self.execute(reservation).await,
            None => Ok(Execution::NoMessage),
        }
    }

    /// First half of `wait_and_execute`: claim a message without running it.
    ///
    /// Dropping the returned future while it waits loses nothing.
    pub async fn reserve(
        &self,
        queue_name: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<Reservation>, JobQueueError> {
        let queue = self.queues.resolve(queue_name)?;
        let message = queue.wait_and_reserve(timeout).await?;
        Ok(message.map(|message| Reservation { queue, message }))
    }

    /// Second half of `wait_and_execute`: attempt a reserved message.
    pub async fn execute(&self, reservation: Reservation) -> Result<Execution, JobQueueError> {
        let Reservation { queue, mut message } = reservation;
        let Some(message_id) = message.identifier() else {
            // still hand the reservation back before giving up on it
            if let Err(err) = queue.finish(&message).await {
                warn!(queue = queue.name(), %err, "finish failed for message without identifier");
            }
            return Err(QueueError::MissingIdentifier.into());
        };
        let execution_count = message.count_execution();
        debug!(queue = queue.name(), %message_id, execution_count, "attempting job");

        let attempt = self.attempt(&queue, &message).await;

        // release the reservation before deciding anything
        queue.finish(&message).await?;

        let cause = match attempt {
            Attempt::Succeeded(job) => {
                info!(queue = queue.name(), %message_id, label = %job.label(), "job executed");
                return Ok(Execution::Executed { message_id, job });
            }
            Attempt::Failed(cause) => cause,
        };

        let decision = self.decider.decide(&message);
        let mut error = JobExecutionError {
            kind: FailureKind::Removed,
            message_id,
            execution_count,
            max_retries: self.decider.max_retries(),
            cause,
        };

        if decision == Decision::Requeue {
            if let Err(source) = queue.submit(message).await {
                warn!(queue = queue.name(), %message_id, %source, "{error}; resubmitting failed");
                return Err(JobQueueError::Resubmit {
                    failure: Box::new(error),
                    source,
                });
            }
            error.kind = FailureKind::Requeued;
        }

        warn!(queue = queue.name(), %message_id, kind = %error.kind, "{error}");
        Ok(Execution::Failed(error))
    }

    /// Decode and run the job. Faults, `false`, panics and decode errors all
    /// come back as `Attempt::Failed`.
    async fn attempt(&self, queue: &Arc<dyn Queue>, message: &Message) -> Attempt {
        let job = match self.codec.decode(message.payload()) {
            Ok(job) => job,
            Err(err) => return Attempt::Failed(Some(JobFault::decode(err))),
        };

        let handle = tokio::spawn({
            let job = Arc::clone(&job);
            let queue = Arc::clone(queue);
            let message = message.clone();
            async move { job.execute(queue.as_ref(), &message).await }
        });

        match handle.await {
            Ok(Ok(true)) => Attempt::Succeeded(job),
            Ok(Ok(false)) => Attempt::Failed(None),
            Ok(Err(fault)) => Attempt::Failed(Some(fault)),
            Err(join_err) if join_err.is_panic() => {
                let reason = panic_reason(join_err.into_panic());
                Attempt::Failed(Some(JobFault::panicked(reason)))
            }
            Err(join_err) => Attempt::Failed(Some(JobFault::new(join_err.to_string()))),
        }
    }

    /// Decode up to `limit` visible messages without reserving them.
    pub async fn peek(
        &self,
        queue_name: &str,
        limit: usize,
    ) -> Result<Vec<PeekedJob>, JobQueueError> {
        let queue = self.queues.resolve(queue_name)?;
        let messages = queue.peek(limit).await?;
        let peeked = messages
            .into_iter()
            .map(|message| {
                let message_id = message.identifier();
                match self.codec.decode(message.payload()) {
                    Ok(job) => PeekedJob::Job { message_id, job },
                    Err(error) => {
                        warn!(queue = queue_name, ?message_id, %error, "cannot decode peeked message");
                        PeekedJob::Undecodable { message_id, error }
                    }
                }
            })
            .collect();
        Ok(peeked)
    }

    pub async fn count(&self, queue_name: &str) -> Result<usize, JobQueueError> {
        let queue = self.queues.resolve(queue_name)?;
        Ok(queue.count().await?)
    }

    /// `peek` + `count`, shaped for the list command.
    pub async fn list(&self, queue_name: &str, limit: usize) -> Result<QueueListing, JobQueueError> {
        let peeked = self.peek(queue_name, limit).await?;
        let total = self.count(queue_name).await?;
        Ok(QueueListing::new(
            queue_name,
            peeked.iter().map(PeekedJob::label).collect(),
            total,
        ))
    }
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
