//! jobqueue-core
//!
//! Building blocks for a persistent job queue worker.
//!
//! # Modules
//! - **domain**: messages, ids, envelopes, retry decisions, outcomes, errors, events
//! - **ports**: `Queue`, `QueueResolver`, `Clock`, `IdGenerator`, `EventSink`
//! - **typed**: the `Job` trait, the job registry and the payload codec
//! - **app**: `JobManager`, `WorkerLoop`, `QueueListing`, `AppBuilder`
//! - **impls**: in-memory queue, queue manager, tracing event sink
//! - **config**: executor and worker settings
//! - **observability**: logging setup

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;
pub mod typed;

#[cfg(test)]
mod testing;

pub use app::{App, AppBuilder, JobManager, QueueListing, WorkerLoop};
pub use config::{ManagerConfig, WorkerOptions};
pub use domain::{Execution, JobExecutionError, JobFault, JobQueueError, Message, MessageId};
pub use typed::{Job, JobTag, TypedJob};
