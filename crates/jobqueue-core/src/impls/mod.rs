//! Impls - in-process implementations of the ports.
//!
//! - **InMemoryQueue**: development / test queue backend
//! - **QueueManager**: `QueueResolver` over a fixed set of queues
//! - **TracingEventSink**: worker events to `tracing`

pub mod inmem_queue;
pub mod queue_manager;
pub mod tracing_sink;

pub use self::inmem_queue::{InMemoryQueue, QueueCounts};
pub use self::queue_manager::QueueManager;
pub use self::tracing_sink::TracingEventSink;
