//! App - the application layer, built on the ports.
//!
//! # Components
//! - **JobManager**: enqueue, peek, count, and one attempt (`wait_and_execute`)
//! - **WorkerLoop**: repeated attempts bounded by count, time or shutdown
//! - **QueueListing**: the list command's view of a queue
//! - **AppBuilder**: registration, fail-fast checks and wiring

pub mod builder;
pub mod manager;
pub mod status;
pub mod worker_loop;

pub use self::builder::{App, AppBuilder, BuildError};
pub use self::manager::{JobManager, Reservation};
pub use self::status::QueueListing;
pub use self::worker_loop::WorkerLoop;
