//! Ports - the seams between the core and its collaborators.
//!
//! The queue backend, the queue lookup, time, id generation and event
//! reporting are all traits here; `impls` has the in-process versions.

pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod queue;
pub mod resolver;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::queue::{Queue, QueueError};
pub use self::resolver::{QueueNotFound, QueueResolver};
