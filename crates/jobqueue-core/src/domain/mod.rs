//! Domain model (ids, messages, envelopes, decisions, outcomes, errors, events).

pub mod decision;
pub mod envelope;
pub mod errors;
pub mod events;
pub mod ids;
pub mod message;
pub mod outcome;

pub use self::decision::{Decider, Decision, DefaultDecider};
pub use self::envelope::JobEnvelope;
pub use self::errors::{FailureKind, FaultKind, JobExecutionError, JobFault, JobQueueError};
pub use self::events::WorkerEvent;
pub use self::ids::{MessageId, ParseIdError};
pub use self::message::{Message, Payload};
pub use self::outcome::{Execution, PeekedJob, WorkerSummary};
