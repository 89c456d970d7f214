//! Decision model: what to do with a message after a failed attempt.

use super::message::Message;

/// The next action for a message whose attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Submit the message again for another attempt.
    Requeue,

    /// Drop the message; no more attempts.
    Remove,
}

/// Decides the fate of a failed message.
///
/// Deciders are pure: they look at the message (its execution count) and
/// return a decision. Carrying it out (submit or not) is the executor's job.
pub trait Decider: Send + Sync {
    fn decide(&self, message: &Message) -> Decision;

    /// Upper bound reported in failure messages.
    fn max_retries(&self) -> u32;
}

/// Attempt-count based decider.
///
/// - Requeue while `execution_count <= max_retries`
/// - Remove once `execution_count > max_retries`
///
/// With the default of 10 a message gets 11 attempts in total.
#[derive(Debug, Clone)]
pub struct DefaultDecider {
    max_retries: u32,
}

impl DefaultDecider {
    pub const DEFAULT_MAX_RETRIES: u32 = 10;

    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }
}

impl Default for DefaultDecider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRIES)
    }
}

impl Decider for DefaultDecider {
    fn decide(&self, message: &Message) -> Decision {
        if message.execution_count() <= self.max_retries {
            Decision::Requeue
        } else {
            Decision::Remove
        }
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}
