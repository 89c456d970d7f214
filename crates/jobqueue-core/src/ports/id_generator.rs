//! IdGenerator port - message identifier generation.

use crate::domain::ids::MessageId;
use crate::ports::Clock;
use ulid::Ulid;

/// Generates identifiers for newly submitted messages.
///
/// ULIDs sort by creation time and need no coordination between workers.
pub trait IdGenerator: Send + Sync {
    fn generate_message_id(&self) -> MessageId;
}

/// ULID generator driven by a `Clock`, so tests can pin the timestamp part.
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_message_id(&self) -> MessageId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        MessageId::from(ulid)
    }
}
