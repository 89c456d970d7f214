//! Configuration for the executor and the worker loop.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DefaultDecider;

/// Executor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// A failed message is requeued while its execution count is at most this.
    pub max_retries: u32,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            max_retries: DefaultDecider::DEFAULT_MAX_RETRIES,
        }
    }
}

/// Stopping conditions for `WorkerLoop`. With neither set the loop runs forever.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerOptions {
    /// Stop after this many attempts (success or failure).
    pub limit: Option<u64>,

    /// Stop once this much wall-clock time has passed since the loop started.
    #[serde(with = "opt_secs")]
    pub max_time: Option<Duration>,
}

impl WorkerOptions {
    /// Zero means "not set" for both bounds, as on the command line.
    pub fn new(limit: u64, max_time_secs: u64) -> Self {
        Self {
            limit: (limit > 0).then_some(limit),
            max_time: (max_time_secs > 0).then(|| Duration::from_secs(max_time_secs)),
        }
    }

    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = (!max_time.is_zero()).then_some(max_time);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.limit.is_none() && self.max_time.is_none()
    }
}

/// `Option<Duration>` as whole seconds.
mod opt_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<u64>::deserialize(d)?;
        Ok(secs.filter(|s| *s > 0).map(Duration::from_secs))
    }
}
