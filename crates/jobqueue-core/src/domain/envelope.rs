//! JobEnvelope - the serialized form of a job inside a payload.
//!
//! Shape: `{"type": "<type tag>", "job": <job state>}`. The type tag picks
//! the registered decoder, so only known job types are ever materialized.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEnvelope {
    #[serde(rename = "type")]
    job_type: String,
    job: serde_json::Value,
}

impl JobEnvelope {
    pub fn new(job_type: impl Into<String>, job: serde_json::Value) -> Self {
        Self {
            job_type: job_type.into(),
            job,
        }
    }

    pub fn job_type(&self) -> &str {
        &self.job_type
    }

    pub fn into_job(self) -> serde_json::Value {
        self.job
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_uses_type_and_job_keys() {
        let env = JobEnvelope::new("demo.hello.v1", serde_json::json!({"name": "world"}));
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["type"], "demo.hello.v1");
        assert_eq!(v["job"]["name"], "world");
    }
}
