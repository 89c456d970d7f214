//! PayloadCodec - jobs to payloads and back.
//!
//! Encoding wraps the job in a `JobEnvelope` tagged with `T::TYPE`.
//! Decoding reads the tag and hands the job state to the registered
//! decoder; anything unregistered is refused.

use std::sync::Arc;

use super::job::{Job, TypedJob};
use super::registry::JobRegistry;
use crate::domain::{JobEnvelope, Payload};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("job type '{0}' is not registered")]
    UnknownJobType(String),

    #[error("failed to serialize job of type '{job_type}': {source}")]
    Serialize {
        job_type: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed payload envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    #[error("invalid state for job type '{job_type}': {source}")]
    InvalidJob {
        job_type: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct PayloadCodec {
    registry: Arc<JobRegistry>,
}

impl PayloadCodec {
    pub fn new(registry: Arc<JobRegistry>) -> Self {
        Self { registry }
    }

    /// Only registered types can be encoded, so every payload written can be read back.
    pub fn encode<T: TypedJob>(&self, job: &T) -> Result<Payload, CodecError> {
        if !self.registry.contains(T::TYPE) {
            return Err(CodecError::UnknownJobType(T::TYPE.to_string()));
        }
        let serialize_err = |source| CodecError::Serialize {
            job_type: T::TYPE.to_string(),
            source,
        };
        let state = serde_json::to_value(job).map_err(serialize_err)?;
        let envelope = JobEnvelope::new(T::TYPE, state);
        let raw = serde_json::to_string(&envelope).map_err(serialize_err)?;
        Ok(Payload::new(raw))
    }

    pub fn decode(&self, payload: &Payload) -> Result<Arc<dyn Job>, CodecError> {
        let envelope: JobEnvelope =
            serde_json::from_str(payload.as_str()).map_err(CodecError::MalformedEnvelope)?;
        let decoder = self
            .registry
            .get(envelope.job_type())
            .ok_or_else(|| CodecError::UnknownJobType(envelope.job_type().to_string()))?;
        decoder.decode(envelope.into_job())
    }
}
