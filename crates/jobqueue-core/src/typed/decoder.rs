//! Type-erased decoders: payload JSON -> `Arc<dyn Job>`.
//!
//! `TypedDecoder<T>` knows the concrete type; `DynDecoder` hides it so
//! decoders for different job types fit in one map.

use std::marker::PhantomData;
use std::sync::Arc;

use super::codec::CodecError;
use super::job::{Job, TypedJob};

/// Object-safe decoder for one job type.
pub trait DynDecoder: Send + Sync {
    fn decode(&self, job: serde_json::Value) -> Result<Arc<dyn Job>, CodecError>;
    fn job_type(&self) -> &'static str;
}

pub struct TypedDecoder<T: Job + TypedJob> {
    _marker: PhantomData<T>,
}

impl<T: Job + TypedJob> TypedDecoder<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Job + TypedJob> Default for TypedDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Job + TypedJob> DynDecoder for TypedDecoder<T> {
    fn decode(&self, job: serde_json::Value) -> Result<Arc<dyn Job>, CodecError> {
        let job: T = serde_json::from_value(job).map_err(|source| CodecError::InvalidJob {
            job_type: T::TYPE.to_string(),
            source,
        })?;
        Ok(Arc::new(job))
    }

    fn job_type(&self) -> &'static str {
        T::TYPE
    }
}
