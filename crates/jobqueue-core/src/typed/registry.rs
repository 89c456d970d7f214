//! JobRegistry - the set of job types this process can decode.

use std::collections::HashMap;
use std::sync::Arc;

use super::decoder::{DynDecoder, TypedDecoder};
use super::job::{Job, TypedJob};

/// Maps type tags to decoders. Built at startup, read-only afterwards.
///
/// # Example
/// ```ignore
/// let mut registry = JobRegistry::new();
/// registry.register::<SendMail>()?;
/// let decoder = registry.get("acme.mail.send.v1");
/// ```
#[derive(Default)]
pub struct JobRegistry {
    decoders: HashMap<String, Arc<dyn DynDecoder>>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Job type '{0}' is already registered")]
    AlreadyRegistered(String),
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    pub fn register<T: Job + TypedJob>(&mut self) -> Result<(), RegistryError> {
        let job_type = T::TYPE.to_string();
        if self.decoders.contains_key(&job_type) {
            return Err(RegistryError::AlreadyRegistered(job_type));
        }
        self.decoders
            .insert(job_type, Arc::new(TypedDecoder::<T>::new()));
        Ok(())
    }

    pub fn get(&self, job_type: &str) -> Option<Arc<dyn DynDecoder>> {
        self.decoders.get(job_type).cloned()
    }

    pub fn contains(&self, job_type: &str) -> bool {
        self.decoders.contains_key(job_type)
    }

    /// Registered tags, sorted.
    pub fn registered_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.decoders.keys().cloned().collect();
        types.sort();
        types
    }
}
