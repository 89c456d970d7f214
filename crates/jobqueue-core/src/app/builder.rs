//! AppBuilder - wiring job types, queues and settings into an `App`.
//!
//! `build()` fails fast: every job type named in `expect_jobs` must have been
//! registered, and a queue resolver must be present.

use std::sync::Arc;

use super::manager::JobManager;
use super::worker_loop::WorkerLoop;
use crate::config::{ManagerConfig, WorkerOptions};
use crate::ports::QueueResolver;
use crate::typed::{Job, JobRegistry, PayloadCodec, RegistryError, TypedJob};

/// ```ignore
/// let app = AppBuilder::new()
///     .register::<SendEmail>()?
///     .expect_jobs(&["mail.send_email.v1"])
///     .queues(Arc::new(QueueManager::new().with_queue(Arc::new(InMemoryQueue::new("emails")))))
///     .build()?;
/// app.manager().queue("emails", &SendEmail { .. }).await?;
/// ```
pub struct AppBuilder {
    registry: JobRegistry,
    expected_jobs: Option<Vec<String>>,
    queues: Option<Arc<dyn QueueResolver>>,
    config: ManagerConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing job types: {0:?}. These jobs were expected but not registered.")]
    MissingJobTypes(Vec<String>),

    #[error("No queue resolver configured")]
    MissingQueues,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            registry: JobRegistry::new(),
            expected_jobs: None,
            queues: None,
            config: ManagerConfig::default(),
        }
    }

    pub fn register<T: Job + TypedJob>(mut self) -> Result<Self, RegistryError> {
        self.registry.register::<T>()?;
        Ok(self)
    }

    /// Job types that must be registered before `build()` succeeds.
    pub fn expect_jobs(mut self, job_types: &[&str]) -> Self {
        self.expected_jobs = Some(job_types.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn queues(mut self, queues: Arc<dyn QueueResolver>) -> Self {
        self.queues = Some(queues);
        self
    }

    pub fn config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        if let Some(expected) = &self.expected_jobs {
            let registered = self.registry.registered_types();
            let missing: Vec<String> = expected
                .iter()
                .filter(|job_type| !registered.contains(job_type))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingJobTypes(missing));
            }
        }

        let queues = self.queues.ok_or(BuildError::MissingQueues)?;
        let codec = Arc::new(PayloadCodec::new(Arc::new(self.registry)));
        let manager = JobManager::new(queues, codec, self.config);
        Ok(App {
            manager: Arc::new(manager),
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A wired-up job manager and a way to start workers on it.
pub struct App {
    manager: Arc<JobManager>,
}

impl App {
    pub fn manager(&self) -> &Arc<JobManager> {
        &self.manager
    }

    pub fn worker(&self, options: WorkerOptions) -> WorkerLoop {
        WorkerLoop::new(Arc::clone(&self.manager), options)
    }
}
