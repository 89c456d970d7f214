//! Demo jobs the CLI can seed into its in-process queues.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use jobqueue_core::domain::{JobFault, Message};
use jobqueue_core::ports::Queue;
use jobqueue_core::typed::{Job, TypedJob};

/// Prints a greeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloJob {
    pub name: String,
}

#[async_trait]
impl Job for HelloJob {
    async fn execute(&self, _queue: &dyn Queue, _message: &Message) -> Result<bool, JobFault> {
        println!("Hello, {}!", self.name);
        Ok(true)
    }

    fn label(&self) -> String {
        format!("hello {}", self.name)
    }
}

impl TypedJob for HelloJob {
    const TYPE: &'static str = "demo.hello.v1";
}

/// Raises a fault until it has been attempted `failures + 1` times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlakyJob {
    pub failures: u32,
}

#[async_trait]
impl Job for FlakyJob {
    async fn execute(&self, _queue: &dyn Queue, message: &Message) -> Result<bool, JobFault> {
        let attempt = message.execution_count();
        if attempt <= self.failures {
            return Err(JobFault::new(format!(
                "intentional failure (attempt {attempt} of {})",
                self.failures + 1
            )));
        }
        println!("flaky job succeeded on attempt {attempt}");
        Ok(true)
    }

    fn label(&self) -> String {
        format!("flaky ({} failures)", self.failures)
    }
}

impl TypedJob for FlakyJob {
    const TYPE: &'static str = "demo.flaky.v1";
}
