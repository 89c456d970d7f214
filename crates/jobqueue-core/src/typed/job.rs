//! Job capability and the type tag that makes a job decodable.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{JobFault, Message};
use crate::ports::Queue;

/// A unit of work.
///
/// `execute` gets the queue the message came from and the message itself
/// (with its execution count already bumped for this attempt).
/// - `Ok(true)`: done, the message is retired.
/// - `Ok(false)` or `Err(_)`: failed, subject to the retry policy.
///
/// # Example
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct SendMail { to: String }
///
/// #[async_trait]
/// impl Job for SendMail {
///     async fn execute(&self, _queue: &dyn Queue, _message: &Message) -> Result<bool, JobFault> {
///         mailer::send(&self.to).await.map_err(JobFault::from_error)?;
///         Ok(true)
///     }
/// }
///
/// impl TypedJob for SendMail {
///     const TYPE: &'static str = "acme.mail.send.v1";
/// }
/// ```
#[async_trait]
pub trait Job: JobTag + Send + Sync + 'static {
    async fn execute(&self, queue: &dyn Queue, message: &Message) -> Result<bool, JobFault>;

    /// Human readable description, shown by the list command. Defaults to
    /// the type tag.
    fn label(&self) -> String {
        self.job_type().to_string()
    }
}

/// A job with a stable type tag, stored in every payload it produces.
///
/// # Naming
/// - `{namespace}.{domain}.{action}.v{major}`
/// - e.g. `acme.billing.charge.v1`
pub trait TypedJob: Serialize + DeserializeOwned + Send + Sync + 'static {
    const TYPE: &'static str;
}

/// The type tag, reachable through `dyn Job`.
pub trait JobTag {
    fn job_type(&self) -> &'static str;
}

impl<T: TypedJob> JobTag for T {
    fn job_type(&self) -> &'static str {
        T::TYPE
    }
}
