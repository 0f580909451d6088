//! Run backend trait

use std::fmt::Debug;

use async_trait::async_trait;
use futures::stream::BoxStream;

use super::{JobId, JobStatusReport, LogEvent, RunHandle, RunRequest};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Log events of one job; an `Err` item means the connection broke
pub type LogStream = BoxStream<'static, Result<LogEvent, DomainError>>;

/// External service that executes evaluation runs
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RunBackend: Send + Sync + Debug {
    /// Starts a run and returns its job handle
    async fn submit(&self, request: &RunRequest) -> Result<RunHandle, DomainError>;

    async fn status(&self, job_id: &JobId) -> Result<JobStatusReport, DomainError>;

    /// Opens the server-push log stream for a job
    async fn open_log_stream(&self, job_id: &JobId) -> Result<LogStream, DomainError>;
}
