//! Results source trait

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use super::{group_by_experiment, Report, ResultGroup, ResultSummary};
use crate::domain::DomainError;

/// Finished evaluation reports
#[async_trait]
pub trait ResultsSource: Send + Sync + Debug {
    /// Summaries of every readable report, newest first
    async fn list(&self) -> Result<Vec<ResultSummary>, DomainError>;

    /// Full report document by experiment id or directory name
    async fn get_raw(&self, id: &str) -> Result<Option<Value>, DomainError>;

    async fn get(&self, id: &str) -> Result<Option<Report>, DomainError> {
        match self.get_raw(id).await? {
            Some(raw) => serde_json::from_value(raw)
                .map(Some)
                .map_err(|e| DomainError::storage(format!("Malformed report '{}': {}", id, e))),
            None => Ok(None),
        }
    }

    async fn grouped(&self) -> Result<Vec<ResultGroup>, DomainError> {
        Ok(group_by_experiment(self.list().await?))
    }
}
