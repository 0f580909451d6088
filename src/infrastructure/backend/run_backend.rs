//! Run backend over the evaluation service's HTTP API

use async_trait::async_trait;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::http_client::HttpClientTrait;
use super::sse::sse_data_stream;
use crate::domain::run::{JobId, JobStatusReport, LogEvent, LogStream, RunBackend, RunHandle, RunRequest};
use crate::domain::DomainError;

/// Talks to `POST /runs`, `GET /runs/{id}` and `GET /runs/{id}/logs`
#[derive(Debug)]
pub struct HttpRunBackend<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> HttpRunBackend<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn runs_url(&self) -> String {
        format!("{}/runs", self.base_url)
    }

    fn job_url(&self, job_id: &JobId) -> String {
        format!("{}/runs/{}", self.base_url, job_id)
    }
}

pub(super) fn decode<T: DeserializeOwned>(
    value: serde_json::Value,
    what: &str,
) -> Result<T, DomainError> {
    serde_json::from_value(value)
        .map_err(|e| DomainError::backend(format!("Unexpected {} response: {}", what, e)))
}

#[async_trait]
impl<C: HttpClientTrait> RunBackend for HttpRunBackend<C> {
    #[instrument(skip(self, request), fields(name = ?request.name))]
    async fn submit(&self, request: &RunRequest) -> Result<RunHandle, DomainError> {
        let body = serde_json::to_value(request)
            .map_err(|e| DomainError::internal(format!("Failed to encode run request: {}", e)))?;

        let response = self.client.post_json(&self.runs_url(), &body).await?;
        let handle: RunHandle = decode(response, "submit")?;

        debug!(job_id = %handle.job_id, "Run accepted by backend");
        Ok(handle)
    }

    async fn status(&self, job_id: &JobId) -> Result<JobStatusReport, DomainError> {
        let response = self.client.get_json(&self.job_url(job_id)).await?;
        decode(response, "status")
    }

    #[instrument(skip(self))]
    async fn open_log_stream(&self, job_id: &JobId) -> Result<LogStream, DomainError> {
        let url = format!("{}/logs", self.job_url(job_id));
        let body = self.client.get_stream(&url).await?;

        let events = sse_data_stream(body).map(|item| item.map(|data| LogEvent::from_payload(&data)));
        Ok(events.boxed())
    }
}
