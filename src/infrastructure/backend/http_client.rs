use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::time::Duration;

use crate::domain::DomainError;

/// Stream type for HTTP responses
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, DomainError>> + Send>>;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, DomainError>;

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;

    /// Opens a long-lived response body; no total timeout applies
    async fn get_stream(&self, url: &str) -> Result<ByteStream, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, DomainError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_body = response.text().await.unwrap_or_default();
        Err(DomainError::backend(format!("HTTP {}: {}", status, error_body)))
    }

    async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, DomainError> {
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| DomainError::backend(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, DomainError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DomainError::backend(format!("Request failed: {}", e)))?;

        Self::read_json(response).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::backend(format!("Request failed: {}", e)))?;

        Self::read_json(response).await
    }

    async fn get_stream(&self, url: &str) -> Result<ByteStream, DomainError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "text/event-stream")
            .send()
            .await
            .map_err(|e| DomainError::backend(format!("Request failed: {}", e)))?;

        let stream = Self::check(response).await?.bytes_stream().map(|result| {
            result.map_err(|e| DomainError::backend(format!("Stream error: {}", e)))
        });

        Ok(Box::pin(stream))
    }
}
