//! HTTP transport to the ingredient backend.
//!
//! The adapter normalizes the three backend calls (health, search, validate)
//! into typed results and owns nothing else: state transitions belong to the
//! sessions that issued the call. Non-2xx statuses, connection failures, and
//! undecodable bodies all surface as [`TransportError`]; there are no
//! retries.

use crate::model::{
    HealthResponse, SearchResponse, SearchResultItem, ValidateRequest, ValidateResponse,
};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Backend error: {0}")]
    Status(u16),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Resolves a report reference returned by the backend against its base
/// address. The artifact is never fetched eagerly; this only builds the link.
pub fn resolve_report_url(base_url: &str, report_ref: &str) -> String {
    format!("{}{}", base_url, report_ref)
}

/// The backend surface the sessions are driven against.
///
/// `HttpBackend` is the production implementation; tests substitute fakes.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn health(&self) -> Result<bool>;
    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>>;
    async fn validate(&self, request: &ValidateRequest) -> Result<ValidateResponse>;
}

/// HTTP client for the ingredient backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    /// The base URL of the backend (e.g., "http://localhost:8000")
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpBackend {
    /// Creates a new backend client with the specified base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Creates a backend client whose requests fail after `timeout` instead
    /// of waiting indefinitely.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the download link for a report reference from a validation
    /// response.
    pub fn report_url(&self, report_ref: &str) -> String {
        resolve_report_url(&self.base_url, report_ref)
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.http_client.get(&url).send().await?;
        let health: HealthResponse = Self::decode(response).await?;
        debug!(ok = health.ok, "health probe completed");
        Ok(health.ok)
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("query", query)])
            .send()
            .await?;
        let search: SearchResponse = Self::decode(response).await?;
        debug!(query, hits = search.results.len(), "search completed");
        Ok(search.results)
    }

    async fn validate(&self, request: &ValidateRequest) -> Result<ValidateResponse> {
        let url = format!("{}/validate", self.base_url);
        let response = self.http_client.post(&url).json(request).send().await?;
        let validation: ValidateResponse = Self::decode(response).await?;
        debug!(
            formulation = %request.name,
            verdicts = validation.results.len(),
            "validation completed"
        );
        Ok(validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message_carries_code() {
        let err = TransportError::Status(503);
        assert_eq!(err.to_string(), "Backend error: 503");
    }

    #[test]
    fn test_decode_error_display() {
        let json_err = serde_json::from_str::<HealthResponse>("not json").unwrap_err();
        let err = TransportError::from(json_err);
        assert!(err.to_string().starts_with("Failed to decode backend response"));
    }

    #[test]
    fn test_report_url_resolution() {
        let backend = HttpBackend::new("http://localhost:8000");
        assert_eq!(
            backend.report_url("/reports/cream.pdf"),
            "http://localhost:8000/reports/cream.pdf"
        );
    }
}
