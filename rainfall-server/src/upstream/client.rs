//! Flood-monitoring HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{ReadingCountLimit, StationId};

use super::error::UpstreamError;

/// Default base URL for the Environment Agency flood-monitoring API.
pub(crate) const DEFAULT_BASE_URL: &str = "https://environment.data.gov.uk/flood-monitoring";

/// Raw result of one upstream GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Fetches raw readings for a station.
///
/// Implementations make exactly one request per call and do not retry.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn fetch_readings(
        &self,
        station: &StationId,
        limit: ReadingCountLimit,
    ) -> Result<UpstreamResponse, UpstreamError>;
}

/// Configuration for the flood-monitoring client.
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds (reqwest's default when unset)
    pub timeout_secs: Option<u64>,
}

impl EnvironmentConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the flood-monitoring readings endpoint.
#[derive(Debug, Clone)]
pub struct EnvironmentClient {
    http: reqwest::Client,
    base_url: String,
}

impl EnvironmentClient {
    /// Create a new client with the given configuration.
    pub fn new(config: EnvironmentConfig) -> Result<Self, UpstreamError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(UpstreamError::Config {
                message: "base URL must not be empty".to_string(),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Self { http, base_url })
    }

    /// URL of the readings endpoint for a station.
    fn readings_url(&self, station: &StationId, limit: ReadingCountLimit) -> String {
        format!(
            "{}/id/stations/{}/readings?_sorted&_limit={}",
            self.base_url, station, limit
        )
    }
}

#[async_trait]
impl UpstreamClient for EnvironmentClient {
    async fn fetch_readings(
        &self,
        station: &StationId,
        limit: ReadingCountLimit,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.readings_url(station, limit);
        debug!(%url, "fetching readings from upstream");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        // Only 2xx bodies are read; error statuses pass through with an empty body
        if !status.is_success() {
            debug!(%station, status = status.as_u16(), "upstream returned error status");
            return Ok(UpstreamResponse::new(status.as_u16(), ""));
        }

        let body = response.text().await?;
        debug!(%station, status = status.as_u16(), bytes = body.len(), "upstream responded");

        Ok(UpstreamResponse::new(status.as_u16(), body))
    }
}
