//! Outbound HTTP used by every source

use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use reqwest::StatusCode;
use tracing::debug;

use crate::config::HttpConfig;
use crate::version::error::RegistryError;

/// Status and body of an upstream response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, RegistryError> {
        serde_json::from_str(&self.body).map_err(|e| RegistryError::InvalidResponse(e.to_string()))
    }
}

/// Trait for issuing GET requests with a bounded duration
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Fetches `url`.
    ///
    /// # Returns
    /// * `Ok(HttpResponse)` - Any completed response, including non-success statuses
    /// * `Err(RegistryError::Network)` - Connection failure or timeout
    async fn fetch(&self, url: &str) -> Result<HttpResponse, RegistryError>;
}

/// [`HttpFetcher`] backed by a shared `reqwest::Client`
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<HttpResponse, RegistryError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
