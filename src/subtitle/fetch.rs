//! Subtitle fetch by URL

use async_trait::async_trait;

use crate::config::SubtitleConfig;
use crate::error::{PlayerError, Result};

/// Fetches subtitle text from a URL.
///
/// Non-2xx responses and transport failures are the same failure to callers.
#[async_trait]
pub trait SubtitleFetcher: Send + Sync {
    async fn fetch_subtitle(&self, url: &str) -> Result<String>;
}

/// HTTP implementation backed by reqwest
#[derive(Clone)]
pub struct HttpSubtitleFetcher {
    client: reqwest::Client,
}

impl HttpSubtitleFetcher {
    /// Create a fetcher from configuration
    pub fn new(config: &SubtitleConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PlayerError::Config(format!("HTTP client error: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SubtitleFetcher for HttpSubtitleFetcher {
    async fn fetch_subtitle(&self, url: &str) -> Result<String> {
        tracing::debug!("Fetching subtitle from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PlayerError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlayerError::fetch(url, format!("status {}", status)));
        }

        response.text().await.map_err(|e| PlayerError::fetch(url, e))
    }
}
