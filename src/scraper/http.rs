//! Static HTTP fetches via reqwest.

use std::time::Duration;

use crate::error::ScrapeError;

/// Thin wrapper around a shared reqwest client
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Build a client with the configured user agent and timeout
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// GET a page and return its body as text
    pub async fn get(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::fetch(url, e))?;

        if !response.status().is_success() {
            return Err(ScrapeError::fetch(
                url,
                format!("status {}", response.status()),
            ));
        }

        response.text().await.map_err(|e| ScrapeError::fetch(url, e))
    }
}
