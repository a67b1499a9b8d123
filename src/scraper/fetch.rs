//! Source fetch strategies: static HTTP GET vs rendered browser session.
//!
//! One [`SourceFetcher`] is created per scraping invocation and torn down
//! around it. The strategy is picked at configuration time; callers never
//! hardcode one.

use chromiumoxide::page::Page;
use std::time::Duration;
use tracing::debug;

use crate::config::{FetchMode, ScraperConfig};
use crate::error::ScrapeError;
use crate::retry::{retry, RetryConfig};
use crate::scraper::browser::Browser;
use crate::scraper::http::HttpClient;

/// Readiness condition polled on rendered pages before the DOM is trusted
#[derive(Debug, Clone)]
pub enum Readiness {
    /// Script tags are present (listing and competition pages)
    ScriptTags,
    /// A specific CSS selector matches (odds containers)
    Selector(String),
}

impl Readiness {
    pub fn selector(&self) -> &str {
        match self {
            Readiness::ScriptTags => "script",
            Readiness::Selector(s) => s,
        }
    }
}

/// Fetched content: serialized HTML plus, in rendered mode, the live page
/// handle so the caller can re-navigate and re-check identity.
pub struct RawContent {
    pub html: String,
    pub page: Option<Page>,
}

/// Interchangeable fetch strategies behind one interface
pub enum SourceFetcher {
    Static(HttpClient),
    Rendered(Browser),
    /// Canned responses consumed in order, for exercising callers without
    /// network or browser
    #[cfg(test)]
    Scripted(std::sync::Mutex<std::collections::VecDeque<Result<String, ScrapeError>>>),
}

impl SourceFetcher {
    #[cfg(test)]
    pub fn scripted<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = Result<String, ScrapeError>>,
    {
        SourceFetcher::Scripted(std::sync::Mutex::new(responses.into_iter().collect()))
    }

    /// Build the fetcher selected by configuration
    pub async fn new(config: &ScraperConfig) -> anyhow::Result<Self> {
        match config.fetch_mode {
            FetchMode::Static => {
                let client = HttpClient::new(
                    &config.user_agent,
                    Duration::from_secs(config.request_timeout_secs),
                )?;
                Ok(SourceFetcher::Static(client))
            }
            FetchMode::Rendered => {
                let browser = Browser::launch().await?;
                Ok(SourceFetcher::Rendered(browser))
            }
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, SourceFetcher::Rendered(_))
    }

    /// Fetch a page, honoring the readiness condition in rendered mode.
    ///
    /// Static mode ignores readiness: the server response is already the
    /// complete document. A readiness timeout in rendered mode yields
    /// [`ScrapeError::ContentNotReady`]; the caller decides whether that is
    /// fatal for its item.
    pub async fn fetch(
        &self,
        url: &str,
        readiness: &Readiness,
        timeout: Duration,
    ) -> Result<RawContent, ScrapeError> {
        match self {
            SourceFetcher::Static(client) => {
                let html = retry(&RetryConfig::fetch(), "static fetch", || client.get(url)).await?;
                Ok(RawContent { html, page: None })
            }
            SourceFetcher::Rendered(browser) => {
                let page = browser
                    .open(url)
                    .await
                    .map_err(|e| ScrapeError::fetch(url, e))?;

                let selector = readiness.selector();
                if !Browser::wait_for_selector(&page, selector, timeout).await {
                    let _ = page.close().await;
                    return Err(ScrapeError::ContentNotReady {
                        url: url.to_string(),
                        selector: selector.to_string(),
                        waited_ms: timeout.as_millis() as u64,
                    });
                }

                let html = page
                    .content()
                    .await
                    .map_err(|e| ScrapeError::fetch(url, e))?;

                debug!("rendered fetch of {} returned {} bytes", url, html.len());
                Ok(RawContent {
                    html,
                    page: Some(page),
                })
            }
            #[cfg(test)]
            SourceFetcher::Scripted(queue) => {
                let next = queue
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| Err(ScrapeError::fetch(url, "no scripted response left")));
                next.map(|html| RawContent { html, page: None })
            }
        }
    }

    /// Tear down the session resources
    pub async fn close(self) {
        if let SourceFetcher::Rendered(browser) = self {
            let _ = browser.close().await;
        }
    }
}
