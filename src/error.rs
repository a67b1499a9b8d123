//! Error taxonomy for the scraping pipeline.
//!
//! Per-match and per-competition failures are isolated diagnostics; the
//! batch always yields a partial result set. Only catalog-level failures
//! (bad schema, missing credentials) block, and only the load that raised
//! them.

use thiserror::Error;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("failed to parse page content: {0}")]
    Parse(String),

    #[error("'{selector}' never appeared on {url} within {waited_ms}ms")]
    ContentNotReady {
        url: String,
        selector: String,
        waited_ms: u64,
    },

    #[error("catalog load failed: {0}")]
    Catalog(String),

    #[error("catalog source is missing required columns: {missing:?}")]
    CatalogSchema { missing: Vec<String> },

    #[error("missing or invalid catalog credentials: {0}")]
    Credential(String),
}

impl ScrapeError {
    /// Build a fetch error from any displayable cause.
    pub fn fetch(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
