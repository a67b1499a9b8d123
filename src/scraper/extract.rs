//! Per-match odds extraction with bounded retry.
//!
//! Client-side routing on coteur.com can leave a page serving stale content
//! from a prior navigation. Each attempt therefore runs a settle-and-verify
//! loop before trusting the DOM: wait a fixed delay, re-check that the page
//! identity corresponds to the requested match, and re-navigate if it does
//! not. Identity never matching is a warning, not a failure; extraction is
//! best-effort. A match always ends with a row set, possibly empty; neither
//! outcome is fatal to the batch.

use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::retry::RetryConfig;
use crate::scraper::browser::Browser;
use crate::scraper::fetch::{Readiness, SourceFetcher};
use crate::scraper::parsers::{match_name_from_url, BooklineParser};
use crate::types::{OddsRow, OutcomeArity};

/// Selector for the odds-row container
pub const BOOKLINE_SELECTOR: &str = "div.bookline";

/// Diagnostic for one match after extraction finished
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub url: String,
    pub match_name: String,
    /// Fetch-and-extract attempts consumed
    pub attempts: u32,
    /// Whether page identity matched the requested match on any attempt
    pub verified: bool,
    /// Rows emitted; zero means `Extracted(empty)`
    pub rows: usize,
}

/// Extracts booklines for a single match URL
pub struct OddsExtractor<'a> {
    fetcher: &'a SourceFetcher,
    config: &'a ScraperConfig,
    retry: RetryConfig,
}

impl<'a> OddsExtractor<'a> {
    pub fn new(fetcher: &'a SourceFetcher, config: &'a ScraperConfig) -> Self {
        Self {
            fetcher,
            config,
            retry: RetryConfig::extraction(),
        }
    }

    /// Run the fetch-and-extract sequence for one match, retrying the whole
    /// sequence while it yields zero rows. Always returns a report; an empty
    /// row set is a diagnostic, never an error.
    pub async fn extract(
        &self,
        match_url: &str,
        arity: OutcomeArity,
        selected_bookmakers: &[String],
    ) -> (Vec<OddsRow>, MatchReport) {
        let match_name = match_name_from_url(match_url);
        let mut verified = false;
        let mut attempts = 0;

        for attempt in 0..=self.retry.max_retries {
            attempts = attempt + 1;

            match self
                .attempt(match_url, &match_name, arity, selected_bookmakers)
                .await
            {
                Ok((rows, attempt_verified)) => {
                    verified |= attempt_verified;
                    if !rows.is_empty() {
                        info!(
                            "extracted {} rows for {} (attempt {})",
                            rows.len(),
                            match_name,
                            attempts
                        );
                        let report = MatchReport {
                            url: match_url.to_string(),
                            match_name,
                            attempts,
                            verified,
                            rows: rows.len(),
                        };
                        return (rows, report);
                    }
                    debug!("no odds rows for {} on attempt {}", match_url, attempts);
                }
                Err(e) => {
                    warn!("attempt {} failed for {}: {}", attempts, match_url, e);
                }
            }

            if attempt < self.retry.max_retries {
                sleep(self.retry.delay_for_attempt(attempt)).await;
            }
        }

        warn!("no odds found for {}", match_url);
        let report = MatchReport {
            url: match_url.to_string(),
            match_name,
            attempts,
            verified,
            rows: 0,
        };
        (Vec::new(), report)
    }

    /// One fetch-and-extract pass: fetch, settle, verify identity, parse.
    async fn attempt(
        &self,
        match_url: &str,
        match_name: &str,
        arity: OutcomeArity,
        selected_bookmakers: &[String],
    ) -> Result<(Vec<OddsRow>, bool), ScrapeError> {
        let readiness = Readiness::Selector(BOOKLINE_SELECTOR.to_string());
        let timeout = Duration::from_secs(self.config.readiness_timeout_secs);

        let content = self.fetcher.fetch(match_url, &readiness, timeout).await?;

        // Static responses cannot race client-side routing
        let mut verified = !self.fetcher.is_rendered();
        let mut html = content.html;

        if let Some(page) = content.page {
            let settle = Duration::from_millis(self.config.settle_delay_ms);

            for round in 0..=self.config.identity_retries {
                sleep(settle).await;

                if page_matches(&page, match_name).await {
                    verified = true;
                    break;
                }

                if round < self.config.identity_retries {
                    debug!("page identity mismatch for {}, re-navigating", match_url);
                    page.goto(match_url)
                        .await
                        .map_err(|e| ScrapeError::fetch(match_url, e))?;
                    Browser::wait_for_selector(&page, BOOKLINE_SELECTOR, timeout).await;
                }
            }

            if !verified {
                warn!(
                    "page identity never matched for {}, extracting anyway",
                    match_url
                );
            }

            html = page
                .content()
                .await
                .map_err(|e| ScrapeError::fetch(match_url, e))?;
            let _ = page.close().await;
        }

        let rows = collect_rows(&html, match_name, arity, selected_bookmakers);
        Ok((rows, verified))
    }
}

/// Parse booklines out of the page, keeping only selected bookmakers.
/// Unrecognized bookmaker identifiers are dropped silently.
fn collect_rows(
    html: &str,
    match_name: &str,
    arity: OutcomeArity,
    selected_bookmakers: &[String],
) -> Vec<OddsRow> {
    BooklineParser::parse(html)
        .into_iter()
        .filter(|raw| selected_bookmakers.iter().any(|b| b == &raw.bookmaker))
        .filter_map(|raw| raw.into_odds_row(match_name, arity))
        .collect()
}

/// Identity predicate: the first team token of the match slug appears in
/// the page title or main heading.
async fn page_matches(page: &chromiumoxide::page::Page, match_name: &str) -> bool {
    let Some(token) = match_name
        .split_whitespace()
        .find(|w| w.chars().all(char::is_alphabetic))
    else {
        return true;
    };

    match Browser::page_identity(page).await {
        Some(identity) => identity.to_lowercase().contains(&token.to_lowercase()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MATCH_PAGE: &str = r#"
    <div class="bookline" data-name="Winamax">
      <div class="odds-col">2.10</div>
      <div class="odds-col">3.40</div>
      <div class="odds-col">3.20</div>
      <div class="border bg-warning payout">93.50%</div>
    </div>
    <div class="bookline" data-name="Unibet">
      <div class="odds-col">2.05</div>
      <div class="odds-col">3.30</div>
      <div class="odds-col">3.30</div>
      <div class="border bg-warning payout">91.00%</div>
    </div>
    <div class="bookline" data-name="ObscureBook">
      <div class="odds-col">2.00</div>
      <div class="odds-col">3.00</div>
      <div class="odds-col">3.50</div>
    </div>
    "#;

    fn selected(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_collect_rows_filters_bookmakers() {
        let rows = collect_rows(
            SAMPLE_MATCH_PAGE,
            "M1",
            OutcomeArity::Three,
            &selected(&["Winamax", "Unibet"]),
        );

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.bookmaker() != "ObscureBook"));
    }

    #[test]
    fn test_collect_rows_unselected_never_appear() {
        let rows = collect_rows(
            SAMPLE_MATCH_PAGE,
            "M1",
            OutcomeArity::Three,
            &selected(&["Winamax"]),
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bookmaker(), "Winamax");
    }

    #[test]
    fn test_collect_rows_downgrades_to_two_way() {
        let rows = collect_rows(
            SAMPLE_MATCH_PAGE,
            "M1",
            OutcomeArity::Two,
            &selected(&["Winamax"]),
        );

        match &rows[0] {
            OddsRow::TwoWay(r) => {
                assert_eq!(r.side_a, "2.10");
                assert_eq!(r.side_b, "3.20");
            }
            _ => panic!("expected two-way row"),
        }
    }

    #[test]
    fn test_collect_rows_empty_page() {
        let rows = collect_rows(
            "<html></html>",
            "M1",
            OutcomeArity::Three,
            &selected(&["Winamax"]),
        );
        assert!(rows.is_empty());
    }

    const MATCH_URL: &str = "https://www.coteur.com/cote/psg-marseille";

    // Paused clock: the backoff sleeps between attempts auto-advance.
    #[tokio::test(start_paused = true)]
    async fn test_extract_empty_after_retry_budget() {
        let fetcher = SourceFetcher::scripted([
            Ok("<html></html>".to_string()),
            Ok("<html></html>".to_string()),
            Ok("<html></html>".to_string()),
        ]);
        let config = ScraperConfig::default();
        let extractor = OddsExtractor::new(&fetcher, &config);

        let (rows, report) = extractor
            .extract(MATCH_URL, OutcomeArity::Three, &selected(&["Winamax"]))
            .await;

        assert!(rows.is_empty());
        assert_eq!(report.rows, 0);
        assert_eq!(report.attempts, 3);
        assert_eq!(report.match_name, "Psg Marseille");
        assert_eq!(report.url, MATCH_URL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extract_recovers_after_failed_attempt() {
        let fetcher = SourceFetcher::scripted([
            Err(ScrapeError::fetch(MATCH_URL, "connection reset")),
            Ok(SAMPLE_MATCH_PAGE.to_string()),
        ]);
        let config = ScraperConfig::default();
        let extractor = OddsExtractor::new(&fetcher, &config);

        let (rows, report) = extractor
            .extract(MATCH_URL, OutcomeArity::Three, &selected(&["Winamax"]))
            .await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bookmaker(), "Winamax");
        assert_eq!(report.attempts, 2);
        assert_eq!(report.rows, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extract_stops_at_first_populated_attempt() {
        // The third canned response would fail; it must never be consumed
        let fetcher = SourceFetcher::scripted([
            Ok(SAMPLE_MATCH_PAGE.to_string()),
            Err(ScrapeError::fetch(MATCH_URL, "unreachable")),
        ]);
        let config = ScraperConfig::default();
        let extractor = OddsExtractor::new(&fetcher, &config);

        let (rows, report) = extractor
            .extract(MATCH_URL, OutcomeArity::Three, &selected(&["Winamax", "Unibet"]))
            .await;

        assert_eq!(rows.len(), 2);
        assert_eq!(report.attempts, 1);
    }
}
