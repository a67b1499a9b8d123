//! Match discovery on competition pages.
//!
//! Primary strategy: JSON-LD structured-data blocks declaring a
//! `SportsEvent`, which carry the match URL without visual scraping.
//! Fallback, only when the primary finds nothing: call-to-action links
//! pointing at odds pages.

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use crate::scraper::{odds_page_url, ODDS_PATH_SEGMENT};

/// Marker identifying sporting-event structured-data blocks
const SPORTS_EVENT_MARKER: &str = "\"@type\":\"SportsEvent\"";

/// Parser for competition pages
pub struct MatchListParser;

impl MatchListParser {
    /// Extract up to `max_matches` odds-page URLs, deduplicated in
    /// first-seen order.
    pub fn parse(html: &str, max_matches: usize) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut links = Self::parse_structured_data(&document);

        if links.is_empty() {
            debug!("no structured-data events found, falling back to link scan");
            links = Self::parse_cta_links(&document);
        }

        links.truncate(max_matches);
        links
    }

    fn parse_structured_data(document: &Html) -> Vec<String> {
        let script_selector = Selector::parse("script").unwrap();
        // Embedded payloads sometimes carry stray control characters
        let control_chars = Regex::new(r"[\x00-\x1F\x7F]").unwrap();
        let mut links = Vec::new();

        for script in document.select(&script_selector) {
            let inner = script.inner_html();
            if !inner.contains(SPORTS_EVENT_MARKER) {
                continue;
            }

            let cleaned = control_chars.replace_all(&inner, "");
            let Ok(json) = serde_json::from_str::<serde_json::Value>(&cleaned) else {
                // A malformed block must not abort the scan
                debug!("skipping unparseable structured-data block");
                continue;
            };

            if let Some(url) = json.get("url").and_then(|u| u.as_str()) {
                let corrected = odds_page_url(url);
                if !links.contains(&corrected) {
                    links.push(corrected);
                }
            }
        }

        links
    }

    fn parse_cta_links(document: &Html) -> Vec<String> {
        let anchor_selector = Selector::parse("a.btn.btn-primary").unwrap();
        let mut links = Vec::new();

        for anchor in document.select(&anchor_selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !href.contains(ODDS_PATH_SEGMENT) {
                continue;
            }
            let url = odds_page_url(href);
            if !links.contains(&url) {
                links.push(url);
            }
        }

        links
    }
}
