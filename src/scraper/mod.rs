//! Web scraper module for coteur.com
//!
//! Provides source fetch strategies, HTML parsing, and per-match odds
//! extraction with bounded retry.

pub mod browser;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod parsers;
pub mod rate_limiter;

pub use browser::Browser;
pub use extract::{MatchReport, OddsExtractor};
pub use fetch::{RawContent, Readiness, SourceFetcher};
pub use rate_limiter::RateLimiter;

use crate::types::Sport;

/// Base URL for coteur.com
pub const BASE_URL: &str = "https://www.coteur.com";

/// Path prefix of prognosis pages embedded in structured-data blocks
pub const PRONOSTIC_PREFIX: &str = "/match/pronostic-";

/// Path segment identifying odds-bearing pages
pub const ODDS_PATH_SEGMENT: &str = "/cote/";

/// Build the competition listing URL for a sport
pub fn listing_url(sport: Sport) -> String {
    format!("{}/cotes/{}", BASE_URL, sport.slug())
}

/// Absolutize a site path and rewrite prognosis URLs to their odds-bearing
/// variant (`/match/pronostic-...` serves editorial content; `/cote/...`
/// carries the booklines).
pub fn odds_page_url(path_or_url: &str) -> String {
    let absolute = if path_or_url.starts_with("http") {
        path_or_url.to_string()
    } else {
        format!("{}{}", BASE_URL, path_or_url)
    };
    absolute.replace(PRONOSTIC_PREFIX, ODDS_PATH_SEGMENT)
}
