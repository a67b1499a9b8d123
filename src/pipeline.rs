//! Scrape session: the context object carrying fetcher, rate limiter and
//! catalog cache through the pipeline.
//!
//! One session is created per top-level scraping invocation and torn down
//! around it. Processing is sequential throughout: competitions one at a
//! time, matches within a competition one at a time. Output rows preserve
//! competition-selection order, then match-discovery order, then
//! within-match bookline order.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{CsvCatalog, SheetsCatalog};
use crate::config::{AppConfig, CatalogKind};
use crate::error::ScrapeError;
use crate::payout;
use crate::scraper::parsers::{CompetitionParser, MatchListParser};
use crate::scraper::{listing_url, MatchReport, OddsExtractor, RateLimiter, Readiness, SourceFetcher};
use crate::types::{sort_competitions, CompetitionRecord, OddsRow, PayoutSummary, Sport};

/// Inputs of one scraping run
#[derive(Debug, Clone)]
pub struct Selection {
    pub sport: Sport,
    /// Competitions in user-selected order
    pub competitions: Vec<CompetitionRecord>,
    pub bookmakers: Vec<String>,
    /// Maximum matches per competition
    pub max_matches: usize,
}

/// Everything one run produced
#[derive(Debug, Serialize)]
pub struct ScrapeOutcome {
    pub rows: Vec<OddsRow>,
    pub summary: Vec<PayoutSummary>,
    pub reports: Vec<MatchReport>,
    pub scraped_at: String,
}

/// Session-scoped pipeline context
pub struct ScrapeSession {
    fetcher: SourceFetcher,
    limiter: RateLimiter,
    config: AppConfig,
    /// Catalog cache for the duration of this session only
    catalog_cache: HashMap<(CatalogKind, Sport), Vec<CompetitionRecord>>,
}

impl ScrapeSession {
    /// Build the session resources selected by configuration
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let fetcher = SourceFetcher::new(&config.scraper).await?;
        let limiter = RateLimiter::new(config.scraper.requests_per_minute);

        Ok(Self {
            fetcher,
            limiter,
            config,
            catalog_cache: HashMap::new(),
        })
    }

    /// Load the competition catalog for a sport from the given source,
    /// cached for the lifetime of the session.
    pub async fn load_competitions(
        &mut self,
        sport: Sport,
        kind: CatalogKind,
    ) -> Result<Vec<CompetitionRecord>, ScrapeError> {
        if let Some(cached) = self.catalog_cache.get(&(kind, sport)) {
            return Ok(cached.clone());
        }

        let records = match kind {
            CatalogKind::Csv => CsvCatalog::load(Path::new(&self.config.catalog.csv_path))?,
            CatalogKind::Sheets => {
                let source = SheetsCatalog::new(
                    &self.config.catalog.spreadsheet_id,
                    self.config.catalog.api_key.as_deref(),
                )?;
                source.load(sport).await?
            }
            CatalogKind::Site => self.list_site_competitions(sport).await?,
        };

        self.catalog_cache.insert((kind, sport), records.clone());
        Ok(records)
    }

    /// Enumerate competitions from the live listing page. Countries whose
    /// sub-menu is absent are resolved through their own page; a failure
    /// there is a per-country diagnostic, not an enumeration failure.
    async fn list_site_competitions(
        &self,
        sport: Sport,
    ) -> Result<Vec<CompetitionRecord>, ScrapeError> {
        let url = listing_url(sport);
        let timeout = Duration::from_secs(self.config.scraper.readiness_timeout_secs);

        self.limiter.acquire().await;
        let content = self.fetcher.fetch(&url, &Readiness::ScriptTags, timeout).await?;
        if let Some(page) = content.page {
            let _ = page.close().await;
        }

        let scan = CompetitionParser::parse(&content.html);
        let mut records = scan.records;

        for stub in scan.pending {
            self.limiter.acquire().await;
            match self
                .fetcher
                .fetch(&stub.url, &Readiness::ScriptTags, timeout)
                .await
            {
                Ok(content) => {
                    if let Some(page) = content.page {
                        let _ = page.close().await;
                    }
                    records.extend(CompetitionParser::parse_country_page(
                        &content.html,
                        &stub.country,
                    ));
                }
                Err(e) => {
                    warn!("skipping country page {}: {}", stub.url, e);
                }
            }
        }

        sort_competitions(&mut records);
        Ok(records)
    }

    /// Discover match URLs on a competition page. A readiness timeout means
    /// no matches, not a failure.
    pub async fn list_matches(
        &self,
        competition_url: &str,
        max_matches: usize,
    ) -> Result<Vec<String>, ScrapeError> {
        let timeout = Duration::from_secs(self.config.scraper.readiness_timeout_secs);

        self.limiter.acquire().await;
        let content = match self
            .fetcher
            .fetch(competition_url, &Readiness::ScriptTags, timeout)
            .await
        {
            Ok(content) => content,
            Err(ScrapeError::ContentNotReady { .. }) => {
                warn!("no matches found for {}", competition_url);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        if let Some(page) = content.page {
            let _ = page.close().await;
        }

        Ok(MatchListParser::parse(&content.html, max_matches))
    }

    /// Run the full pipeline over a selection. Per-competition and
    /// per-match failures are logged and isolated; the outcome is always a
    /// (possibly partial) result set.
    pub async fn run(&self, selection: &Selection) -> ScrapeOutcome {
        let arity = selection.sport.arity();
        let extractor = OddsExtractor::new(&self.fetcher, &self.config.scraper);

        let mut rows: Vec<OddsRow> = Vec::new();
        let mut reports: Vec<MatchReport> = Vec::new();

        for competition in &selection.competitions {
            info!("scraping competition {} ({})", competition.name, competition.url);

            let matches = match self
                .list_matches(&competition.url, selection.max_matches)
                .await
            {
                Ok(matches) => matches,
                Err(e) => {
                    warn!("skipping competition {}: {}", competition.name, e);
                    continue;
                }
            };

            for match_url in matches {
                self.limiter.acquire().await;
                let (match_rows, report) = extractor
                    .extract(&match_url, arity, &selection.bookmakers)
                    .await;
                rows.extend(match_rows);
                reports.push(report);
            }
        }

        let summary = payout::summarize(&rows);

        ScrapeOutcome {
            rows,
            summary,
            reports,
            scraped_at: Utc::now().to_rfc3339(),
        }
    }

    /// Tear down session resources
    pub async fn close(self) {
        self.fetcher.close().await;
    }
}
