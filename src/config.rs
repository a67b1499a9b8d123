//! Configuration for coteur-odds.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Fetch strategy selected at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Plain HTTP GET; for pages served as fully formed HTML
    Static,
    /// Headless browser; for pages assembled by client-side rendering
    Rendered,
}

/// Catalog source for competition lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// Local CSV file with Pays / Compétition / URL columns
    Csv,
    /// Google Sheets tab named after the sport
    Sheets,
    /// Live listing page on coteur.com
    Site,
}

/// Scraper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    #[serde(default = "default_fetch_mode")]
    pub fetch_mode: FetchMode,
    /// HTTP request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How long to poll for the readiness selector on a rendered page
    #[serde(default = "default_readiness_timeout_secs")]
    pub readiness_timeout_secs: u64,
    /// Delay letting client-side rendering settle before trusting the DOM
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Re-navigation rounds when page identity does not match the match URL
    #[serde(default = "default_identity_retries")]
    pub identity_retries: u32,
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_fetch_mode() -> FetchMode {
    FetchMode::Rendered
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_readiness_timeout_secs() -> u64 {
    5
}

fn default_settle_delay_ms() -> u64 {
    1500
}

fn default_identity_retries() -> u32 {
    2
}

fn default_requests_per_minute() -> u32 {
    60
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            fetch_mode: default_fetch_mode(),
            request_timeout_secs: default_request_timeout_secs(),
            readiness_timeout_secs: default_readiness_timeout_secs(),
            settle_delay_ms: default_settle_delay_ms(),
            identity_retries: default_identity_retries(),
            requests_per_minute: default_requests_per_minute(),
            user_agent: default_user_agent(),
        }
    }
}

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_source")]
    pub source: CatalogKind,
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
    #[serde(default = "default_spreadsheet_id")]
    pub spreadsheet_id: String,
    /// Google Sheets API key; required only for the sheets source
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_catalog_source() -> CatalogKind {
    CatalogKind::Csv
}

fn default_csv_path() -> String {
    "data/competitions.csv".to_string()
}

fn default_spreadsheet_id() -> String {
    "16ZBhF4k4ah-zhc3QcH7IEWLXrhbT8TRTMi5BptCFIcM".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: default_catalog_source(),
            csv_path: default_csv_path(),
            spreadsheet_id: default_spreadsheet_id(),
            api_key: None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load configuration from environment and config file
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (COTEUR_SCRAPER__SETTLE_DELAY_MS, etc.)
            .add_source(
                config::Environment::with_prefix("COTEUR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
