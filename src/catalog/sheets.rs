//! Google Sheets competition catalog.
//!
//! Reads one spreadsheet tab per sport through the Sheets v4 `values.get`
//! endpoint. Requires an API key with read access to the sheet; a missing
//! key blocks only the catalog load, never a scraping run that uses
//! another source.

use serde::Deserialize;
use tracing::warn;

use super::REQUIRED_COLUMNS;
use crate::error::ScrapeError;
use crate::types::{sort_competitions, CompetitionRecord, Sport};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Sheets v4 catalog source
pub struct SheetsCatalog {
    client: reqwest::Client,
    spreadsheet_id: String,
    api_key: String,
}

impl SheetsCatalog {
    /// Build the source; a missing API key is a credential error
    pub fn new(spreadsheet_id: &str, api_key: Option<&str>) -> Result<Self, ScrapeError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ScrapeError::Credential("no Sheets API key configured (catalog.api_key)".into())
            })?
            .to_string();

        Ok(Self {
            client: reqwest::Client::new(),
            spreadsheet_id: spreadsheet_id.to_string(),
            api_key,
        })
    }

    fn values_url(&self, tab: &str) -> String {
        format!(
            "{}/{}/values/{}?key={}",
            SHEETS_API_BASE, self.spreadsheet_id, tab, self.api_key
        )
    }

    /// Load and sort competitions from the tab named after the sport
    pub async fn load(&self, sport: Sport) -> Result<Vec<CompetitionRecord>, ScrapeError> {
        let tab = sport.sheet_name();
        let url = self.values_url(tab);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ScrapeError::Catalog(format!("worksheet '{}': {}", tab, e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ScrapeError::Credential(format!(
                "Sheets API rejected the key for worksheet '{}' ({})",
                tab, status
            )));
        }
        if !status.is_success() {
            return Err(ScrapeError::Catalog(format!(
                "worksheet '{}': status {}",
                tab, status
            )));
        }

        let body: ValuesResponse = response
            .json()
            .await
            .map_err(|e| ScrapeError::Parse(format!("worksheet '{}': {}", tab, e)))?;

        Self::parse_values(&body.values)
    }

    /// Turn a values grid (header row first) into sorted records
    pub fn parse_values(values: &[Vec<String>]) -> Result<Vec<CompetitionRecord>, ScrapeError> {
        let Some(header) = values.first() else {
            return Ok(Vec::new());
        };

        let index_of = |col: &str| header.iter().position(|h| h == col);
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| index_of(col).is_none())
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ScrapeError::CatalogSchema { missing });
        }

        let country_idx = index_of("Pays").unwrap();
        let name_idx = index_of("Compétition").unwrap();
        let url_idx = index_of("URL").unwrap();

        let mut records = Vec::new();
        for row in &values[1..] {
            // The API trims trailing empty cells from each row
            let cell = |idx: usize| row.get(idx).map(|s| s.trim()).unwrap_or_default();

            let name = cell(name_idx);
            let url = cell(url_idx);
            if name.is_empty() || url.is_empty() {
                warn!("skipping catalog row with empty name or URL");
                continue;
            }
            records.push(CompetitionRecord {
                country: cell(country_idx).to_string(),
                name: name.to_string(),
                url: url.to_string(),
            });
        }

        sort_competitions(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_missing_api_key_is_credential_error() {
        assert!(matches!(
            SheetsCatalog::new("sheet-id", None),
            Err(ScrapeError::Credential(_))
        ));
        assert!(matches!(
            SheetsCatalog::new("sheet-id", Some("  ")),
            Err(ScrapeError::Credential(_))
        ));
    }

    #[test]
    fn test_parse_values_sorted() {
        let values = grid(&[
            &["Pays", "Compétition", "URL"],
            &["Espagne", "Liga", "https://example.com/liga"],
            &["France", "Ligue 1", "https://example.com/ligue-1"],
        ]);

        let records = SheetsCatalog::parse_values(&values).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Ligue 1");
        assert_eq!(records[1].name, "Liga");
    }

    #[test]
    fn test_parse_values_missing_column() {
        let values = grid(&[
            &["Pays", "Division", "URL"],
            &["France", "Ligue 1", "https://example.com"],
        ]);

        match SheetsCatalog::parse_values(&values).unwrap_err() {
            ScrapeError::CatalogSchema { missing } => {
                assert_eq!(missing, vec!["Compétition".to_string()]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_values_short_rows_tolerated() {
        let values = grid(&[
            &["Pays", "Compétition", "URL"],
            &["France", "Ligue 1"],
            &["France", "Ligue 2", "https://example.com/ligue-2"],
        ]);

        let records = SheetsCatalog::parse_values(&values).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Ligue 2");
    }

    #[test]
    fn test_parse_values_empty_grid() {
        let records = SheetsCatalog::parse_values(&[]).unwrap();
        assert!(records.is_empty());
    }
}
