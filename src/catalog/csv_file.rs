//! CSV-backed competition catalog.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use super::REQUIRED_COLUMNS;
use crate::error::ScrapeError;
use crate::types::{sort_competitions, CompetitionRecord};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Pays")]
    country: String,
    #[serde(rename = "Compétition")]
    name: String,
    #[serde(rename = "URL")]
    url: String,
}

/// CSV file source with the Pays / Compétition / URL schema
pub struct CsvCatalog;

impl CsvCatalog {
    /// Load and sort competitions from a CSV file
    pub fn load(path: &Path) -> Result<Vec<CompetitionRecord>, ScrapeError> {
        let file = std::fs::File::open(path)
            .map_err(|e| ScrapeError::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::parse(file)
    }

    /// Parse competitions from any CSV reader
    pub fn parse<R: Read>(reader: R) -> Result<Vec<CompetitionRecord>, ScrapeError> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| ScrapeError::Catalog(e.to_string()))?
            .clone();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !headers.iter().any(|h| h == **col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ScrapeError::CatalogSchema { missing });
        }

        let mut records = Vec::new();
        for result in csv_reader.deserialize::<CsvRow>() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    warn!("skipping malformed catalog row: {}", e);
                    continue;
                }
            };
            if row.name.trim().is_empty() || row.url.trim().is_empty() {
                warn!("skipping catalog row with empty name or URL");
                continue;
            }
            records.push(CompetitionRecord {
                country: row.country.trim().to_string(),
                name: row.name.trim().to_string(),
                url: row.url.trim().to_string(),
            });
        }

        sort_competitions(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
Pays,Compétition,URL
Angleterre,Premier League,https://www.coteur.com/competition/angleterre/premier-league
France,Ligue 1,https://www.coteur.com/competition/france/ligue-1
Espagne,Liga,https://www.coteur.com/competition/espagne/liga
France,Ligue 2,https://www.coteur.com/competition/france/ligue-2
Italie,,https://www.coteur.com/competition/italie/serie-a
";

    #[test]
    fn test_parse_sorts_home_country_first() {
        let records = CsvCatalog::parse(SAMPLE_CSV.as_bytes()).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].name, "Ligue 1");
        assert_eq!(records[1].name, "Ligue 2");
        assert_eq!(records[2].country, "Angleterre");
        assert_eq!(records[3].country, "Espagne");
    }

    #[test]
    fn test_empty_name_rows_skipped() {
        let records = CsvCatalog::parse(SAMPLE_CSV.as_bytes()).unwrap();
        assert!(records.iter().all(|r| r.country != "Italie"));
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let csv = "Pays,Nom,URL\nFrance,Ligue 1,https://example.com\n";
        let err = CsvCatalog::parse(csv.as_bytes()).unwrap_err();

        match err {
            ScrapeError::CatalogSchema { missing } => {
                assert_eq!(missing, vec!["Compétition".to_string()]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_catalog_error() {
        let err = CsvCatalog::load(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, ScrapeError::Catalog(_)));
    }
}
