//! CLI commands for coteur-odds.
//!
//! The table printers below stand in for the interactive dashboard: they
//! render the flat odds table and the average-payout summary.

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::{AppConfig, CatalogKind, FetchMode};
use crate::pipeline::{ScrapeOutcome, ScrapeSession, Selection};
use crate::types::{odds_headers, CompetitionRecord, Sport, ALL_BOOKMAKERS};

#[derive(Parser)]
#[command(name = "coteur-odds")]
#[command(version, about = "Betting odds scraper and payout aggregator for coteur.com", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List competitions for a sport from the configured catalog
    Competitions {
        /// Sport category
        #[arg(value_enum)]
        sport: Sport,

        /// Catalog source override
        #[arg(short, long, value_enum)]
        source: Option<CatalogKind>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Scrape odds for selected competitions and compute average payouts
    Scrape {
        /// Sport category (fixes the market arity)
        #[arg(value_enum)]
        sport: Sport,

        /// Competition names to scrape; defaults to the whole catalog
        #[arg(short, long, value_delimiter = ',')]
        competitions: Vec<String>,

        /// Bookmakers to keep; defaults to the full allow-list
        #[arg(short, long, value_delimiter = ',')]
        bookmakers: Vec<String>,

        /// Maximum matches per competition
        #[arg(short, long, default_value_t = 5)]
        max_matches: usize,

        /// Catalog source override
        #[arg(short, long, value_enum)]
        source: Option<CatalogKind>,

        /// Fetch strategy override
        #[arg(long, value_enum)]
        fetcher: Option<FetchMode>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

/// List the competition catalog for a sport.
pub async fn run_competitions(
    sport: Sport,
    source: Option<CatalogKind>,
    format: String,
) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let kind = source.unwrap_or(config.catalog.source);

    let mut session = ScrapeSession::new(config).await?;
    let result = session.load_competitions(sport, kind).await;
    let records = match result {
        Ok(records) => records,
        Err(e) => {
            session.close().await;
            return Err(e.into());
        }
    };
    session.close().await;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&records)?),
        _ => print_competitions_table(&records),
    }

    Ok(())
}

/// Run the scraping pipeline and display both output tables.
pub async fn run_scrape(
    sport: Sport,
    competitions: Vec<String>,
    bookmakers: Vec<String>,
    max_matches: usize,
    source: Option<CatalogKind>,
    fetcher: Option<FetchMode>,
    format: String,
) -> anyhow::Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(mode) = fetcher {
        config.scraper.fetch_mode = mode;
    }
    let kind = source.unwrap_or(config.catalog.source);

    let mut session = ScrapeSession::new(config).await?;

    let catalog = match session.load_competitions(sport, kind).await {
        Ok(catalog) => catalog,
        Err(e) => {
            session.close().await;
            return Err(e.into());
        }
    };

    let selected = select_competitions(&catalog, &competitions);
    if selected.is_empty() {
        session.close().await;
        anyhow::bail!("no matching competitions for {:?}", sport);
    }

    let bookmakers = if bookmakers.is_empty() {
        ALL_BOOKMAKERS.iter().map(|b| b.to_string()).collect()
    } else {
        bookmakers
    };

    let selection = Selection {
        sport,
        competitions: selected,
        bookmakers,
        max_matches,
    };

    let outcome = session.run(&selection).await;
    session.close().await;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome)?),
        _ => {
            print_payout_table(&outcome, sport);
            print_odds_table(&outcome, sport);
        }
    }

    Ok(())
}

/// Keep catalog entries matching the requested names, preserving the
/// user's selection order. An empty request selects the whole catalog.
fn select_competitions(
    catalog: &[CompetitionRecord],
    requested: &[String],
) -> Vec<CompetitionRecord> {
    if requested.is_empty() {
        return catalog.to_vec();
    }

    let mut selected = Vec::new();
    for name in requested {
        match catalog.iter().find(|r| &r.name == name) {
            Some(record) => selected.push(record.clone()),
            None => warn!("unknown competition: {}", name),
        }
    }
    selected
}

fn print_competitions_table(records: &[CompetitionRecord]) {
    println!("{:<16} {:<32} URL", "Country", "Competition");
    for record in records {
        println!("{:<16} {:<32} {}", record.country, record.name, record.url);
    }
    println!();
    println!("{} competitions", records.len());
}

fn print_odds_table(outcome: &ScrapeOutcome, sport: Sport) {
    println!("=== Retrieved {} Odds ===", sport.sheet_name());
    if outcome.rows.is_empty() {
        println!("  (no odds retrieved)");
        return;
    }

    let headers = odds_headers(sport.arity());
    print_odds_line(&headers.iter().map(|h| h.to_string()).collect::<Vec<_>>());
    for row in &outcome.rows {
        print_odds_line(&row.columns().iter().map(|c| c.to_string()).collect::<Vec<_>>());
    }
    println!();
}

fn print_odds_line(cells: &[String]) {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i == 0 {
            line.push_str(&format!("{:<32}", cell));
        } else if i == 1 {
            line.push_str(&format!(" {:<14}", cell));
        } else {
            line.push_str(&format!(" {:>8}", cell));
        }
    }
    println!("{}", line);
}

fn print_payout_table(outcome: &ScrapeOutcome, sport: Sport) {
    println!("=== Average Payout by Operator - {} ===", sport.sheet_name());
    if outcome.summary.is_empty() {
        println!("  (no payout data)");
    }
    for entry in &outcome.summary {
        println!("  {:<14} {:>8}", entry.bookmaker, entry.formatted());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CompetitionRecord> {
        vec![
            CompetitionRecord {
                country: "France".to_string(),
                name: "Ligue 1".to_string(),
                url: "https://www.coteur.com/competition/france/ligue-1".to_string(),
            },
            CompetitionRecord {
                country: "Angleterre".to_string(),
                name: "Premier League".to_string(),
                url: "https://www.coteur.com/competition/angleterre/premier-league".to_string(),
            },
        ]
    }

    #[test]
    fn test_select_all_when_empty() {
        let selected = select_competitions(&catalog(), &[]);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_select_preserves_request_order() {
        let requested = vec!["Premier League".to_string(), "Ligue 1".to_string()];
        let selected = select_competitions(&catalog(), &requested);

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].name, "Premier League");
        assert_eq!(selected[1].name, "Ligue 1");
    }

    #[test]
    fn test_select_skips_unknown_names() {
        let requested = vec!["Serie A".to_string(), "Ligue 1".to_string()];
        let selected = select_competitions(&catalog(), &requested);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Ligue 1");
    }
}
