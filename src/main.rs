//! coteur-odds
//!
//! CLI scraper for coteur.com betting odds: discovers matches per
//! competition, extracts bookmaker odds with bounded retry, and averages
//! the payout (TRJ) per bookmaker.

mod catalog;
mod cli;
mod config;
mod error;
mod payout;
mod pipeline;
mod retry;
mod scraper;
mod types;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coteur_odds=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Competitions {
            sport,
            source,
            format,
        } => cli::run_competitions(sport, source, format).await,
        Commands::Scrape {
            sport,
            competitions,
            bookmakers,
            max_matches,
            source,
            fetcher,
            format,
        } => {
            cli::run_scrape(
                sport,
                competitions,
                bookmakers,
                max_matches,
                source,
                fetcher,
                format,
            )
            .await
        }
    }
}
