//! Core data model: sports, competitions, odds rows and payout summaries.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Sentinel for a missing draw column or an absent payout cell.
pub const NOT_APPLICABLE: &str = "N/A";

/// Home country pinned to the top of competition listings.
pub const HOME_COUNTRY: &str = "France";

/// Bookmakers known to appear on coteur.com match pages.
pub const ALL_BOOKMAKERS: [&str; 12] = [
    "Winamax",
    "Unibet",
    "Betclic",
    "Pmu",
    "ParionsSport",
    "Zebet",
    "Olybet",
    "Bwin",
    "Vbet",
    "Genybet",
    "Feelingbet",
    "Betsson",
];

/// Supported sport categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Football,
    Tennis,
    Rugby,
    Basket,
    Handball,
}

impl Sport {
    /// Number of market outcomes for this sport.
    pub fn arity(&self) -> OutcomeArity {
        match self {
            Sport::Football | Sport::Rugby | Sport::Handball => OutcomeArity::Three,
            Sport::Tennis | Sport::Basket => OutcomeArity::Two,
        }
    }

    /// Catalog tab name (the spreadsheet uses one tab per sport).
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Sport::Football => "Football",
            Sport::Tennis => "Tennis",
            Sport::Rugby => "Rugby",
            Sport::Basket => "Basket",
            Sport::Handball => "Handball",
        }
    }

    /// URL path segment on coteur.com.
    pub fn slug(&self) -> &'static str {
        match self {
            Sport::Football => "football",
            Sport::Tennis => "tennis",
            Sport::Rugby => "rugby",
            Sport::Basket => "basketball",
            Sport::Handball => "handball",
        }
    }
}

/// Number of outcomes a market encodes: 2 (win/win) or 3 (win/draw/win).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeArity {
    Two,
    Three,
}

/// One competition discovered in a catalog or on the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionRecord {
    pub country: String,
    pub name: String,
    pub url: String,
}

/// Sort competitions with the home country first, then lexicographically by
/// (country, name). Records with an empty country sort last.
pub fn sort_competitions(records: &mut [CompetitionRecord]) {
    records.sort_by(|a, b| {
        let key = |r: &CompetitionRecord| {
            let rank = if r.country == HOME_COUNTRY {
                0u8
            } else if r.country.trim().is_empty() {
                2
            } else {
                1
            };
            (rank, r.country.clone(), r.name.clone())
        };
        key(a).cmp(&key(b))
    });
}

/// Odds row for a three-outcome market (football, rugby, handball).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeWayOddsRow {
    pub match_name: String,
    pub bookmaker: String,
    pub home: String,
    pub draw: String,
    pub away: String,
    pub payout: String,
}

/// Odds row for a two-outcome market (tennis, basket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoWayOddsRow {
    pub match_name: String,
    pub bookmaker: String,
    pub side_a: String,
    pub side_b: String,
    pub payout: String,
}

/// A single bookmaker's odds for one match.
///
/// The draw field exists only for three-outcome markets, so the row shape is
/// a tagged variant rather than one struct with optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "market", rename_all = "snake_case")]
pub enum OddsRow {
    ThreeWay(ThreeWayOddsRow),
    TwoWay(TwoWayOddsRow),
}

impl OddsRow {
    pub fn match_name(&self) -> &str {
        match self {
            OddsRow::ThreeWay(r) => &r.match_name,
            OddsRow::TwoWay(r) => &r.match_name,
        }
    }

    pub fn bookmaker(&self) -> &str {
        match self {
            OddsRow::ThreeWay(r) => &r.bookmaker,
            OddsRow::TwoWay(r) => &r.bookmaker,
        }
    }

    pub fn payout(&self) -> &str {
        match self {
            OddsRow::ThreeWay(r) => &r.payout,
            OddsRow::TwoWay(r) => &r.payout,
        }
    }

    /// Display column values in header order.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            OddsRow::ThreeWay(r) => vec![
                &r.match_name,
                &r.bookmaker,
                &r.home,
                &r.draw,
                &r.away,
                &r.payout,
            ],
            OddsRow::TwoWay(r) => vec![
                &r.match_name,
                &r.bookmaker,
                &r.side_a,
                &r.side_b,
                &r.payout,
            ],
        }
    }
}

/// Display headers for an odds table of the given arity.
pub fn odds_headers(arity: OutcomeArity) -> &'static [&'static str] {
    match arity {
        OutcomeArity::Three => &["Match", "Bookmaker", "1", "Draw", "2", "Payout"],
        OutcomeArity::Two => &["Match", "Bookmaker", "1", "2", "Payout"],
    }
}

/// Average payout for one bookmaker across all scraped rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutSummary {
    pub bookmaker: String,
    pub average_payout: f64,
}

impl PayoutSummary {
    /// Two decimal places with a trailing percent sign, e.g. "93.50%".
    pub fn formatted(&self) -> String {
        format!("{:.2}%", self.average_payout)
    }
}
