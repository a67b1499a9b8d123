//! Bookline parsing and arity reconciliation.
//!
//! A bookline is one bookmaker's row on a match odds page: a `data-name`
//! attribute, ordered outcome cells, and an optional payout cell.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::types::{OddsRow, OutcomeArity, ThreeWayOddsRow, TwoWayOddsRow, NOT_APPLICABLE};

/// One raw bookline before arity reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBookline {
    pub bookmaker: String,
    /// Outcome cells in page order: [home, draw, away] or [side_a, side_b]
    pub cells: Vec<String>,
    pub payout: String,
}

/// Parser for odds-page booklines
pub struct BooklineParser;

impl BooklineParser {
    /// Extract every bookline from a match page
    pub fn parse(html: &str) -> Vec<RawBookline> {
        let document = Html::parse_document(html);
        let row_selector = Selector::parse("div.bookline").unwrap();
        let cell_selector = Selector::parse("div.odds-col").unwrap();
        let payout_selector = Selector::parse("div.border.bg-warning.payout").unwrap();

        let mut rows = Vec::new();
        for row in document.select(&row_selector) {
            let Some(bookmaker) = row.value().attr("data-name") else {
                continue;
            };

            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|c| c.text().collect::<String>().trim().to_string())
                .collect();
            if cells.len() < 2 {
                continue;
            }

            let payout = row
                .select(&payout_selector)
                .next()
                .map(|p| p.text().collect::<String>().trim().to_string())
                .unwrap_or_else(|| NOT_APPLICABLE.to_string());

            rows.push(RawBookline {
                bookmaker: bookmaker.to_string(),
                cells,
                payout,
            });
        }

        rows
    }
}

impl RawBookline {
    /// Reconcile the raw cells against the requested market arity.
    ///
    /// Compatibility shim, by explicit policy: a 3-cell row requested as
    /// 2-way drops the middle (draw) cell; a 2-cell row requested as 3-way
    /// gets the "N/A" sentinel in the draw position. Any other cell count
    /// is discarded.
    pub fn into_odds_row(self, match_name: &str, arity: OutcomeArity) -> Option<OddsRow> {
        let RawBookline {
            bookmaker,
            mut cells,
            payout,
        } = self;

        match (cells.len(), arity) {
            (3, OutcomeArity::Three) => {
                let away = cells.pop()?;
                let draw = cells.pop()?;
                let home = cells.pop()?;
                Some(OddsRow::ThreeWay(ThreeWayOddsRow {
                    match_name: match_name.to_string(),
                    bookmaker,
                    home,
                    draw,
                    away,
                    payout,
                }))
            }
            (3, OutcomeArity::Two) => {
                let side_b = cells.pop()?;
                cells.pop(); // drop the draw cell
                let side_a = cells.pop()?;
                Some(OddsRow::TwoWay(TwoWayOddsRow {
                    match_name: match_name.to_string(),
                    bookmaker,
                    side_a,
                    side_b,
                    payout,
                }))
            }
            (2, OutcomeArity::Two) => {
                let side_b = cells.pop()?;
                let side_a = cells.pop()?;
                Some(OddsRow::TwoWay(TwoWayOddsRow {
                    match_name: match_name.to_string(),
                    bookmaker,
                    side_a,
                    side_b,
                    payout,
                }))
            }
            (2, OutcomeArity::Three) => {
                let away = cells.pop()?;
                let home = cells.pop()?;
                Some(OddsRow::ThreeWay(ThreeWayOddsRow {
                    match_name: match_name.to_string(),
                    bookmaker,
                    home,
                    draw: NOT_APPLICABLE.to_string(),
                    away,
                    payout,
                }))
            }
            _ => None,
        }
    }
}

/// Derive a display name from a match URL slug: last path segment, dashes
/// to spaces, title case, trailing "<digits>#cote" suffix removed.
pub fn match_name_from_url(url: &str) -> String {
    let slug = url.rsplit('/').next().unwrap_or(url);
    let spaced = slug.replace('-', " ");
    let titled = spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    cote_suffix_pattern().replace(&titled, "").trim().to_string()
}

/// Trailing "<digits>#cote" anchor fragment, compiled once
fn cote_suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\s*\d+#cote\s*$").unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MATCH_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="odds-table">
  <div class="bookline" data-name="Winamax">
    <div class="odds-col">2.10</div>
    <div class="odds-col">3.40</div>
    <div class="odds-col">3.20</div>
    <div class="border bg-warning payout">93,5%</div>
  </div>
  <div class="bookline" data-name="Unibet">
    <div class="odds-col">2.05</div>
    <div class="odds-col">3.30</div>
    <div class="odds-col">3.30</div>
  </div>
  <div class="bookline" data-name="Betclic">
    <div class="odds-col">1.95</div>
  </div>
  <div class="bookline">
    <div class="odds-col">1.80</div>
    <div class="odds-col">2.00</div>
  </div>
</div>
</body>
</html>"#;

    #[test]
    fn test_parse_booklines() {
        let rows = BooklineParser::parse(SAMPLE_MATCH_PAGE);

        // Betclic has a single cell, the anonymous row has no data-name
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bookmaker, "Winamax");
        assert_eq!(rows[0].cells, vec!["2.10", "3.40", "3.20"]);
        assert_eq!(rows[0].payout, "93,5%");
        // Missing payout cell defaults to the sentinel
        assert_eq!(rows[1].payout, NOT_APPLICABLE);
    }

    fn raw(cells: &[&str]) -> RawBookline {
        RawBookline {
            bookmaker: "Winamax".to_string(),
            cells: cells.iter().map(|c| c.to_string()).collect(),
            payout: "93.50%".to_string(),
        }
    }

    #[test]
    fn test_three_cells_three_way() {
        let row = raw(&["2.10", "3.40", "3.20"])
            .into_odds_row("M1", OutcomeArity::Three)
            .unwrap();
        match row {
            OddsRow::ThreeWay(r) => {
                assert_eq!(r.home, "2.10");
                assert_eq!(r.draw, "3.40");
                assert_eq!(r.away, "3.20");
            }
            _ => panic!("expected three-way row"),
        }
    }

    #[test]
    fn test_downgrade_drops_draw_cell() {
        let row = raw(&["2.10", "3.40", "3.20"])
            .into_odds_row("M1", OutcomeArity::Two)
            .unwrap();
        match row {
            OddsRow::TwoWay(r) => {
                assert_eq!(r.side_a, "2.10");
                assert_eq!(r.side_b, "3.20");
            }
            _ => panic!("expected two-way row"),
        }
    }

    #[test]
    fn test_upgrade_inserts_sentinel_draw() {
        let row = raw(&["1.85", "1.95"])
            .into_odds_row("M1", OutcomeArity::Three)
            .unwrap();
        match row {
            OddsRow::ThreeWay(r) => {
                assert_eq!(r.home, "1.85");
                assert_eq!(r.draw, NOT_APPLICABLE);
                assert_eq!(r.away, "1.95");
            }
            _ => panic!("expected three-way row"),
        }
    }

    #[test]
    fn test_unexpected_cell_count_discarded() {
        assert!(raw(&["1.85"])
            .into_odds_row("M1", OutcomeArity::Two)
            .is_none());
        assert!(raw(&["1.0", "2.0", "3.0", "4.0"])
            .into_odds_row("M1", OutcomeArity::Three)
            .is_none());
    }

    #[test]
    fn test_match_name_from_url() {
        assert_eq!(
            match_name_from_url("https://www.coteur.com/cote/psg-marseille-102938#cote"),
            "Psg Marseille"
        );
        assert_eq!(
            match_name_from_url("https://www.coteur.com/cote/lyon-lille"),
            "Lyon Lille"
        );
    }
}
