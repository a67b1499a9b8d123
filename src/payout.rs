//! Payout (TRJ) aggregation.
//!
//! The payout is the percentage of wagered stakes a bookmaker returns to
//! bettors on average. Cells arrive as display strings ("93,5%", "93.5%",
//! "N/A"); cleaning normalizes them before grouping.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::{OddsRow, PayoutSummary};

/// Plain positive decimal, compiled once
fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+(\.\d+)?$").unwrap())
}

/// Normalize a payout cell to its numeric value.
///
/// Strips the percent sign, converts a decimal comma to a decimal point,
/// and rejects anything that is not a plain positive decimal.
pub fn clean_payout(raw: &str) -> Option<f64> {
    let cleaned = raw.replace('%', "").replace(',', ".");
    let cleaned = cleaned.trim();

    if !numeric_pattern().is_match(cleaned) {
        return None;
    }
    cleaned.parse().ok()
}

/// Group rows by bookmaker and average their payouts, sorted descending.
///
/// Rows whose payout does not clean to a number (including the "N/A"
/// sentinel) are discarded. Empty input yields an empty summary.
pub fn summarize(rows: &[OddsRow]) -> Vec<PayoutSummary> {
    let mut grouped: HashMap<&str, (f64, u32)> = HashMap::new();

    for row in rows {
        if let Some(value) = clean_payout(row.payout()) {
            let entry = grouped.entry(row.bookmaker()).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    let mut summary: Vec<PayoutSummary> = grouped
        .into_iter()
        .map(|(bookmaker, (sum, count))| PayoutSummary {
            bookmaker: bookmaker.to_string(),
            average_payout: sum / count as f64,
        })
        .collect();

    // Descending by mean; name as a deterministic tie-break
    summary.sort_by(|a, b| {
        b.average_payout
            .partial_cmp(&a.average_payout)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.bookmaker.cmp(&b.bookmaker))
    });

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ThreeWayOddsRow;

    fn row(match_name: &str, bookmaker: &str, payout: &str) -> OddsRow {
        OddsRow::ThreeWay(ThreeWayOddsRow {
            match_name: match_name.to_string(),
            bookmaker: bookmaker.to_string(),
            home: "2.10".to_string(),
            draw: "3.40".to_string(),
            away: "3.20".to_string(),
            payout: payout.to_string(),
        })
    }

    #[test]
    fn test_clean_payout_normalizes_comma_and_point() {
        assert_eq!(clean_payout("93,5%"), Some(93.5));
        assert_eq!(clean_payout("93.5%"), Some(93.5));
        assert_eq!(clean_payout(" 94 "), Some(94.0));
    }

    #[test]
    fn test_clean_payout_rejects_non_numeric() {
        assert_eq!(clean_payout("N/A"), None);
        assert_eq!(clean_payout(""), None);
        assert_eq!(clean_payout("93.5.0%"), None);
        assert_eq!(clean_payout("-93.5%"), None);
    }

    #[test]
    fn test_summarize_sorted_descending() {
        let rows = vec![
            row("M1", "Winamax", "93.50%"),
            row("M1", "Unibet", "91.00%"),
        ];
        let summary = summarize(&rows);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].bookmaker, "Winamax");
        assert_eq!(summary[0].formatted(), "93.50%");
        assert_eq!(summary[1].bookmaker, "Unibet");
        assert_eq!(summary[1].formatted(), "91.00%");
    }

    #[test]
    fn test_summarize_groups_by_bookmaker() {
        let rows = vec![
            row("M1", "Winamax", "92.00%"),
            row("M2", "Winamax", "94.00%"),
            row("M1", "Betclic", "95.00%"),
        ];
        let summary = summarize(&rows);

        assert_eq!(summary[0].bookmaker, "Betclic");
        assert_eq!(summary[1].bookmaker, "Winamax");
        assert!((summary[1].average_payout - 93.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_discards_sentinel_rows() {
        let rows = vec![row("M1", "Winamax", "N/A"), row("M1", "Unibet", "91,0%")];
        let summary = summarize(&rows);

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].bookmaker, "Unibet");
    }

    #[test]
    fn test_summarize_empty_input() {
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn test_summarize_idempotent_on_clean_strings() {
        let rows = vec![
            row("M1", "Winamax", "93.50%"),
            row("M2", "Winamax", "94.50%"),
        ];
        let first = summarize(&rows);

        // Feed the formatted means back through as if they were raw cells
        let again: Vec<OddsRow> = first
            .iter()
            .map(|s| row("M1", &s.bookmaker, &s.formatted()))
            .collect();
        let second = summarize(&again);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.bookmaker, b.bookmaker);
            assert!((a.average_payout - b.average_payout).abs() < 1e-9);
        }
    }
}
