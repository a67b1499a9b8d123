//! Competition directory parser for coteur.com listing pages.
//!
//! The sidebar menu groups competitions under country items. Two structural
//! variants appear in the wild: an expandable inline sub-menu, or a bare
//! country link pointing at a separate per-country page. The inline sub-menu
//! is always attempted first; countries without one are returned as stubs
//! for the caller to fetch and parse with [`CompetitionParser::parse_country_page`].

use scraper::{Html, Selector};
use tracing::warn;

use crate::scraper::BASE_URL;
use crate::types::CompetitionRecord;

/// Result of scanning a listing page
#[derive(Debug, Default)]
pub struct CompetitionScan {
    /// Records found in inline sub-menus
    pub records: Vec<CompetitionRecord>,
    /// Countries whose sub-menu was absent; resolved via their own page
    pub pending: Vec<CountryStub>,
}

/// A country entry without an inline sub-menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryStub {
    pub country: String,
    pub url: String,
}

/// Parser for competition listing pages
pub struct CompetitionParser;

impl CompetitionParser {
    /// Scan the listing page for country groups and their competitions.
    ///
    /// Missing substructure never fails the enumeration: a country without
    /// a sub-menu becomes a [`CountryStub`] and a warning.
    pub fn parse(html: &str) -> CompetitionScan {
        let document = Html::parse_document(html);
        let mut scan = CompetitionScan::default();

        let country_selector = Selector::parse("li.country-item").unwrap();
        let link_selector = Selector::parse("a.country-link").unwrap();
        let submenu_selector = Selector::parse("ul.submenu a").unwrap();

        for item in document.select(&country_selector) {
            let Some(link) = item.select(&link_selector).next() else {
                continue;
            };
            let country = link.text().collect::<String>().trim().to_string();
            if country.is_empty() {
                continue;
            }

            let mut found = 0usize;
            for comp in item.select(&submenu_selector) {
                let name = comp.text().collect::<String>().trim().to_string();
                let Some(href) = comp.value().attr("href") else {
                    continue;
                };
                if name.is_empty() || href.is_empty() {
                    continue;
                }
                scan.records.push(CompetitionRecord {
                    country: country.clone(),
                    name,
                    url: absolutize(href),
                });
                found += 1;
            }

            if found == 0 {
                warn!("no sub-menu found for country {}", country);
                if let Some(href) = link.value().attr("href") {
                    scan.pending.push(CountryStub {
                        country,
                        url: absolutize(href),
                    });
                }
            }
        }

        scan
    }

    /// Fallback: enumerate competitions on a per-country page
    pub fn parse_country_page(html: &str, country: &str) -> Vec<CompetitionRecord> {
        let document = Html::parse_document(html);
        let mut records = Vec::new();

        let link_selector = Selector::parse("a[href*='/competition/']").unwrap();
        for link in document.select(&link_selector) {
            let name = link.text().collect::<String>().trim().to_string();
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            if name.is_empty() || href.is_empty() {
                continue;
            }
            let url = absolutize(href);
            if records.iter().any(|r: &CompetitionRecord| r.url == url) {
                continue;
            }
            records.push(CompetitionRecord {
                country: country.to_string(),
                name,
                url,
            });
        }

        records
    }
}

fn absolutize(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", BASE_URL, href)
    }
}
