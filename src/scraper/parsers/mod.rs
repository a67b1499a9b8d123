//! HTML parsers for coteur.com pages.

pub mod booklines;
pub mod competitions;
pub mod matches;

pub use booklines::{match_name_from_url, BooklineParser, RawBookline};
pub use competitions::{CompetitionParser, CompetitionScan, CountryStub};
pub use matches::MatchListParser;
