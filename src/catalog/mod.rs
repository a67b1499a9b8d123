//! Competition catalog sources.
//!
//! Three interchangeable sources produce the same sorted competition list:
//! a local CSV file, a Google Sheets tab named after the sport, and the
//! live listing page on coteur.com (handled by the scrape session, since it
//! needs the fetcher).

pub mod csv_file;
pub mod sheets;

pub use csv_file::CsvCatalog;
pub use sheets::SheetsCatalog;

/// Column headers required of every tabular catalog source
pub const REQUIRED_COLUMNS: [&str; 3] = ["Pays", "Compétition", "URL"];
