//! HTML parsing infrastructure for commodity quote pages
//!
//! Table scanning, row label matching and price cell extraction, built on
//! `scraper` with configurable selectors and fallback strategies.

pub mod error;
pub mod name_matcher;
pub mod price_extractor;
pub mod price_parser;
pub mod table_scanner;
pub mod context;
pub mod config;

// Re-export public types
pub use error::{ScrapeError, ScrapeResult};
pub use context::ScanContext;
pub use config::ParsingConfig;
pub use name_matcher::NameMatcher;
pub use price_extractor::{PriceExtractor, PriceStrategy};
pub use price_parser::PriceParser;
pub use table_scanner::{ScanOutcome, TableScanner};

use scraper::ElementRef;

/// Visible text of an element: every text node trimmed, empty pieces dropped,
/// the rest concatenated.
pub fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}
