//! Commodity Scraper - Commodity price extraction from HTML quote tables
//!
//! Fetches a public commodities page, scans every table on it, matches row
//! labels against a fixed list of target commodities and extracts their
//! prices through a chain of fallback strategies.

// Module declarations
pub mod domain;
pub mod application;
pub mod infrastructure;

pub use application::ScrapeOrchestrator;
pub use domain::{CommodityPrice, PriceMap, ScrapeDiagnostic, ScrapeReport};
