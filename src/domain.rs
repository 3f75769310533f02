//! Domain module - Core entities and value objects
//!
//! This module contains the commodity price record, the result mapping
//! produced by a scrape run, and the diagnostics that describe how a run went.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod commodity;
pub mod diagnostics;

// Re-export commonly used items for convenience
pub use commodity::{CommodityPrice, PriceMap};
pub use diagnostics::{DiagnosticSeverity, ScrapeDiagnostic, ScrapeReport};
