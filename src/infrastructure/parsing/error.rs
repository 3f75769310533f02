//! Error module re-export
//!
//! This module re-exports the scrape error types for the parsing layer.

pub use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};
