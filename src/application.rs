//! Application layer module
//!
//! This module contains the use cases that drive the infrastructure
//! components through a complete scrape run.

pub mod scrape_orchestrator;

pub use scrape_orchestrator::ScrapeOrchestrator;
