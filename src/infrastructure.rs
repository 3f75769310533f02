//! Infrastructure layer for fetching, parsing and exporting
//!
//! This module provides the document sources, the HTML table scanning
//! pipeline, configuration, logging and summary export.

pub mod scrape_error;  // Error taxonomy
pub mod parsing;  // Table scanning and price extraction
pub mod simple_http_client;  // Document sources (HTTP, file)
pub mod config;  // Configuration constants and manager
pub mod logging;  // Logging infrastructure
pub mod summary_export;  // Summary table, CSV and JSON output

// Re-export commonly used items
pub use scrape_error::{ScrapeError, ScrapeResult};
pub use parsing::{NameMatcher, ParsingConfig, PriceExtractor, PriceParser, PriceStrategy, ScanContext, TableScanner};
pub use simple_http_client::{DocumentSource, FileDocumentSource, HttpClient};
pub use config::{AppConfig, ConfigManager, ExportConfig, LoggingConfig, ScraperConfig};
pub use logging::{init_logging_with_config, get_log_directory};
