//! Configuration infrastructure
//!
//! Contains configuration loading and management for commodity scraping.
//!
//! Configuration is organized into four sections:
//! 1. Scraper settings (endpoint, targets, request headers)
//! 2. Parsing settings (selectors and price markers)
//! 3. Logging settings
//! 4. Export settings

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};
use url::Url;

use super::parsing::{ParsingConfig, TableScanner};
use super::scrape_error::{ScrapeError, ScrapeResult};

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Source page and run settings
    pub scraper: ScraperConfig,

    /// Selectors and price markers
    pub parsing: ParsingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Summary export configuration
    pub export: ExportConfig,
}

/// Source page, request and target settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Commodities page URL
    pub endpoint: String,

    /// Canonical target names in matching priority order
    pub targets: Vec<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// User agent string sent with the request
    pub user_agent: String,

    /// `Accept` header value
    pub accept: String,

    /// `Accept-Language` header value
    pub accept_language: String,

    /// Ask the server to keep the connection alive
    pub keep_alive: bool,

    /// Currency written on every record
    pub currency: String,

    /// Unit written on every record
    pub unit: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log file name inside the log directory
    pub file_name: String,

    /// Log directory; defaults to `logs/` next to the executable
    pub directory: Option<PathBuf>,

    /// Number of log files to keep (older files will be deleted)
    pub max_files: u32,

    /// Enable automatic log cleanup on startup
    pub auto_cleanup_logs: bool,
}

/// Summary export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Write the summary table as CSV after each run
    pub csv_enabled: bool,

    /// CSV output path
    pub csv_path: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            endpoint: endpoints::COMMODITIES_PAGE.to_string(),
            targets: defaults::TARGET_COMMODITIES.iter().map(|s| s.to_string()).collect(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
            accept: defaults::ACCEPT.to_string(),
            accept_language: defaults::ACCEPT_LANGUAGE.to_string(),
            keep_alive: true,
            currency: crate::domain::commodity::DEFAULT_CURRENCY.to_string(),
            unit: crate::domain::commodity::DEFAULT_UNIT.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            directory: None,
            max_files: defaults::LOG_MAX_FILES,
            auto_cleanup_logs: defaults::LOG_AUTO_CLEANUP,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            csv_enabled: true,
            csv_path: PathBuf::from(defaults::CSV_EXPORT_PATH),
        }
    }
}

impl AppConfig {
    /// Check the settings a run depends on
    pub fn validate(&self) -> ScrapeResult<()> {
        self.scraper.validate()?;
        TableScanner::with_config(&self.parsing)?;
        Ok(())
    }
}

impl ScraperConfig {
    pub fn validate(&self) -> ScrapeResult<()> {
        if self.targets.is_empty() {
            return Err(ScrapeError::configuration("targets", "at least one target commodity is required"));
        }
        if self.targets.iter().any(|t| t.trim().is_empty()) {
            return Err(ScrapeError::configuration("targets", "target names must not be blank"));
        }
        if self.timeout_seconds == 0 {
            return Err(ScrapeError::configuration("timeout_seconds", "timeout must be greater than zero"));
        }

        let url = Url::parse(&self.endpoint)
            .map_err(|e| ScrapeError::configuration("endpoint", format!("invalid URL {}: {}", self.endpoint, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScrapeError::configuration(
                "endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(())
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Create a configuration manager for the default location
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join(defaults::CONFIG_FILE_NAME);
        Ok(Self { config_path })
    }

    /// Create a configuration manager for an explicit file
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                info!("Loaded configuration from: {:?}", self.config_path);
                Ok(config)
            }
            Err(parse_error) => {
                warn!("⚠️  Configuration parse error: {}", parse_error);
                warn!("⚠️  Resetting to default configuration");

                let backup_path = self.config_path.with_extension("json.corrupted");
                if let Err(e) = fs::copy(&self.config_path, &backup_path).await {
                    warn!("Failed to create backup of corrupted config: {}", e);
                } else {
                    info!("Backed up corrupted config to: {:?}", backup_path);
                }

                self.reset_to_defaults().await
            }
        }
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create config directory")?;
            }
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Reset configuration to defaults (useful for troubleshooting)
    pub async fn reset_to_defaults(&self) -> Result<AppConfig> {
        info!("🔄 Resetting configuration to defaults");

        let default_config = AppConfig::default();
        self.save_config(&default_config).await?;

        Ok(default_config)
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Source site URLs
pub mod endpoints {
    /// Commodities overview page with one table per commodity group
    pub const COMMODITIES_PAGE: &str = "https://tradingeconomics.com/commodities";
}

/// Default configuration values
pub mod defaults {
    /// Directory name under the user config dir
    pub const APP_DIR_NAME: &str = "commodity-scraper";

    /// Config file name
    pub const CONFIG_FILE_NAME: &str = "config.json";

    /// Default target commodities, in matching priority order
    pub const TARGET_COMMODITIES: &[&str] = &["Lithium", "Lead", "Cobalt"];

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    pub const USER_AGENT: &str = "Mozilla/5.0";
    pub const ACCEPT: &str = "text/html";
    pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

    // Parsing defaults
    pub const TABLE_SELECTOR: &str = "table";
    pub const ROW_SELECTOR: &str = "tr";
    pub const CELL_SELECTOR: &str = "td, th";

    /// Element id the source site uses for the live price
    pub const PRICE_ID: &str = "p";

    pub const PRICE_CLASS_PATTERN: &str = "price";

    /// Inline element kinds searched for a digit-bearing price, in priority order
    pub const INLINE_PRICE_TAGS: &[&str] = &["span", "div", "strong"];

    // Log configuration defaults
    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = true;
    pub const LOG_FILE_NAME: &str = "commodity_scraper.log";
    pub const LOG_MAX_FILES: u32 = 5;
    pub const LOG_AUTO_CLEANUP: bool = true;

    /// Default summary CSV path
    pub const CSV_EXPORT_PATH: &str = "commodity_prices_summary.csv";
}
