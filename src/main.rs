//! Command line entry point: one scrape run, summary on stdout, optional exports

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use commodity_scraper_lib::infrastructure::logging::{init_logging_with_config, log_system_info};
use commodity_scraper_lib::infrastructure::summary_export::{export_csv, price_lines, render_table, report_json};
use commodity_scraper_lib::infrastructure::{
    AppConfig, ConfigManager, DocumentSource, FileDocumentSource, HttpClient,
};
use commodity_scraper_lib::{ScrapeOrchestrator, ScrapeReport};

#[derive(Parser)]
#[command(name = "commodity-scraper")]
#[command(about = "Scrape commodity prices from a public quotes page")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated target commodities, in matching priority order
    #[arg(long, value_delimiter = ',')]
    targets: Option<Vec<String>>,

    /// Read the page from a saved HTML file instead of the network
    #[arg(long)]
    html_file: Option<PathBuf>,

    /// CSV summary output path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Skip the CSV summary export
    #[arg(long)]
    no_csv: bool,

    /// Print the full report as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Log level override ("error", "warn", "info", "debug", "trace")
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(targets) = &self.targets {
            config.scraper.targets = targets.iter().map(|t| t.trim().to_string()).collect();
        }
        if let Some(csv) = &self.csv {
            config.export.csv_path = csv.clone();
        }
        if self.no_csv {
            config.export.csv_enabled = false;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

async fn load_config(cli: &Cli) -> Result<AppConfig> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load_config().await?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn scrape<S: DocumentSource>(source: S, config: &AppConfig) -> Result<ScrapeReport> {
    let orchestrator = ScrapeOrchestrator::from_config(source, config)?;
    Ok(orchestrator.run().await)
}

fn present(report: &ScrapeReport, config: &AppConfig, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", report_json(report)?);
    } else if report.is_empty() {
        println!("No prices were scraped.");
    } else {
        for line in price_lines(&report.prices) {
            println!("{}", line);
        }
        println!("\nCommodity Price Summary:");
        println!("{}", render_table(&report.prices));
    }

    if config.export.csv_enabled && !report.is_empty() {
        export_csv(&config.export.csv_path, &report.prices)?;
        info!("Summary saved to: {:?}", config.export.csv_path);
        if !as_json {
            println!("\nSummary saved to: {}", config.export.csv_path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli).await?;

    init_logging_with_config(&config.logging)?;
    log_system_info();

    let report = match &cli.html_file {
        Some(path) => scrape(FileDocumentSource::new(path), &config).await?,
        None => scrape(HttpClient::with_config(&config.scraper)?, &config).await?,
    };

    if !report.diagnostics.is_empty() {
        warn!("Scrape finished with {} diagnostic(s)", report.diagnostics.len());
    }

    present(&report, &config, cli.json)?;

    Ok(if report.fetch_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
