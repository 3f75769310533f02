//! Scrape orchestrator
//!
//! Drives one complete run: stamp the run, obtain the document, scan all
//! tables once, report the targets that could not be resolved.

#![allow(clippy::uninlined_format_args)]

use chrono::Utc;
use scraper::Html;
use std::collections::HashSet;
use tracing::{error, info, warn};

use crate::domain::{ScrapeDiagnostic, ScrapeReport};
use crate::infrastructure::config::{defaults, AppConfig};
use crate::infrastructure::parsing::{ScanContext, TableScanner};
use crate::infrastructure::scrape_error::ScrapeResult;
use crate::infrastructure::simple_http_client::DocumentSource;

/// Runs scrapes against a document source for a fixed target list
pub struct ScrapeOrchestrator<S> {
    source: S,
    scanner: TableScanner,
    /// Targets, quote and matcher; restamped for every run
    context: ScanContext,
}

impl<S: DocumentSource> ScrapeOrchestrator<S> {
    /// Create an orchestrator with default selectors; `None` targets means the default list
    pub fn new(source: S, targets: Option<Vec<String>>) -> ScrapeResult<Self> {
        let targets = targets
            .unwrap_or_else(|| defaults::TARGET_COMMODITIES.iter().map(|s| s.to_string()).collect());

        Ok(Self {
            source,
            scanner: TableScanner::new()?,
            context: ScanContext::new(targets, Utc::now())?,
        })
    }

    /// Create an orchestrator from the full application configuration
    pub fn from_config(source: S, config: &AppConfig) -> ScrapeResult<Self> {
        config.scraper.validate()?;

        let context = ScanContext::new(config.scraper.targets.clone(), Utc::now())?
            .with_quote(&config.scraper.currency, &config.scraper.unit);

        Ok(Self {
            source,
            scanner: TableScanner::with_config(&config.parsing)?,
            context,
        })
    }

    pub fn targets(&self) -> &[String] {
        self.context.targets()
    }

    /// Execute one scrape run.
    ///
    /// Never fails: a fetch failure yields an empty report carrying a
    /// `FetchFailed` diagnostic, and everything else degrades to whatever
    /// subset of targets could be extracted.
    pub async fn run(&self) -> ScrapeReport {
        let observed_at = Utc::now();
        let mut report = ScrapeReport::new(observed_at);

        info!("Starting scrape of {} for {:?}", self.source.describe(), self.targets());

        let body = match self.source.fetch_document().await {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to fetch page: {}", e);
                report
                    .diagnostics
                    .push(ScrapeDiagnostic::FetchFailed { message: e.to_string() });
                return report;
            }
        };

        let html = Html::parse_document(&body);
        let outcome = self.scanner.scan(&html, &self.context.restamped(observed_at));
        report.prices = outcome.prices;
        report.diagnostics.extend(outcome.diagnostics);

        let missing = self.missing_targets(&report);
        if !missing.is_empty() {
            warn!("Missing commodities: {}", missing.join(", "));
            report
                .diagnostics
                .push(ScrapeDiagnostic::MissingTargets { names: missing });
        }

        info!(
            "Scrape finished: {}/{} commodities resolved",
            report.prices.len(),
            self.targets().len()
        );
        report
    }

    /// Configured targets without a record, in target order, without duplicates
    fn missing_targets(&self, report: &ScrapeReport) -> Vec<String> {
        let mut seen = HashSet::new();
        self.targets()
            .iter()
            .filter(|target| !report.prices.contains_key(target.as_str()))
            .filter(|target| seen.insert(target.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::scrape_error::ScrapeError;
    use async_trait::async_trait;

    struct StaticSource(&'static str);

    #[async_trait]
    impl DocumentSource for StaticSource {
        fn describe(&self) -> String {
            "static".into()
        }

        async fn fetch_document(&self) -> ScrapeResult<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl DocumentSource for FailingSource {
        fn describe(&self) -> String {
            "failing".into()
        }

        async fn fetch_document(&self) -> ScrapeResult<String> {
            Err(ScrapeError::TransportFailed {
                url: "https://example.com".into(),
                message: "operation timed out".into(),
            })
        }
    }

    const PAGE: &str = "<table>\
        <tr><th>Metals</th><th>Price</th></tr>\
        <tr><td>Lithium</td><td>10,750.00</td></tr>\
        <tr><td>Cobalt</td><td>33,335</td></tr>\
        </table>";

    #[test]
    fn test_default_targets_when_omitted() {
        let orchestrator = ScrapeOrchestrator::new(StaticSource(PAGE), None).unwrap();
        assert_eq!(orchestrator.targets(), ["Lithium", "Lead", "Cobalt"]);
    }

    #[tokio::test]
    async fn test_run_reports_missing_targets() {
        let orchestrator = ScrapeOrchestrator::new(StaticSource(PAGE), None).unwrap();
        let report = orchestrator.run().await;

        assert_eq!(report.prices.len(), 2);
        assert_eq!(report.missing_targets().into_iter().collect::<Vec<_>>(), ["Lead"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_returns_empty_report() {
        let orchestrator = ScrapeOrchestrator::new(FailingSource, None).unwrap();
        let report = orchestrator.run().await;

        assert!(report.is_empty());
        assert!(report.fetch_failed());
        assert!(report.missing_targets().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_targets_reported_once() {
        let targets = vec!["Lead".to_string(), "Lead".to_string()];
        let orchestrator = ScrapeOrchestrator::new(StaticSource(PAGE), Some(targets)).unwrap();
        let report = orchestrator.run().await;

        assert_eq!(
            report.diagnostics,
            vec![ScrapeDiagnostic::MissingTargets { names: vec!["Lead".into()] }]
        );
    }

    #[tokio::test]
    async fn test_from_config_applies_quote() {
        let mut config = AppConfig::default();
        config.scraper.currency = "CNY".into();
        let orchestrator = ScrapeOrchestrator::from_config(StaticSource(PAGE), &config).unwrap();

        let report = orchestrator.run().await;
        assert!(report.prices.values().all(|p| p.currency == "CNY"));
    }

    #[test]
    fn test_from_config_validates() {
        let mut config = AppConfig::default();
        config.scraper.targets.clear();
        assert!(ScrapeOrchestrator::from_config(StaticSource(PAGE), &config).is_err());
    }
}
