//! Scrape diagnostics and run report
//!
//! Warnings and errors raised during a run are collected here as data so
//! callers (and tests) can inspect them instead of scraping log output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::commodity::PriceMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticSeverity {
    Warning,
    Error,
}

/// Something noteworthy that happened during a scrape run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScrapeDiagnostic {
    /// The document could not be obtained; the run was abandoned
    FetchFailed { message: String },

    /// A target row was found but its price text could not be parsed
    PriceUnparsable { target: String, raw: String },

    /// A target row was found but its price cell yielded no text at all
    PriceMissing { target: String },

    /// Targets with no valid record after the full scan
    MissingTargets { names: Vec<String> },
}

impl ScrapeDiagnostic {
    pub const fn severity(&self) -> DiagnosticSeverity {
        match self {
            Self::FetchFailed { .. } => DiagnosticSeverity::Error,
            Self::PriceUnparsable { .. } | Self::PriceMissing { .. } | Self::MissingTargets { .. } => {
                DiagnosticSeverity::Warning
            }
        }
    }
}

impl fmt::Display for ScrapeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed { message } => write!(f, "Failed to fetch page: {message}"),
            Self::PriceUnparsable { target, raw } => {
                write!(f, "Could not parse price for {target}: {raw:?}")
            }
            Self::PriceMissing { target } => write!(f, "No price text found for {target}"),
            Self::MissingTargets { names } => write!(f, "Missing commodities: {}", names.join(", ")),
        }
    }
}

/// Outcome of a single orchestrator run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    #[serde(rename = "observedAt")]
    pub observed_at: DateTime<Utc>,
    pub prices: PriceMap,
    pub diagnostics: Vec<ScrapeDiagnostic>,
}

impl ScrapeReport {
    pub const fn new(observed_at: DateTime<Utc>) -> Self {
        Self {
            observed_at,
            prices: PriceMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Targets reported missing at the end of the run, if any
    pub fn missing_targets(&self) -> BTreeSet<&str> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                ScrapeDiagnostic::MissingTargets { names } => Some(names),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// True when the fetch step failed
    pub fn fetch_failed(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, ScrapeDiagnostic::FetchFailed { .. }))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ScrapeDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == DiagnosticSeverity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn into_prices(self) -> PriceMap {
        self.prices
    }
}
