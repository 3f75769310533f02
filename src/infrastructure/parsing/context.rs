//! Scan context shared by every row of a single run

use chrono::{DateTime, Utc};

use super::{NameMatcher, ScrapeResult};

/// Context information for a table scan
#[derive(Debug, Clone)]
pub struct ScanContext {
    /// Matcher over the canonical targets, in priority order
    pub matcher: NameMatcher,

    /// Timestamp stamped on every record of the run
    pub observed_at: DateTime<Utc>,

    /// Currency written on produced records
    pub currency: String,

    /// Unit written on produced records
    pub unit: String,
}

impl ScanContext {
    /// Create new scan context with default quote currency and unit
    pub fn new(targets: Vec<String>, observed_at: DateTime<Utc>) -> ScrapeResult<Self> {
        use crate::domain::commodity::{DEFAULT_CURRENCY, DEFAULT_UNIT};

        Ok(Self {
            matcher: NameMatcher::new(targets)?,
            observed_at,
            currency: DEFAULT_CURRENCY.to_string(),
            unit: DEFAULT_UNIT.to_string(),
        })
    }

    /// Set quote currency and unit
    pub fn with_quote(mut self, currency: &str, unit: &str) -> Self {
        self.currency = currency.to_string();
        self.unit = unit.to_string();
        self
    }

    /// Same targets and quote, new run timestamp
    pub fn restamped(&self, observed_at: DateTime<Utc>) -> Self {
        Self {
            observed_at,
            ..self.clone()
        }
    }

    pub fn targets(&self) -> &[String] {
        self.matcher.targets()
    }
}
