use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default quote currency for every scraped price
pub const DEFAULT_CURRENCY: &str = "USD";

/// Default quote unit for every scraped price
pub const DEFAULT_UNIT: &str = "per tonne";

/// A single resolved commodity quote from one scrape run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityPrice {
    /// Canonical commodity name, always one of the configured targets
    pub name: String,
    pub price: f64,
    /// Shared by every record of the same run
    #[serde(rename = "observedAt")]
    pub observed_at: DateTime<Utc>,
    pub currency: String,
    pub unit: String,
}

impl CommodityPrice {
    /// Create a record with the default currency and unit
    pub fn new(name: impl Into<String>, price: f64, observed_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            price,
            observed_at,
            currency: DEFAULT_CURRENCY.to_string(),
            unit: DEFAULT_UNIT.to_string(),
        }
    }

    /// Override currency and unit (e.g. from configuration)
    pub fn with_quote(mut self, currency: &str, unit: &str) -> Self {
        self.currency = currency.to_string();
        self.unit = unit.to_string();
        self
    }
}

/// Result mapping of one run: canonical target name -> resolved record
pub type PriceMap = BTreeMap<String, CommodityPrice>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_quote() {
        let record = CommodityPrice::new("Lithium", 10_500.0, Utc::now());
        assert_eq!(record.currency, "USD");
        assert_eq!(record.unit, "per tonne");
    }

    #[test]
    fn test_with_quote_overrides_defaults() {
        let record = CommodityPrice::new("Lead", 2_000.0, Utc::now()).with_quote("EUR", "per kg");
        assert_eq!(record.currency, "EUR");
        assert_eq!(record.unit, "per kg");
        assert_eq!(record.name, "Lead");
    }
}
