//! Parsing configuration for commodity table extraction
//!
//! Centralized configuration for CSS selectors and price-cell heuristics.

use serde::{Deserialize, Serialize};

/// Selectors and markers used while scanning a commodities page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Selector for table-like blocks
    pub table_selector: String,

    /// Selector for rows within a table block
    pub row_selector: String,

    /// Selector for cells within a row
    pub cell_selector: String,

    /// Reserved element id the source site puts on the live price
    pub price_id: String,

    /// Case-insensitive pattern matched against class attributes
    pub price_class_pattern: String,

    /// Inline/emphasis element kinds searched for digit-bearing text, in priority order
    pub inline_tags: Vec<String>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        use crate::infrastructure::config::defaults;
        Self {
            table_selector: defaults::TABLE_SELECTOR.to_string(),
            row_selector: defaults::ROW_SELECTOR.to_string(),
            cell_selector: defaults::CELL_SELECTOR.to_string(),
            price_id: defaults::PRICE_ID.to_string(),
            price_class_pattern: defaults::PRICE_CLASS_PATTERN.to_string(),
            inline_tags: defaults::INLINE_PRICE_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
