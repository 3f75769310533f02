//! Table scanner for commodity quote pages
//!
//! Walks every table-like block of a document, treats the first row of each
//! block as a header, and turns target rows into price records. Rows that do
//! not fit (too few cells, unknown label, unusable price) are skipped without
//! aborting the scan.

#![allow(clippy::uninlined_format_args)]

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::config::ParsingConfig;
use super::{visible_text, PriceExtractor, PriceParser, ScanContext, ScrapeError, ScrapeResult};
use crate::domain::{CommodityPrice, PriceMap, ScrapeDiagnostic};

/// Prices collected by one scan plus the recoverable problems met on the way
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub prices: PriceMap,
    pub diagnostics: Vec<ScrapeDiagnostic>,
}

/// Scanner over all tables of a document
#[derive(Debug, Clone)]
pub struct TableScanner {
    table_selector: Selector,
    row_selector: Selector,
    cell_selector: Selector,
    extractor: PriceExtractor,
    parser: PriceParser,
}

impl TableScanner {
    /// Create a scanner with default selectors
    pub fn new() -> ScrapeResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    /// Create scanner with custom selector configuration
    pub fn with_config(config: &ParsingConfig) -> ScrapeResult<Self> {
        Ok(Self {
            table_selector: Self::compile_selector(&config.table_selector)?,
            row_selector: Self::compile_selector(&config.row_selector)?,
            cell_selector: Self::compile_selector(&config.cell_selector)?,
            extractor: PriceExtractor::with_config(config)?,
            parser: PriceParser::new()?,
        })
    }

    fn compile_selector(selector: &str) -> ScrapeResult<Selector> {
        Selector::parse(selector).map_err(|e| ScrapeError::invalid_selector(selector, e))
    }

    /// Scan a parsed document for the context's targets
    pub fn scan(&self, html: &Html, context: &ScanContext) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        for (table_index, table) in html.select(&self.table_selector).enumerate() {
            let rows: Vec<ElementRef<'_>> = table.select(&self.row_selector).collect();
            if rows.len() < 2 {
                debug!("Skipping table {} with {} row(s)", table_index, rows.len());
                continue;
            }

            // Row 0 is the header
            for row in rows.into_iter().skip(1) {
                self.scan_row(row, context, &mut outcome);
            }
        }

        debug!(
            "Scan finished: {} record(s), {} diagnostic(s)",
            outcome.prices.len(),
            outcome.diagnostics.len()
        );
        outcome
    }

    fn scan_row(&self, row: ElementRef<'_>, context: &ScanContext, outcome: &mut ScanOutcome) {
        let mut cells = row.select(&self.cell_selector);
        let (Some(label_cell), Some(price_cell)) = (cells.next(), cells.next()) else {
            return;
        };

        let raw_label = visible_text(label_cell);
        let Some(target) = context.matcher.resolve(&raw_label) else {
            return;
        };

        let Some(raw_price) = self.extractor.extract(price_cell) else {
            warn!("No price text found for {} (label {:?})", target, raw_label);
            outcome
                .diagnostics
                .push(ScrapeDiagnostic::PriceMissing { target: target.to_string() });
            return;
        };

        match self.parser.parse(&raw_price) {
            Ok(price) => {
                debug!("Matched {} -> {} (label {:?})", target, price, raw_label);
                let record = CommodityPrice::new(target, price, context.observed_at)
                    .with_quote(&context.currency, &context.unit);
                if outcome.prices.insert(target.to_string(), record).is_some() {
                    debug!("Overwrote earlier price for {}", target);
                }
            }
            Err(e) => {
                warn!("{}", e);
                outcome.diagnostics.push(ScrapeDiagnostic::PriceUnparsable {
                    target: target.to_string(),
                    raw: raw_price,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn context() -> ScanContext {
        ScanContext::new(vec!["Lithium".into(), "Lead".into(), "Cobalt".into()], Utc::now()).unwrap()
    }

    fn scan(body: &str) -> ScanOutcome {
        let html = Html::parse_document(&format!("<html><body>{body}</body></html>"));
        TableScanner::new().unwrap().scan(&html, &context())
    }

    #[test]
    fn test_header_only_table_contributes_nothing() {
        let outcome = scan("<table><tr><td>Lithium</td><td>9,000</td></tr></table>");
        assert!(outcome.prices.is_empty());
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_first_row_is_never_data() {
        let outcome = scan(
            "<table>\
               <tr><td>Lead</td><td>1,999</td></tr>\
               <tr><td>Cobalt</td><td>33,000.00</td></tr>\
             </table>",
        );
        assert_eq!(outcome.prices.len(), 1);
        assert!(outcome.prices.contains_key("Cobalt"));
    }

    #[test]
    fn test_rows_with_one_cell_are_skipped() {
        let outcome = scan(
            "<table>\
               <tr><th>Commodity</th><th>Price</th></tr>\
               <tr><td>Lithium 10,000</td></tr>\
               <tr><th>Lead</th><td>2,012.50</td></tr>\
             </table>",
        );
        assert_eq!(outcome.prices.len(), 1);
        assert!((outcome.prices["Lead"].price - 2012.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unparsable_price_is_reported_and_skipped() {
        let outcome = scan(
            "<table>\
               <tr><th>Commodity</th><th>Price</th></tr>\
               <tr><td>Lithium</td><td>N/A</td></tr>\
               <tr><td>Cobalt</td><td>30,500</td></tr>\
             </table>",
        );
        assert_eq!(outcome.prices.keys().collect::<Vec<_>>(), ["Cobalt"]);
        assert_eq!(
            outcome.diagnostics,
            vec![ScrapeDiagnostic::PriceUnparsable { target: "Lithium".into(), raw: "N/A".into() }]
        );
    }

    #[test]
    fn test_empty_price_cell_is_reported() {
        let outcome = scan(
            "<table>\
               <tr><th>Commodity</th><th>Price</th></tr>\
               <tr><td>Lead</td><td></td></tr>\
             </table>",
        );
        assert!(outcome.prices.is_empty());
        assert_eq!(outcome.diagnostics, vec![ScrapeDiagnostic::PriceMissing { target: "Lead".into() }]);
    }

    #[test]
    fn test_later_table_overwrites_earlier() {
        let outcome = scan(
            "<table><tr><th>A</th><th>B</th></tr><tr><td>Lithium</td><td>100</td></tr></table>\
             <table><tr><th>A</th><th>B</th></tr><tr><td>Lithium</td><td>200</td></tr></table>",
        );
        assert!((outcome.prices["Lithium"].price - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_labels_are_ignored() {
        let outcome = scan(
            "<table>\
               <tr><th>Commodity</th><th>Price</th></tr>\
               <tr><td>Copper</td><td>9,100</td></tr>\
               <tr><td>Gold</td><td>N/A</td></tr>\
             </table>",
        );
        assert!(outcome.prices.is_empty());
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_records_share_context_timestamp_and_quote() {
        let html = Html::parse_document(
            "<table><tr><th>x</th><th>y</th></tr>\
             <tr><td>Lithium</td><td>1</td></tr><tr><td>Lead</td><td>2</td></tr></table>",
        );
        let ctx = context().with_quote("CNY", "per tonne");
        let outcome = TableScanner::new().unwrap().scan(&html, &ctx);

        assert_eq!(outcome.prices.len(), 2);
        for record in outcome.prices.values() {
            assert_eq!(record.observed_at, ctx.observed_at);
            assert_eq!(record.currency, "CNY");
        }
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let config = ParsingConfig {
            table_selector: "table[".into(),
            ..ParsingConfig::default()
        };
        assert!(matches!(
            TableScanner::with_config(&config),
            Err(ScrapeError::InvalidSelector { .. })
        ));
    }
}
