//! Summary table and exports for a scrape report
//!
//! Console lines, a fixed-width summary table, CSV and JSON output.

use chrono::{DateTime, Local, Utc};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::domain::commodity::{DEFAULT_CURRENCY, DEFAULT_UNIT};
use crate::domain::{PriceMap, ScrapeReport};
use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

/// Local wall-clock time with its UTC offset, e.g. `2024-03-01 10:30:00 +01:00`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

fn display_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

/// One row of the summary table, already formatted for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub commodity: String,
    pub price: String,
    pub timestamp: String,
}

/// Format with a fixed number of decimals and comma thousands separators
pub fn format_price(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (sign, unsigned) = formatted
        .strip_prefix('-')
        .map_or(("", formatted.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

fn currency_prefix(currency: &str) -> String {
    if currency == "USD" {
        "$".to_string()
    } else {
        format!("{currency} ")
    }
}

/// `Lithium: $10,750.00 per tonne`, one line per record
pub fn price_lines(prices: &PriceMap) -> Vec<String> {
    prices
        .values()
        .map(|p| {
            format!(
                "{}: {}{} {}",
                p.name,
                currency_prefix(&p.currency),
                format_price(p.price, 2),
                p.unit
            )
        })
        .collect()
}

/// Header of the price column, e.g. `Price (USD/tonne)`
pub fn price_header(prices: &PriceMap) -> String {
    let (currency, unit) = prices
        .values()
        .next()
        .map_or((DEFAULT_CURRENCY, DEFAULT_UNIT), |p| (p.currency.as_str(), p.unit.as_str()));
    format!("Price ({}/{})", currency, unit.trim_start_matches("per ").trim())
}

pub fn summary_rows(prices: &PriceMap) -> Vec<SummaryRow> {
    prices
        .values()
        .map(|p| SummaryRow {
            commodity: p.name.clone(),
            price: format_price(p.price, 2),
            timestamp: display_timestamp(&p.observed_at),
        })
        .collect()
}

fn header_cells(prices: &PriceMap) -> [String; 3] {
    ["Commodity".to_string(), price_header(prices), "Timestamp".to_string()]
}

/// Right-aligned fixed-width table; empty string when there is nothing to show
pub fn render_table(prices: &PriceMap) -> String {
    let rows = summary_rows(prices);
    if rows.is_empty() {
        return String::new();
    }

    let header = header_cells(prices);
    let body: Vec<[&str; 3]> = rows
        .iter()
        .map(|r| [r.commodity.as_str(), r.price.as_str(), r.timestamp.as_str()])
        .collect();

    let mut widths = header.each_ref().map(|h| h.chars().count());
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_line = |cells: [&str; 3]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:>width$}"))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut lines = vec![render_line(header.each_ref().map(String::as_str))];
    lines.extend(body.into_iter().map(render_line));
    lines.join("\n")
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer
fn write_row<W: Write>(w: &mut W, row: &[&str]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\n")
}

/// Write the summary table as CSV (header row included) to any writer
pub fn write_csv<W: Write>(mut w: W, prices: &PriceMap) -> io::Result<()> {
    let header = header_cells(prices);
    write_row(&mut w, &header.each_ref().map(String::as_str))?;
    for row in summary_rows(prices) {
        write_row(&mut w, &[row.commodity.as_str(), row.price.as_str(), row.timestamp.as_str()])?;
    }
    w.flush()
}

/// Write the summary table to a CSV file
pub fn export_csv(path: &Path, prices: &PriceMap) -> ScrapeResult<()> {
    let io_error = |e: io::Error| ScrapeError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    let file = File::create(path).map_err(io_error)?;
    write_csv(BufWriter::new(file), prices).map_err(io_error)
}

/// Full report (prices and diagnostics) as pretty JSON
pub fn report_json(report: &ScrapeReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
