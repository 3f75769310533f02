//! Raw price text -> validated numeric value

use regex::Regex;

use super::{ScrapeError, ScrapeResult};

/// Everything except decimal digits (any script), periods and commas
const NON_NUMERIC_PATTERN: &str = r"[^\d.,]";

/// Zero code points of the non-ASCII decimal digit runs we normalize
const DECIMAL_ZEROS: &[u32] = &[
    0x0660, // Arabic-Indic
    0x06F0, // Extended Arabic-Indic
    0x07C0, // NKo
    0x0966, // Devanagari
    0x09E6, // Bengali
    0x0A66, // Gurmukhi
    0x0AE6, // Gujarati
    0x0B66, // Oriya
    0x0BE6, // Tamil
    0x0C66, // Telugu
    0x0CE6, // Kannada
    0x0D66, // Malayalam
    0x0E50, // Thai
    0x0ED0, // Lao
    0x0F20, // Tibetan
    0x1040, // Myanmar
    0x17E0, // Khmer
    0x1810, // Mongolian
    0xFF10, // Fullwidth
];

/// Map a decimal digit of a known script to its ASCII form
fn to_ascii_digit(c: char) -> Option<char> {
    if c.is_ascii_digit() {
        return Some(c);
    }
    DECIMAL_ZEROS.iter().find_map(|&zero| {
        let offset = u32::from(c).checked_sub(zero)?;
        char::from_digit(offset, 10)
    })
}

/// Converts price cell text into a non-negative finite number.
///
/// Commas are always treated as thousands separators, never as decimal
/// separators, so `"1,234.50"` parses as `1234.5`.
#[derive(Debug, Clone)]
pub struct PriceParser {
    non_numeric: Regex,
}

impl PriceParser {
    pub fn new() -> ScrapeResult<Self> {
        let non_numeric = Regex::new(NON_NUMERIC_PATTERN)
            .map_err(|e| ScrapeError::configuration("non_numeric", e.to_string()))?;
        Ok(Self { non_numeric })
    }

    pub fn parse(&self, raw_text: &str) -> ScrapeResult<f64> {
        let digits: String = self
            .non_numeric
            .replace_all(raw_text, "")
            .chars()
            .filter(|&c| c != ',')
            .map(|c| to_ascii_digit(c).unwrap_or(c))
            .collect();
        if digits.is_empty() {
            return Err(ScrapeError::price_unparsable(raw_text, "no numeric characters"));
        }

        let value: f64 = digits
            .parse()
            .map_err(|e| ScrapeError::price_unparsable(raw_text, e))?;

        // Overlong digit runs overflow to infinity
        if !value.is_finite() {
            return Err(ScrapeError::price_unparsable(raw_text, "value is not finite"));
        }
        Ok(value)
    }
}
