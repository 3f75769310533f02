//! Price cell extraction with ordered fallback strategies
//!
//! The price column markup differs between site revisions, so extraction
//! walks a priority list from the most specific marker down to the plain
//! cell text. The first strategy producing non-empty text wins.

use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Selector};
use tracing::trace;

use super::config::ParsingConfig;
use super::{visible_text, ScrapeError, ScrapeResult};

/// One price extraction heuristic
#[derive(Debug, Clone)]
pub enum PriceStrategy {
    /// Descendant carrying the reserved price id
    ReservedId { selector: Selector },

    /// First descendant whose class attribute matches the pattern
    ClassPattern { any_class: Selector, pattern: Regex },

    /// First inline element (by kind priority, then document order) whose text has a digit
    DigitBearingInline { tags: Vec<Selector>, digit: Regex },

    /// Visible text of the whole cell
    CellText,
}

impl PriceStrategy {
    pub fn reserved_id(id: &str) -> ScrapeResult<Self> {
        let css = format!("[id=\"{id}\"]");
        let selector = Selector::parse(&css).map_err(|e| ScrapeError::invalid_selector(&css, e))?;
        Ok(Self::ReservedId { selector })
    }

    pub fn class_pattern(pattern: &str) -> ScrapeResult<Self> {
        let any_class = Selector::parse("[class]").map_err(|e| ScrapeError::invalid_selector("[class]", e))?;
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ScrapeError::configuration("price_class_pattern", e.to_string()))?;
        Ok(Self::ClassPattern { any_class, pattern })
    }

    pub fn digit_bearing_inline<S: AsRef<str>>(tags: &[S]) -> ScrapeResult<Self> {
        let tags = tags
            .iter()
            .map(|tag| {
                let tag = tag.as_ref();
                Selector::parse(tag).map_err(|e| ScrapeError::invalid_selector(tag, e))
            })
            .collect::<ScrapeResult<Vec<_>>>()?;
        let digit = Regex::new(r"\d").map_err(|e| ScrapeError::configuration("inline_tags", e.to_string()))?;
        Ok(Self::DigitBearingInline { tags, digit })
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::ReservedId { .. } => "reserved_id",
            Self::ClassPattern { .. } => "class_pattern",
            Self::DigitBearingInline { .. } => "digit_bearing_inline",
            Self::CellText => "cell_text",
        }
    }

    /// Apply this strategy alone; `None` when it yields nothing usable
    pub fn apply(&self, cell: ElementRef<'_>) -> Option<String> {
        let text = match self {
            Self::ReservedId { selector } => cell.select(selector).next().map(visible_text),
            Self::ClassPattern { any_class, pattern } => cell
                .select(any_class)
                .find(|el| el.value().attr("class").is_some_and(|class| pattern.is_match(class)))
                .map(visible_text),
            Self::DigitBearingInline { tags, digit } => tags.iter().find_map(|tag| {
                cell.select(tag)
                    .map(visible_text)
                    .find(|text| digit.is_match(text))
            }),
            Self::CellText => Some(visible_text(cell)),
        };
        text.filter(|t| !t.is_empty())
    }
}

/// Pulls raw price text out of a price cell
#[derive(Debug, Clone)]
pub struct PriceExtractor {
    strategies: Vec<PriceStrategy>,
}

impl PriceExtractor {
    /// Create an extractor with the default marker configuration
    pub fn new() -> ScrapeResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    /// Build the standard strategy chain from configuration
    pub fn with_config(config: &ParsingConfig) -> ScrapeResult<Self> {
        Ok(Self {
            strategies: vec![
                PriceStrategy::reserved_id(&config.price_id)?,
                PriceStrategy::class_pattern(&config.price_class_pattern)?,
                PriceStrategy::digit_bearing_inline(config.inline_tags.as_slice())?,
                PriceStrategy::CellText,
            ],
        })
    }

    pub fn strategies(&self) -> &[PriceStrategy] {
        &self.strategies
    }

    pub fn extract(&self, price_cell: ElementRef<'_>) -> Option<String> {
        self.strategies.iter().find_map(|strategy| {
            let text = strategy.apply(price_cell)?;
            trace!("Price text {:?} extracted by {}", text, strategy.name());
            Some(text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    /// Parse a fragment and hand the first `td` to the closure
    fn with_cell<R>(cell_html: &str, f: impl FnOnce(ElementRef<'_>) -> R) -> R {
        let html = Html::parse_fragment(&format!("<table><tr>{cell_html}</tr></table>"));
        let td = Selector::parse("td").unwrap();
        let cell = html.select(&td).next().unwrap();
        f(cell)
    }

    #[test]
    fn test_reserved_id_wins_over_everything() {
        let extractor = PriceExtractor::new().unwrap();
        let got = with_cell(
            r#"<td><span class="price">1</span><b id="p">2,345.00</b>99</td>"#,
            |cell| extractor.extract(cell),
        );
        assert_eq!(got.as_deref(), Some("2,345.00"));
    }

    #[test]
    fn test_reserved_id_absent_yields_none() {
        let strategy = PriceStrategy::reserved_id("p").unwrap();
        let got = with_cell(r#"<td><span class="price">12.00</span></td>"#, |cell| strategy.apply(cell));
        assert_eq!(got, None);
    }

    #[test]
    fn test_reserved_id_nested_element_text() {
        let strategy = PriceStrategy::reserved_id("p").unwrap();
        let got = with_cell(r#"<td><div><b id="p"> 5,010.25 </b></div>7</td>"#, |cell| strategy.apply(cell));
        assert_eq!(got.as_deref(), Some("5,010.25"));
    }

    #[test]
    fn test_cell_text_joins_trimmed_pieces() {
        let got = with_cell("<td> <i>1</i>2 </td>", |cell| PriceStrategy::CellText.apply(cell));
        assert_eq!(got.as_deref(), Some("12"));
    }

    #[test]
    fn test_cell_text_of_blank_cell_is_none() {
        let got = with_cell("<td>\n  </td>", |cell| PriceStrategy::CellText.apply(cell));
        assert_eq!(got, None);
    }

    #[test]
    fn test_class_pattern_is_case_insensitive() {
        let strategy = PriceStrategy::class_pattern("price").unwrap();
        let got = with_cell(r#"<td><em class="Quote-PRICE big">88.10</em></td>"#, |cell| strategy.apply(cell));
        assert_eq!(got.as_deref(), Some("88.10"));
    }

    #[test]
    fn test_inline_follows_tag_priority() {
        let strategy = PriceStrategy::digit_bearing_inline(&["span", "div", "strong"]).unwrap();
        let got = with_cell(
            "<td><strong>300</strong><div>label</div><span>n/a</span><span>12.5</span></td>",
            |cell| strategy.apply(cell),
        );
        assert_eq!(got.as_deref(), Some("12.5"));
    }

    #[test]
    fn test_inline_skips_text_without_digits() {
        let strategy = PriceStrategy::digit_bearing_inline(&["span"]).unwrap();
        let got = with_cell("<td><span>up</span><span>down</span></td>", |cell| strategy.apply(cell));
        assert_eq!(got, None);
    }

    #[test]
    fn test_inline_accepts_non_ascii_digits() {
        let strategy = PriceStrategy::digit_bearing_inline(&["span"]).unwrap();
        let got = with_cell("<td><span>up</span><span>٣٤</span></td>", |cell| strategy.apply(cell));
        assert_eq!(got.as_deref(), Some("٣٤"));
    }

    #[test]
    fn test_nested_element_price() {
        let extractor = PriceExtractor::new().unwrap();
        let got = with_cell("<td><span><i>1,234.50</i></span></td>", |cell| extractor.extract(cell));
        assert_eq!(got.as_deref(), Some("1,234.50"));
    }

    #[test]
    fn test_cell_text_fallback_strips_whitespace() {
        let extractor = PriceExtractor::new().unwrap();
        let got = with_cell("<td>\n   4,100.00 \n</td>", |cell| extractor.extract(cell));
        assert_eq!(got.as_deref(), Some("4,100.00"));
    }

    #[test]
    fn test_empty_reserved_id_falls_through() {
        let extractor = PriceExtractor::new().unwrap();
        let got = with_cell(r#"<td><span id="p"> </span><strong>77</strong></td>"#, |cell| {
            extractor.extract(cell)
        });
        assert_eq!(got.as_deref(), Some("77"));
    }

    #[test]
    fn test_empty_cell_yields_none() {
        let extractor = PriceExtractor::new().unwrap();
        let got = with_cell("<td>   </td>", |cell| extractor.extract(cell));
        assert_eq!(got, None);
    }

    #[test]
    fn test_default_chain_order() {
        let extractor = PriceExtractor::new().unwrap();
        let names: Vec<_> = extractor.strategies().iter().map(PriceStrategy::name).collect();
        assert_eq!(names, ["reserved_id", "class_pattern", "digit_bearing_inline", "cell_text"]);
    }
}
