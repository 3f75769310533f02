//! Row label normalization and canonical target matching

use regex::Regex;

use super::{ScrapeError, ScrapeResult};

/// Anything that is not a word character, whitespace or hyphen
const LABEL_NOISE_PATTERN: &str = r"[^\w\s-]";

/// Matches raw row labels against an ordered list of canonical targets
#[derive(Debug, Clone)]
pub struct NameMatcher {
    targets: Vec<String>,
    /// Lowercased targets, index-aligned with `targets`
    needles: Vec<String>,
    label_noise: Regex,
}

impl NameMatcher {
    pub fn new<I, S>(targets: I) -> ScrapeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let label_noise = Regex::new(LABEL_NOISE_PATTERN)
            .map_err(|e| ScrapeError::configuration("label_noise", e.to_string()))?;
        let targets: Vec<String> = targets.into_iter().map(Into::into).collect();
        let needles = targets.iter().map(|t| t.to_lowercase()).collect();

        Ok(Self {
            targets,
            needles,
            label_noise,
        })
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Normalize a raw label: first line only, trimmed, noise characters removed
    pub fn clean(&self, raw_label: &str) -> String {
        let first_line = raw_label
            .split(['\n', '\r'])
            .next()
            .unwrap_or_default()
            .trim();
        self.label_noise.replace_all(first_line, "").trim().to_string()
    }

    /// First target (in configured order) contained in the label, case-insensitively
    pub fn match_target(&self, normalized_label: &str) -> Option<&str> {
        let label = normalized_label.to_lowercase();
        self.needles
            .iter()
            .position(|needle| label.contains(needle.as_str()))
            .map(|i| self.targets[i].as_str())
    }

    /// Clean then match in one step
    pub fn resolve(&self, raw_label: &str) -> Option<&str> {
        self.match_target(&self.clean(raw_label))
    }
}
