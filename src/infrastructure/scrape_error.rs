//! Scrape error types
//!
//! Detailed error types for fetching and parsing commodity quote pages,
//! with a recoverability classification used by the scan loop.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ScrapeError {
    #[error("Failed to build HTTP client: {message}")]
    ClientBuildFailed { message: String },

    #[error("HTTP request failed: {url} - {message}")]
    TransportFailed { url: String, message: String },

    #[error("HTTP request failed: {status} - {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Empty response from {source_name}")]
    EmptyDocument { source_name: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Could not parse price: {raw:?} - {reason}")]
    PriceUnparsable { raw: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String, field: String },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl ScrapeError {
    /// Create an invalid selector error
    pub fn invalid_selector(selector: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a price parse error carrying the raw cell text
    pub fn price_unparsable(raw: &str, reason: impl std::fmt::Display) -> Self {
        Self::PriceUnparsable {
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a configuration error for a named field
    pub fn configuration(field: &str, message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            field: field.to_string(),
        }
    }

    /// Check if the scan can carry on after this error
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::PriceUnparsable { .. } => true,
            Self::ClientBuildFailed { .. }
            | Self::TransportFailed { .. }
            | Self::HttpStatus { .. }
            | Self::EmptyDocument { .. }
            | Self::InvalidSelector { .. }
            | Self::ConfigurationError { .. }
            | Self::Io { .. } => false,
        }
    }

    /// True for errors raised while obtaining the document
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::TransportFailed { .. } | Self::HttpStatus { .. } | Self::EmptyDocument { .. } | Self::Io { .. }
        )
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_parse_failure_is_recoverable() {
        let err = ScrapeError::price_unparsable("N/A", "no digits");
        assert!(err.is_recoverable());
        assert!(!err.is_fetch_failure());
    }

    #[test]
    fn test_transport_failure_aborts() {
        let err = ScrapeError::TransportFailed {
            url: "https://example.com".into(),
            message: "connection refused".into(),
        };
        assert!(!err.is_recoverable());
        assert!(err.is_fetch_failure());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_http_status_is_not_recoverable() {
        for status in [404, 503] {
            let err = ScrapeError::HttpStatus {
                status,
                url: "https://example.com".into(),
            };
            assert!(!err.is_recoverable());
            assert!(err.is_fetch_failure());
        }
    }
}
