//! Document sources for the scrape run
//!
//! The orchestrator only needs the raw HTML of the commodities page. It is
//! obtained through [`DocumentSource`]: over HTTP with [`HttpClient`], or from
//! a saved page with [`FileDocumentSource`].

#![allow(clippy::uninlined_format_args)]

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION};
use reqwest::{Client, ClientBuilder};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::infrastructure::config::ScraperConfig;
use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

/// Something that can hand over the raw HTML of the commodities page
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Human-readable origin for logs (URL or file path)
    fn describe(&self) -> String;

    /// Fetch the raw document text
    async fn fetch_document(&self) -> ScrapeResult<String>;
}

/// HTTP client issuing a single browser-like GET against the configured endpoint
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    endpoint: String,
}

impl HttpClient {
    /// Create a new HTTP client from scraper configuration
    pub fn with_config(config: &ScraperConfig) -> ScrapeResult<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .default_headers(Self::default_headers(config)?)
            .gzip(true)
            .build()
            .map_err(|e| ScrapeError::ClientBuildFailed { message: e.to_string() })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    fn default_headers(config: &ScraperConfig) -> ScrapeResult<HeaderMap> {
        let header = |field: &str, value: &str| {
            HeaderValue::from_str(value)
                .map_err(|e| ScrapeError::configuration(field, format!("invalid header value {:?}: {}", value, e)))
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header("accept", &config.accept)?);
        headers.insert(ACCEPT_LANGUAGE, header("accept_language", &config.accept_language)?);
        if config.keep_alive {
            headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        }
        Ok(headers)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch HTML content and return it as a string
    pub async fn fetch_html_string(&self) -> ScrapeResult<String> {
        let url = self.endpoint.as_str();
        info!("🌐 HTTP GET: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| ScrapeError::TransportFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("❌ HTTP error {}: {}", status, url);
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| ScrapeError::TransportFailed {
            url: url.to_string(),
            message: format!("Failed to read response body: {}", e),
        })?;

        if body.trim().is_empty() {
            return Err(ScrapeError::EmptyDocument {
                source_name: url.to_string(),
            });
        }

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[async_trait]
impl DocumentSource for HttpClient {
    fn describe(&self) -> String {
        self.endpoint.clone()
    }

    async fn fetch_document(&self) -> ScrapeResult<String> {
        self.fetch_html_string().await
    }
}

/// Reads a previously saved commodities page from disk
#[derive(Debug, Clone)]
pub struct FileDocumentSource {
    path: PathBuf,
}

impl FileDocumentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for FileDocumentSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_document(&self) -> ScrapeResult<String> {
        info!("📄 Reading HTML from: {:?}", self.path);
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|e| ScrapeError::Io {
            path: self.describe(),
            message: e.to_string(),
        })?;

        if body.trim().is_empty() {
            return Err(ScrapeError::EmptyDocument {
                source_name: self.describe(),
            });
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::with_config(&ScraperConfig::default()).unwrap();
        assert_eq!(client.endpoint(), "https://tradingeconomics.com/commodities");
    }

    #[test]
    fn test_invalid_header_value_is_a_config_error() {
        let config = ScraperConfig {
            accept_language: "en\nUS".into(),
            ..ScraperConfig::default()
        };
        assert!(matches!(
            HttpClient::with_config(&config),
            Err(ScrapeError::ConfigurationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_source_reads_document() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "<table></table>").unwrap();

        let source = FileDocumentSource::new(file.path());
        assert_eq!(source.fetch_document().await.unwrap(), "<table></table>");
    }

    #[tokio::test]
    async fn test_file_source_errors() {
        let missing = FileDocumentSource::new("/definitely/not/here.html");
        let err = missing.fetch_document().await.unwrap_err();
        assert!(err.is_fetch_failure());

        let file = NamedTempFile::new().unwrap();
        let empty = FileDocumentSource::new(file.path());
        assert!(matches!(
            empty.fetch_document().await,
            Err(ScrapeError::EmptyDocument { .. })
        ));
    }
}
