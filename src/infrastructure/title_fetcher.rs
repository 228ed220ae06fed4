//! Best-effort page title scraping.
//!
//! Used to prefill bookmark titles. Every failure (bad url, network error,
//! missing tag) collapses to an empty string.

use regex::Regex;
use reqwest::Client;
use url::Url;

use crate::domain::config::FetchConfig;
use crate::domain::{AppError, Result};

/// HTTP client that pulls `<title>` out of a page.
#[derive(Debug, Clone)]
pub struct TitleFetcher {
    client: Client,
    pattern: Regex,
}

impl TitleFetcher {
    /// Build a fetcher with the configured timeout and user agent.
    ///
    /// # Errors
    /// Returns `Config` if the HTTP client cannot be constructed.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Config {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        let pattern = Regex::new(r"(?i)<title>(.*?)</title>").map_err(|e| AppError::Config {
            message: format!("Invalid title pattern: {e}"),
        })?;

        Ok(Self { client, pattern })
    }

    /// Fetch `url` and return its page title, or `""` on any failure.
    pub async fn fetch_title(&self, url: &str) -> String {
        let parsed = match Url::parse(url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => u,
            _ => {
                tracing::debug!(url, "Refusing to fetch title for non-http url");
                return String::new();
            }
        };

        let response = match self.client.get(parsed).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, error = %e, "Failed to fetch page title");
                return String::new();
            }
        };

        match response.text().await {
            Ok(html) => self.extract_title(&html),
            Err(e) => {
                tracing::warn!(url, error = %e, "Failed to read page body");
                String::new()
            }
        }
    }

    /// Trimmed contents of the first single-line `<title>` element.
    #[must_use]
    pub fn extract_title(&self, html: &str) -> String {
        self.pattern
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> TitleFetcher {
        TitleFetcher::new(&FetchConfig::default()).unwrap()
    }

    #[test]
    fn test_extract_title() {
        let f = fetcher();
        assert_eq!(
            f.extract_title("<html><head><TITLE>  Rust Blog </TITLE></head></html>"),
            "Rust Blog"
        );
        assert_eq!(f.extract_title("<title>a</title><title>b</title>"), "a");
        assert_eq!(f.extract_title("<html><body>no title</body></html>"), "");
        assert_eq!(f.extract_title("<title>\nsplit\n</title>"), "");
    }

    #[tokio::test]
    async fn test_non_http_url_yields_empty() {
        let f = fetcher();
        assert_eq!(f.fetch_title("file:///etc/passwd").await, "");
        assert_eq!(f.fetch_title("not a url").await, "");
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_empty() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert_eq!(fetcher().fetch_title(&format!("http://{addr}/")).await, "");
    }
}
