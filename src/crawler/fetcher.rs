//! HTTP fetcher for listing pages
//!
//! One GET per page with a fixed User-Agent. Any transport failure or
//! non-success status is a failed fetch; there is no retry.

use crate::config::CrawlConfig;
use crate::crawler::parser::{extract_item_links, parse_link_selector};
use reqwest::Client;
use scraper::Selector;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while fetching a listing page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid link selector {0}")]
    InvalidSelector(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Builds the HTTP client used for listing requests
///
/// # Example
///
/// ```no_run
/// use pagesweep::crawler::build_http_client;
///
/// let client = build_http_client("Mozilla/5.0").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches listing pages and pulls item links out of them
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    selector: Selector,
}

impl PageFetcher {
    /// Creates a fetcher from the crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(PageFetcher)` - Client built and selector parsed
    /// * `Err(FetchError)` - The selector is invalid or the client could not be built
    pub fn new(config: &CrawlConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_http_client(&config.user_agent)?,
            selector: parse_link_selector(&config.link_selector)?,
        })
    }

    /// Fetches `url` and returns its item links in document order
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Links found on the page (possibly none)
    /// * `Err(FetchError)` - Transport failure or non-success status
    pub async fn fetch_links(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(extract_item_links(&body, &self.selector))
    }
}
