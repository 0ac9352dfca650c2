use serde::Deserialize;
use std::path::PathBuf;

/// Placeholder in `base-url` that is replaced by the page number
pub const PAGE_PLACEHOLDER: &str = "{}";

/// Main configuration structure for Pagesweep
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Listing-page crawl configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlConfig {
    /// First page to crawl; pages are walked downwards from here
    pub start_page: u64,

    /// Last page to crawl (inclusive)
    pub end_page: u64,

    /// Listing URL pattern, `{}` is replaced by the page number
    pub base_url: String,

    /// CSS selector matching the item anchors on a listing page
    pub link_selector: String,

    /// User-Agent header sent with every listing request
    pub user_agent: String,

    /// Pause after each fetched page (milliseconds)
    pub request_delay_ms: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_page: 37068,
            end_page: 37060,
            base_url: "https://thisvid.com/gay-newest/{}/".to_string(),
            link_selector: "a.tumbpu".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            request_delay_ms: 1000,
        }
    }
}

/// External downloader configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DownloadConfig {
    /// Directory downloaded items are written to
    pub directory: PathBuf,

    /// Downloader executable
    pub program: String,

    /// Value passed to `--format`
    pub format: String,

    /// File name template passed to `-o`, relative to `directory`
    pub output_template: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("thisvid_downloads"),
            program: "yt-dlp".to_string(),
            format: "best".to_string(),
            output_template: "%(title)s - [%(id)s].%(ext)s".to_string(),
        }
    }
}

/// Ledger file locations
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LedgerConfig {
    /// One visited page number per line
    pub pages_file: PathBuf,

    /// CSV of item url and download status
    pub items_file: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            pages_file: PathBuf::from("scraped_pages.txt"),
            items_file: PathBuf::from("download_status.csv"),
        }
    }
}

impl Config {
    /// Builds the listing URL for a page number
    pub fn page_url(&self, page: u64) -> String {
        self.crawl
            .base_url
            .replacen(PAGE_PLACEHOLDER, &page.to_string(), 1)
    }

    /// Full `-o` argument handed to the downloader
    pub fn output_path(&self) -> String {
        self.download
            .directory
            .join(&self.download.output_template)
            .to_string_lossy()
            .into_owned()
    }

    /// Pause between listing requests
    pub fn request_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.crawl.request_delay_ms)
    }
}
