//! Pagesweep: a resumable catalog harvester
//!
//! This crate walks the numbered listing pages of a web catalog, records every
//! item link it finds in a flat-file ledger, and then hands each pending item to
//! an external downloader, recording whether the download succeeded.

pub mod config;
pub mod crawler;
pub mod download;
pub mod ledger;
pub mod output;

use thiserror::Error;

/// Main error type for Pagesweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] ledger::LedgerError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Download error: {0}")]
    Download(#[from] download::DownloadError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Pagesweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlDriver, PageFetcher};
pub use download::{DownloadCommand, DownloadDriver, ExitInfo, YtDlp};
pub use ledger::{FileLedger, ItemStatus, ItemStatuses, Ledger, MemoryLedger};
