//! Configuration module for Pagesweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; a missing file section falls back to the built-in
//! defaults, so `Config::default()` is a complete, valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use pagesweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pagesweep.toml")).unwrap();
//! println!("Crawling pages {} down to {}", config.crawl.start_page, config.crawl.end_page);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, DownloadConfig, LedgerConfig, PAGE_PLACEHOLDER};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
