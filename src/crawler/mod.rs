//! Crawler module for listing-page harvesting
//!
//! This module contains the crawl phase:
//! - HTTP fetching of listing pages
//! - HTML parsing and item link extraction
//! - The driver that walks the page range and records progress

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::CrawlDriver;
pub use fetcher::{build_http_client, FetchError, PageFetcher};
pub use parser::{extract_item_links, parse_link_selector};
