//! Output module for run summaries
//!
//! This module turns the results of each phase, and the ledger itself, into
//! operator-facing summaries.

mod report;
mod stats;

pub use report::{CrawlReport, DownloadFailure, DownloadReport};
pub use stats::{load_statistics, print_statistics, LedgerStatistics};
