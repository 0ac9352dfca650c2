//! Ledger trait and error types
//!
//! This module defines the interface the crawl and download drivers use to
//! read and persist harvest progress.

use crate::ledger::{ItemStatus, ItemStatuses, VisitedPages};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed ledger {path} at line {line}: {reason}")]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Durable record of visited pages and item statuses
///
/// Loading never fails: an absent or unreadable ledger yields an empty
/// collection and a logged warning. Writes report errors so the caller can
/// decide whether to keep going.
pub trait Ledger {
    /// Loads the set of page numbers already crawled
    fn load_visited_pages(&mut self) -> VisitedPages;

    /// Loads every known item url with its status, in ledger order
    fn load_item_statuses(&mut self) -> ItemStatuses;

    /// Persists every url of `urls` not already in `current` as pending
    ///
    /// Newly persisted urls are also inserted into `current`. A url repeated
    /// within `urls` is recorded once.
    ///
    /// # Returns
    ///
    /// The number of urls that were new
    fn record_new_items(
        &mut self,
        page: u64,
        urls: &[String],
        current: &mut ItemStatuses,
    ) -> LedgerResult<usize>;

    /// Persists `page` as crawled and adds it to `visited`
    fn mark_page_visited(&mut self, page: u64, visited: &mut VisitedPages) -> LedgerResult<()>;

    /// Replaces the persisted status of the first entry for `url`
    ///
    /// Every other entry is left exactly as it was.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - An entry for `url` was updated
    /// * `Ok(false)` - The ledger holds no entry for `url`
    fn update_item_status(&mut self, url: &str, status: ItemStatus) -> LedgerResult<bool>;
}
