//! Ledger module for persisting harvest progress
//!
//! Two collections make up the ledger:
//! - the set of listing pages already crawled
//! - every discovered item url with its download status
//!
//! The [`Ledger`] trait exposes the operations the drivers need; [`FileLedger`]
//! backs them with two flat files and [`MemoryLedger`] keeps everything in memory.

mod file;
mod memory;
mod rows;
mod traits;

pub use file::FileLedger;
pub use memory::MemoryLedger;
pub use traits::{Ledger, LedgerError, LedgerResult};

use std::collections::{HashMap, HashSet};
use std::fmt;

/// Header row of the item ledger
pub const ITEMS_HEADER: [&str; 2] = ["video_url", "status"];

/// Page numbers that have been crawled and had their links persisted
pub type VisitedPages = HashSet<u64>;

/// Download status of a discovered item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    /// Discovered, not yet handed to the downloader
    Pending,

    /// Downloader exited successfully
    Completed,

    /// Downloader failed or could not be launched
    Failed,
}

impl ItemStatus {
    /// Converts the status to its ledger representation
    pub fn to_ledger_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parses a status from its ledger representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_ledger_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_ledger_str())
    }
}

/// Item urls and their statuses, iterated in discovery order
///
/// A url appears at most once. Re-inserting a known url never resets its
/// status or moves it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStatuses {
    order: Vec<String>,
    statuses: HashMap<String, ItemStatus>,
}

impl ItemStatuses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.statuses.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<ItemStatus> {
        self.statuses.get(url).copied()
    }

    /// Adds a url if it is unknown; returns false and leaves the entry alone otherwise
    pub fn insert_new(&mut self, url: impl Into<String>, status: ItemStatus) -> bool {
        let url = url.into();
        if self.statuses.contains_key(&url) {
            return false;
        }
        self.statuses.insert(url.clone(), status);
        self.order.push(url);
        true
    }

    /// Sets the status of a url, appending it if unknown
    pub fn set(&mut self, url: impl Into<String>, status: ItemStatus) {
        let url = url.into();
        if let Some(current) = self.statuses.get_mut(&url) {
            *current = status;
        } else {
            self.insert_new(url, status);
        }
    }

    /// Iterates `(url, status)` pairs in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, ItemStatus)> + '_ {
        self.order
            .iter()
            .map(move |url| (url.as_str(), self.statuses[url]))
    }

    /// Snapshot of every url currently holding `status`, in discovery order
    pub fn urls_with_status(&self, status: ItemStatus) -> Vec<String> {
        self.iter()
            .filter(|(_, s)| *s == status)
            .map(|(url, _)| url.to_string())
            .collect()
    }

    /// Number of urls currently holding `status`
    pub fn count(&self, status: ItemStatus) -> usize {
        self.statuses.values().filter(|s| **s == status).count()
    }
}

impl<S: Into<String>> FromIterator<(S, ItemStatus)> for ItemStatuses {
    fn from_iter<I: IntoIterator<Item = (S, ItemStatus)>>(iter: I) -> Self {
        let mut items = Self::new();
        for (url, status) in iter {
            items.set(url, status);
        }
        items
    }
}
