//! In-memory ledger
//!
//! Keeps both collections in process memory with the same semantics as
//! [`FileLedger`](crate::ledger::FileLedger). Useful for tests and dry runs.

use crate::ledger::{ItemStatus, ItemStatuses, Ledger, LedgerError, LedgerResult, VisitedPages};
use std::io;

/// Ledger whose "persisted" state is a pair of vectors
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    pages: Vec<u64>,
    rows: Vec<(String, ItemStatus)>,
    reject_item_writes: bool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the given pages already recorded as visited
    pub fn with_pages(mut self, pages: impl IntoIterator<Item = u64>) -> Self {
        self.pages.extend(pages);
        self
    }

    /// Starts with the given item rows already recorded
    pub fn with_items<S: Into<String>>(
        mut self,
        items: impl IntoIterator<Item = (S, ItemStatus)>,
    ) -> Self {
        self.rows
            .extend(items.into_iter().map(|(url, status)| (url.into(), status)));
        self
    }

    /// Makes every item write fail with an I/O error
    pub fn reject_item_writes(mut self) -> Self {
        self.reject_item_writes = true;
        self
    }

    /// Recorded page numbers, in the order they were recorded
    pub fn pages(&self) -> &[u64] {
        &self.pages
    }

    /// Recorded item rows, in the order they were recorded
    pub fn rows(&self) -> &[(String, ItemStatus)] {
        &self.rows
    }

    fn check_item_write(&self) -> LedgerResult<()> {
        if self.reject_item_writes {
            return Err(LedgerError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "item ledger is read-only",
            )));
        }
        Ok(())
    }
}

impl Ledger for MemoryLedger {
    fn load_visited_pages(&mut self) -> VisitedPages {
        self.pages.iter().copied().collect()
    }

    fn load_item_statuses(&mut self) -> ItemStatuses {
        self.rows
            .iter()
            .map(|(url, status)| (url.as_str(), *status))
            .collect()
    }

    fn record_new_items(
        &mut self,
        _page: u64,
        urls: &[String],
        current: &mut ItemStatuses,
    ) -> LedgerResult<usize> {
        self.check_item_write()?;

        let mut added = 0;
        for url in urls {
            if current.insert_new(url.as_str(), ItemStatus::Pending) {
                self.rows.push((url.clone(), ItemStatus::Pending));
                added += 1;
            }
        }
        Ok(added)
    }

    fn mark_page_visited(&mut self, page: u64, visited: &mut VisitedPages) -> LedgerResult<()> {
        self.pages.push(page);
        visited.insert(page);
        Ok(())
    }

    fn update_item_status(&mut self, url: &str, status: ItemStatus) -> LedgerResult<bool> {
        self.check_item_write()?;

        match self.rows.iter_mut().find(|(row_url, _)| row_url == url) {
            Some(row) => {
                row.1 = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
