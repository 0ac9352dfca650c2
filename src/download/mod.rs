//! Download module - hands pending items to the external downloader
//!
//! Each pending item is downloaded once per run, strictly one after another.
//! The outcome is written back to the ledger as `completed` or `failed`.
//! Failed items are not retried automatically; see
//! [`DownloadDriver::requeue_failed`].

mod command;

pub use command::{DownloadCommand, DownloadError, ExitInfo, YtDlp};

use crate::config::Config;
use crate::ledger::{ItemStatus, ItemStatuses, Ledger};
use crate::output::{DownloadFailure, DownloadReport};

/// Drives the download phase over one ledger
pub struct DownloadDriver<'a, L: Ledger + ?Sized, D: DownloadCommand> {
    config: &'a Config,
    command: D,
    ledger: &'a mut L,
}

impl<'a, L: Ledger + ?Sized, D: DownloadCommand> DownloadDriver<'a, L, D> {
    pub fn new(config: &'a Config, command: D, ledger: &'a mut L) -> Self {
        Self {
            config,
            command,
            ledger,
        }
    }

    /// Puts every failed item back to pending, on disk and in `items`
    ///
    /// # Returns
    ///
    /// The number of items re-queued
    pub fn requeue_failed(&mut self, items: &mut ItemStatuses) -> usize {
        let mut requeued = 0;

        for url in items.urls_with_status(ItemStatus::Failed) {
            match self.ledger.update_item_status(&url, ItemStatus::Pending) {
                Ok(true) => {
                    items.set(url, ItemStatus::Pending);
                    requeued += 1;
                }
                Ok(false) => tracing::warn!("Could not re-queue {}: not in the ledger", url),
                Err(e) => tracing::error!("Could not re-queue {}: {}", url, e),
            }
        }

        tracing::info!("Re-queued {} failed items", requeued);
        requeued
    }

    /// Downloads every item whose status is pending when the call starts
    ///
    /// Items are processed in ledger order. Never fails: a download that
    /// cannot be run or exits unsuccessfully marks its item failed and the
    /// loop moves on.
    pub async fn download_pending(&mut self, items: &mut ItemStatuses) -> DownloadReport {
        let pending = items.urls_with_status(ItemStatus::Pending);
        let mut report = DownloadReport::default();

        if pending.is_empty() {
            tracing::info!("No pending items to download. All tasks are complete.");
            return report;
        }

        tracing::info!("Found {} items to download", pending.len());
        let output_template = self.config.output_path();
        let total = pending.len();

        for (index, url) in pending.into_iter().enumerate() {
            tracing::info!("Downloading item {}/{}: {}", index + 1, total, url);
            report.attempted += 1;

            let outcome = match self.command.execute(&url, &output_template).await {
                Ok(exit) if exit.success() => Ok(()),
                Ok(exit) => Err(exit.diagnostic()),
                Err(e) => Err(format!("unexpected error: {}", e)),
            };

            match outcome {
                Ok(()) => {
                    tracing::info!("Item {}: success", url);
                    self.set_status(items, &url, ItemStatus::Completed);
                    report.completed += 1;
                }
                Err(message) => {
                    tracing::error!("Item {}: failed. See error below:\n{}", url, message);
                    self.set_status(items, &url, ItemStatus::Failed);
                    report.failures.push(DownloadFailure { url, message });
                }
            }
        }

        tracing::info!("{}", report);
        report
    }

    fn set_status(&mut self, items: &mut ItemStatuses, url: &str, status: ItemStatus) {
        if let Err(e) = self.ledger.update_item_status(url, status) {
            tracing::error!("Could not record {} as {}: {}", url, status, e);
        }
        items.set(url, status);
    }
}
