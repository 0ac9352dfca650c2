//! Statistics generation from the ledger
//!
//! This module provides functionality for extracting and displaying
//! harvest statistics from the ledger.

use crate::ledger::{ItemStatus, Ledger};

/// Harvest statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerStatistics {
    /// Number of listing pages already crawled
    pub visited_pages: usize,

    /// Lowest and highest visited page
    pub page_span: Option<(u64, u64)>,

    /// Total number of known items
    pub total_items: usize,

    pub pending: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Loads statistics from a ledger
pub fn load_statistics(ledger: &mut dyn Ledger) -> LedgerStatistics {
    let pages = ledger.load_visited_pages();
    let items = ledger.load_item_statuses();

    let page_span = pages
        .iter()
        .min()
        .copied()
        .zip(pages.iter().max().copied());

    LedgerStatistics {
        visited_pages: pages.len(),
        page_span,
        total_items: items.len(),
        pending: items.count(ItemStatus::Pending),
        completed: items.count(ItemStatus::Completed),
        failed: items.count(ItemStatus::Failed),
    }
}

/// Prints statistics to stdout in a formatted way
pub fn print_statistics(stats: &LedgerStatistics) {
    println!("=== Harvest Statistics ===\n");

    match stats.page_span {
        Some((low, high)) => println!(
            "Visited pages: {} (from {} to {})",
            stats.visited_pages, low, high
        ),
        None => println!("Visited pages: 0"),
    }

    println!("\nItems: {}", stats.total_items);
    for (status, count) in [
        (ItemStatus::Pending, stats.pending),
        (ItemStatus::Completed, stats.completed),
        (ItemStatus::Failed, stats.failed),
    ] {
        let percentage = if stats.total_items > 0 {
            (count as f64 / stats.total_items as f64) * 100.0
        } else {
            0.0
        };
        println!("  {:<10} {:>6} ({:.1}%)", status, count, percentage);
    }
}
