//! Crawl driver - walks the listing pages and records item links
//!
//! Pages are visited from the start page down to the end page. A page already
//! in the visited set is skipped without any request. A fetched page has its
//! new links recorded before the page itself is marked visited, so a crash in
//! between only costs a redundant fetch on the next run.

use crate::config::Config;
use crate::crawler::PageFetcher;
use crate::ledger::{ItemStatuses, Ledger, VisitedPages};
use crate::output::CrawlReport;

/// Drives the crawl phase over one ledger
pub struct CrawlDriver<'a, L: Ledger + ?Sized> {
    config: &'a Config,
    fetcher: PageFetcher,
    ledger: &'a mut L,
}

impl<'a, L: Ledger + ?Sized> CrawlDriver<'a, L> {
    /// Creates a new crawl driver
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the page range, URL pattern and request delay
    /// * `fetcher` - Fetches and parses listing pages
    /// * `ledger` - Records visited pages and discovered items
    pub fn new(config: &'a Config, fetcher: PageFetcher, ledger: &'a mut L) -> Self {
        Self {
            config,
            fetcher,
            ledger,
        }
    }

    /// Crawls the configured page range
    pub async fn run(
        &mut self,
        visited: &mut VisitedPages,
        items: &mut ItemStatuses,
    ) -> CrawlReport {
        let (start, end) = (self.config.crawl.start_page, self.config.crawl.end_page);
        self.scrape_range(start, end, visited, items).await
    }

    /// Crawls pages `start_page` down to `end_page`, both inclusive
    ///
    /// Never fails: a page that cannot be fetched or recorded is logged, left
    /// unvisited, and picked up again on a later run. The request delay
    /// follows every page that was attempted, but not pages skipped as
    /// already visited.
    pub async fn scrape_range(
        &mut self,
        start_page: u64,
        end_page: u64,
        visited: &mut VisitedPages,
        items: &mut ItemStatuses,
    ) -> CrawlReport {
        tracing::info!("Checking pages from {} down to {}", start_page, end_page);

        let mut report = CrawlReport::default();

        for page in (end_page..=start_page).rev() {
            if visited.contains(&page) {
                tracing::info!("Page {}: already scraped, skipping", page);
                report.pages_skipped += 1;
                continue;
            }

            let page_url = self.config.page_url(page);
            tracing::info!("Page {}: scraping {}", page, page_url);

            match self.fetcher.fetch_links(&page_url).await {
                Ok(links) => self.record_page(page, &links, visited, items, &mut report),
                Err(e) => {
                    tracing::error!("Page {}: failed to scrape: {}", page, e);
                    report.pages_failed += 1;
                }
            }

            self.pause().await;
        }

        tracing::info!("Scraping finished. {}", report);
        report
    }

    fn record_page(
        &mut self,
        page: u64,
        links: &[String],
        visited: &mut VisitedPages,
        items: &mut ItemStatuses,
        report: &mut CrawlReport,
    ) {
        if links.is_empty() {
            tracing::warn!("Page {}: no links found", page);
        } else {
            tracing::debug!("Page {}: {} links found", page, links.len());
        }

        let added = match self.ledger.record_new_items(page, links, items) {
            Ok(added) => added,
            Err(e) => {
                tracing::error!("Page {}: could not record links: {}", page, e);
                report.pages_failed += 1;
                return;
            }
        };
        report.new_links += added;

        if let Err(e) = self.ledger.mark_page_visited(page, visited) {
            tracing::error!("Page {}: could not mark as visited: {}", page, e);
            report.pages_failed += 1;
            return;
        }

        report.pages_fetched += 1;
        tracing::info!("Page {}: {} links, {} new", page, links.len(), added);
    }

    async fn pause(&self) {
        let delay = self.config.request_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
