use std::fmt;

/// Outcome of one crawl over a page range
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Pages fetched and recorded as visited
    pub pages_fetched: u64,

    /// Pages skipped because they were already visited
    pub pages_skipped: u64,

    /// Pages whose fetch or recording failed; retried on the next run
    pub pages_failed: u64,

    /// Item urls seen for the first time
    pub new_links: usize,
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Added a total of {} new links ({} pages fetched, {} skipped, {} failed)",
            self.new_links, self.pages_fetched, self.pages_skipped, self.pages_failed
        )
    }
}

/// A single item the downloader could not fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFailure {
    pub url: String,

    /// Diagnostic text from the downloader, or the launch error
    pub message: String,
}

/// Outcome of one pass over the pending items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Pending items handed to the downloader
    pub attempted: usize,

    /// Items now marked completed
    pub completed: usize,

    /// Items now marked failed, with the reason
    pub failures: Vec<DownloadFailure>,
}

impl DownloadReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

impl fmt::Display for DownloadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attempted == 0 {
            return f.write_str("No pending items to download");
        }
        write!(
            f,
            "Downloaded {}/{} items ({} failed)",
            self.completed,
            self.attempted,
            self.failed()
        )
    }
}
