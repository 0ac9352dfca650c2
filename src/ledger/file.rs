//! Flat-file ledger
//!
//! Pages live in a plain text file, one page number per line, append-only.
//! Items live in a CSV file with a `video_url,status` header. New items are
//! appended; a status change rewrites the item file in place.

use crate::config::LedgerConfig;
use crate::ledger::rows::{encode_row, read_records, write_rows};
use crate::ledger::{
    ItemStatus, ItemStatuses, Ledger, LedgerError, LedgerResult, VisitedPages, ITEMS_HEADER,
};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Ledger backed by a page file and an item CSV file
#[derive(Debug)]
pub struct FileLedger {
    pages_path: PathBuf,
    items_path: PathBuf,

    /// Never creates or writes either file
    read_only: bool,

    /// Urls found on disk when the item file could not be loaded strictly.
    /// Appends skip these so an unreadable file never gains duplicate rows.
    unreadable_urls: HashSet<String>,
}

impl FileLedger {
    /// Creates a ledger over the two given files
    ///
    /// Nothing is read or created until one of the [`Ledger`] operations runs.
    pub fn new(pages_path: impl Into<PathBuf>, items_path: impl Into<PathBuf>) -> Self {
        Self {
            pages_path: pages_path.into(),
            items_path: items_path.into(),
            read_only: false,
            unreadable_urls: HashSet::new(),
        }
    }

    /// Creates a ledger over the files named in the configuration
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(&config.pages_file, &config.items_file)
    }

    /// Turns this ledger into one that only reads
    ///
    /// Loading a missing item file no longer creates it, and every write
    /// fails with [`io::ErrorKind::PermissionDenied`].
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn pages_path(&self) -> &Path {
        &self.pages_path
    }

    pub fn items_path(&self) -> &Path {
        &self.items_path
    }

    fn malformed(&self, path: &Path, line: usize, reason: impl Into<String>) -> LedgerError {
        LedgerError::Malformed {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    fn ensure_writable(&self, path: &Path) -> io::Result<()> {
        if self.read_only {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is opened read-only", path.display()),
            ));
        }
        Ok(())
    }

    fn read_visited_pages(&self) -> LedgerResult<VisitedPages> {
        let content = fs::read_to_string(&self.pages_path)?;
        let mut pages = VisitedPages::new();

        for (index, line) in content.lines().enumerate() {
            let page = line.trim().parse::<u64>().map_err(|e| {
                self.malformed(&self.pages_path, index + 1, format!("'{}': {}", line, e))
            })?;
            pages.insert(page);
        }

        Ok(pages)
    }

    fn read_item_statuses(&self) -> LedgerResult<ItemStatuses> {
        let content = fs::read_to_string(&self.items_path)?;
        let records = read_records(&content)?;
        let mut records = records.iter().filter(|record| !record.is_blank());

        match records.next() {
            Some(header) if header.fields == ITEMS_HEADER => {}
            Some(header) => {
                return Err(self.malformed(
                    &self.items_path,
                    header.line as usize,
                    "missing header row",
                ))
            }
            None => return Err(self.malformed(&self.items_path, 1, "file is empty")),
        }

        let mut items = ItemStatuses::new();
        for record in records {
            let line = record.line as usize;

            let [url, status] = record.fields.as_slice() else {
                return Err(self.malformed(
                    &self.items_path,
                    line,
                    format!("expected 2 fields, found {}", record.fields.len()),
                ));
            };

            let status = ItemStatus::from_ledger_str(status).ok_or_else(|| {
                self.malformed(&self.items_path, line, format!("unknown status '{}'", status))
            })?;

            items.set(url.as_str(), status);
        }

        Ok(items)
    }

    /// Collects whatever url column can be recovered from an item file that
    /// failed strict loading
    fn scan_unreadable_urls(&self) -> HashSet<String> {
        let Ok(content) = fs::read_to_string(&self.items_path) else {
            return HashSet::new();
        };

        read_records(&content)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|record| record.fields.into_iter().next())
            .filter(|url| !url.is_empty() && url != ITEMS_HEADER[0])
            .collect()
    }

    fn write_items_header(&self) -> LedgerResult<()> {
        self.ensure_writable(&self.items_path)?;
        let file = fs::File::create(&self.items_path)?;
        write_rows(file, &[ITEMS_HEADER])
    }

    fn append_item_rows(&self, urls: &[&str]) -> LedgerResult<()> {
        self.ensure_writable(&self.items_path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.items_path)?;

        let mut rows = Vec::with_capacity(urls.len() + 1);
        if file.metadata()?.len() == 0 {
            rows.push(ITEMS_HEADER);
        }
        rows.extend(
            urls.iter()
                .map(|&url| [url, ItemStatus::Pending.to_ledger_str()]),
        );

        write_rows(file, &rows)
    }

    fn temp_items_path(&self) -> PathBuf {
        let mut name = self
            .items_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.items_path.with_file_name(name)
    }
}

impl Ledger for FileLedger {
    fn load_visited_pages(&mut self) -> VisitedPages {
        match self.read_visited_pages() {
            Ok(pages) => {
                tracing::debug!(
                    "Loaded {} visited pages from {}",
                    pages.len(),
                    self.pages_path.display()
                );
                pages
            }
            Err(LedgerError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(
                    "Page ledger {} not found, starting with no visited pages",
                    self.pages_path.display()
                );
                VisitedPages::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Could not read {}. Starting fresh. Error: {}",
                    self.pages_path.display(),
                    e
                );
                VisitedPages::new()
            }
        }
    }

    fn load_item_statuses(&mut self) -> ItemStatuses {
        self.unreadable_urls.clear();

        match self.read_item_statuses() {
            Ok(items) => {
                tracing::debug!(
                    "Loaded {} items from {}",
                    items.len(),
                    self.items_path.display()
                );
                items
            }
            Err(LedgerError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                if self.read_only {
                    tracing::warn!("Item ledger {} not found", self.items_path.display());
                    return ItemStatuses::new();
                }
                tracing::info!("Creating item ledger {}", self.items_path.display());
                if let Err(e) = self.write_items_header() {
                    tracing::warn!(
                        "Could not create {}: {}",
                        self.items_path.display(),
                        e
                    );
                }
                ItemStatuses::new()
            }
            Err(e) => {
                self.unreadable_urls = self.scan_unreadable_urls();
                tracing::warn!(
                    "Could not read {}. Starting with an empty list ({} urls on disk will not be re-added). Error: {}",
                    self.items_path.display(),
                    self.unreadable_urls.len(),
                    e
                );
                ItemStatuses::new()
            }
        }
    }

    fn record_new_items(
        &mut self,
        page: u64,
        urls: &[String],
        current: &mut ItemStatuses,
    ) -> LedgerResult<usize> {
        let mut seen = HashSet::new();
        let fresh: Vec<&str> = urls
            .iter()
            .map(String::as_str)
            .filter(|url| !current.contains(url))
            .filter(|url| !self.unreadable_urls.contains(*url))
            .filter(|url| seen.insert(*url))
            .collect();

        if fresh.is_empty() {
            tracing::debug!("Page {}: no new items", page);
            return Ok(0);
        }

        self.append_item_rows(&fresh)?;

        for url in &fresh {
            current.insert_new(*url, ItemStatus::Pending);
        }

        Ok(fresh.len())
    }

    fn mark_page_visited(&mut self, page: u64, visited: &mut VisitedPages) -> LedgerResult<()> {
        self.ensure_writable(&self.pages_path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.pages_path)?;
        writeln!(file, "{}", page)?;
        file.flush()?;

        visited.insert(page);
        Ok(())
    }

    fn update_item_status(&mut self, url: &str, status: ItemStatus) -> LedgerResult<bool> {
        self.ensure_writable(&self.items_path)?;
        let content = fs::read_to_string(&self.items_path)?;
        let records = read_records(&content)?;

        let target = records
            .iter()
            .enumerate()
            .filter(|(index, record)| !(*index == 0 && record.fields == ITEMS_HEADER))
            .find(|(_, record)| record.first_field() == Some(url))
            .map(|(_, record)| record.span.clone());

        let Some(span) = target else {
            tracing::warn!(
                "No entry for {} in {}; status not updated",
                url,
                self.items_path.display()
            );
            return Ok(false);
        };

        let mut rewritten = String::with_capacity(content.len());
        rewritten.push_str(&content[..span.start]);
        rewritten.push_str(&encode_row(&[url, status.to_ledger_str()])?);
        rewritten.push_str(&content[span.end..]);

        let temp_path = self.temp_items_path();
        fs::write(&temp_path, rewritten)?;
        fs::rename(&temp_path, &self.items_path)?;

        Ok(true)
    }
}
