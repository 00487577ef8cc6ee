use crate::error::{NotConnectedSnafu, Result, UnknownFileSnafu};
use crate::storage::remote::RemoteStorage;
use crate::wrap_err;
use snafu::OptionExt;
use std::fmt;

mod batch;
pub mod sort;

pub use self::batch::{
    BatchSummary, DeleteFailure, DeleteReport, DownloadOutcome, default_destination,
};
pub use self::sort::{CellValue, Column, SortDirection, SortKey, SortState};
pub use crate::storage::remote::{FileRecord, QuotaInfo};

/// In-memory view over one application's remote files.
///
/// Holds the storage session (if any), the snapshot of the last refresh,
/// the quota reported alongside it, the column sort state and the names
/// the user currently has selected.
pub struct CatalogView<S: RemoteStorage> {
    storage: Option<S>,
    records: Vec<FileRecord>,
    quota: Option<QuotaInfo>,
    sort: SortState,
    selection: Vec<String>,
}

impl<S: RemoteStorage> Default for CatalogView<S> {
    fn default() -> Self {
        Self {
            storage: None,
            records: Vec::new(),
            quota: None,
            sort: SortState::new(),
            selection: Vec::new(),
        }
    }
}

impl<S: RemoteStorage> CatalogView<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a session and load its file list.
    ///
    /// The session stays attached even when the initial refresh fails, so
    /// the caller can retry with `refresh`.
    pub async fn connect(&mut self, storage: S) -> Result<()> {
        self.storage = Some(storage);
        self.records.clear();
        self.quota = None;
        self.selection.clear();
        self.refresh().await
    }

    pub fn disconnect(&mut self) -> Option<S> {
        self.records.clear();
        self.quota = None;
        self.selection.clear();
        self.storage.take()
    }

    pub fn is_connected(&self) -> bool {
        self.storage.is_some()
    }

    /// Rows in display order.
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn quota(&self) -> Option<QuotaInfo> {
        self.quota
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn get(&self, name: &str) -> Option<&FileRecord> {
        self.records.iter().find(|record| record.name == name)
    }

    /// Replace the snapshot with a fresh listing and quota.
    ///
    /// Nothing is changed unless both the listing and the quota query
    /// succeed. The active sort is re-applied to the new rows and selected
    /// names that disappeared are dropped from the selection.
    pub async fn refresh(&mut self) -> Result<()> {
        let storage = self.storage.as_ref().context(NotConnectedSnafu)?;
        let mut records = wrap_err!(storage.list_files().await, FetchFailed {})?;
        let quota = wrap_err!(storage.quota().await, QuotaFailed {})?;

        if let Some(key) = self.sort.key() {
            sort::sort_records(&mut records, key);
        }
        self.selection
            .retain(|name| records.iter().any(|record| &record.name == name));
        log::debug!("refreshed catalog: {} file(s)", records.len());
        self.records = records;
        self.quota = Some(quota);
        Ok(())
    }

    /// Ask the session for the current quota.
    ///
    /// On failure the cached quota is cleared rather than left stale.
    pub async fn recompute_quota(&mut self) -> Result<QuotaInfo> {
        let storage = self.storage.as_ref().context(NotConnectedSnafu)?;
        match wrap_err!(storage.quota().await, QuotaFailed {}) {
            Ok(quota) => {
                self.quota = Some(quota);
                Ok(quota)
            }
            Err(e) => {
                self.quota = None;
                Err(e)
            }
        }
    }

    /// Handle a click on a column header and reorder the rows.
    pub fn click_column(&mut self, column: Column) -> SortKey {
        let key = self.sort.click(column);
        sort::sort_records(&mut self.records, key);
        key
    }

    /// Sort by an explicit key, updating the click state to match.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort.set(key);
        sort::sort_records(&mut self.records, key);
    }

    /// Replace the selection. Every name must be in the current snapshot.
    pub fn select<I, N>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let mut selection: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            snafu::ensure!(self.get(name).is_some(), UnknownFileSnafu { name });
            if !selection.iter().any(|n| n == name) {
                selection.push(name.to_string());
            }
        }
        self.selection = selection;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected rows, in the order they were selected.
    pub fn selected(&self) -> Vec<&FileRecord> {
        self.selection
            .iter()
            .filter_map(|name| self.get(name))
            .collect()
    }

    /// File count and quota usage, once a quota is known.
    pub fn summary(&self) -> Option<CatalogSummary> {
        self.quota.map(|quota| CatalogSummary {
            files: self.records.len(),
            quota,
        })
    }
}

/// Status line shown under the file table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSummary {
    pub files: usize,
    pub quota: QuotaInfo,
}

impl fmt::Display for CatalogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files, {}/{} bytes used",
            self.files,
            self.quota.used_bytes(),
            self.quota.total_bytes
        )
    }
}
