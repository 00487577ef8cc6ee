// Download, delete and upload orchestration over the current selection
use super::CatalogView;
use crate::error::{
    Error, InvalidSelectionSnafu, NotConnectedSnafu, PartialDeletionSnafu, Result,
};
use crate::storage::remote::{FileRecord, RemoteFile, RemoteStorage};
use crate::storage::utils::path::basename;
use crate::wrap_err;
use snafu::{OptionExt, ensure};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Result of a completed single-file download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub name: String,
    pub local_path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSummary {
    AllSucceeded,
    SomeFailed,
}

/// One file that could not be deleted.
#[derive(Debug)]
pub struct DeleteFailure {
    pub name: String,
    /// `None` when the service reported failure without an error.
    pub error: Option<Error>,
}

impl fmt::Display for DeleteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(error) => write!(f, "{} failed to delete: {error}", self.name),
            None => write!(f, "{} failed to delete.", self.name),
        }
    }
}

/// Per-file outcome of `delete_many`.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    pub failures: Vec<DeleteFailure>,
    /// Set when the quota could not be re-read after deleting.
    pub quota_error: Option<Error>,
}

impl DeleteReport {
    pub fn summary(&self) -> BatchSummary {
        if self.failures.is_empty() {
            BatchSummary::AllSucceeded
        } else {
            BatchSummary::SomeFailed
        }
    }

    /// Collapse the report into an error naming every file that failed.
    pub fn into_result(self) -> Result<Vec<String>> {
        ensure!(
            self.failures.is_empty(),
            PartialDeletionSnafu {
                failed_names: self
                    .failures
                    .into_iter()
                    .map(|failure| failure.name)
                    .collect::<Vec<_>>()
            }
        );
        Ok(self.deleted)
    }
}

/// Local path a download lands on when the user does not choose one.
pub fn default_destination(record: &FileRecord) -> PathBuf {
    PathBuf::from(basename(&record.name))
}

impl<S: RemoteStorage> CatalogView<S> {
    /// Download the single selected file to `destination`.
    ///
    /// A destination that is an existing directory receives the file under
    /// its base name. Partially written local files are not cleaned up.
    pub async fn download_one(&self, destination: &Path) -> Result<DownloadOutcome> {
        let storage = self.storage.as_ref().context(NotConnectedSnafu)?;
        let selected = self.selected();
        ensure!(
            selected.len() == 1,
            InvalidSelectionSnafu {
                message: "Please select only one file",
                selected: selected.len()
            }
        );
        let record = selected[0];

        let local_path = if fs::metadata(destination)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
        {
            destination.join(default_destination(record))
        } else {
            destination.to_path_buf()
        };

        let transfer = async {
            let file = storage.file(&record.name);
            let bytes = wrap_err!(
                file.read_all_bytes().await,
                ReadFailed {
                    name: record.name.clone()
                }
            )?;
            let len = bytes.len();
            fs::write(&local_path, bytes).await?;
            Ok::<usize, Error>(len)
        };
        let bytes = wrap_err!(
            transfer.await,
            TransferFailed {
                name: record.name.clone(),
                local_path: local_path.clone()
            }
        )?;

        log::info!(
            "downloaded {} to {} ({bytes} bytes)",
            record.name,
            local_path.display()
        );
        Ok(DownloadOutcome {
            name: record.name.clone(),
            local_path,
            bytes,
        })
    }

    /// Delete every selected file, one at a time.
    ///
    /// A failure never stops the remaining deletions. Deleted files leave the
    /// snapshot and the selection immediately; failed ones stay in both. The
    /// quota is re-read once all files have been attempted.
    pub async fn delete_many(&mut self) -> Result<DeleteReport> {
        let storage = self.storage.as_ref().context(NotConnectedSnafu)?;
        ensure!(
            !self.selection.is_empty(),
            InvalidSelectionSnafu {
                message: "Please select files to delete",
                selected: 0usize
            }
        );

        let mut report = DeleteReport::default();
        for name in std::mem::take(&mut self.selection) {
            let file = storage.file(&name);
            match file.delete().await {
                Ok(true) => {
                    self.records.retain(|record| record.name != name);
                    report.deleted.push(name);
                }
                Ok(false) => {
                    log::debug!("{} failed to delete", file.name());
                    self.selection.push(name.clone());
                    report.failures.push(DeleteFailure { name, error: None });
                }
                Err(e) => {
                    let error = Error::DeleteFailed {
                        name: name.clone(),
                        source: Box::new(e),
                    };
                    log::debug!("{error}");
                    self.selection.push(name.clone());
                    report.failures.push(DeleteFailure {
                        name,
                        error: Some(error),
                    });
                }
            }
        }

        match wrap_err!(storage.quota().await, QuotaFailed {}) {
            Ok(quota) => self.quota = Some(quota),
            Err(e) => {
                log::debug!("{e}");
                self.quota = None;
                report.quota_error = Some(e);
            }
        }
        Ok(report)
    }

    /// Upload local files, each under its base name, then refresh.
    ///
    /// Uploads run in order and stop at the first failure, which is
    /// returned. The catalog is refreshed either way so files written before
    /// the failure show up.
    pub async fn upload_many<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<Vec<String>> {
        let storage = self.storage.as_ref().context(NotConnectedSnafu)?;

        let mut uploaded = Vec::with_capacity(paths.len());
        let mut failure = None;
        for path in paths {
            let path = path.as_ref();
            match Self::upload_one(storage, path).await {
                Ok(name) => uploaded.push(name),
                Err(e) => {
                    failure = Some(Error::UploadFailed {
                        local_path: path.to_path_buf(),
                        source: Box::new(e),
                    });
                    break;
                }
            }
        }

        let refreshed = self.refresh().await;
        if let Some(e) = failure {
            if let Err(refresh_error) = refreshed {
                log::warn!("{refresh_error}");
            }
            return Err(e);
        }
        refreshed?;
        Ok(uploaded)
    }

    async fn upload_one(storage: &S, path: &Path) -> Result<String> {
        let name = basename(&path.to_string_lossy());
        let bytes = fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::PathNotFound {
                path: path.to_path_buf(),
            },
            _ => e.into(),
        })?;
        let file = storage.file(&name);
        wrap_err!(
            file.write_all_bytes(bytes).await,
            WriteFailed { name: name.clone() }
        )?;
        log::info!("uploaded {} as {name}", path.display());
        Ok(name)
    }
}
