use crate::error::Result;
use crate::storage::remote::FileRecord;
use futures::stream::TryStreamExt;
use opendal::{ErrorKind, Operator};

/// Trait for listing the files of a namespace.
pub trait Lister {
    /// List every file below the namespace root.
    ///
    /// # Returns
    /// * `Result<Vec<FileRecord>>` - Records in listing order
    async fn list(&self) -> Result<Vec<FileRecord>>;
}

/// Implementation of Lister for OpenDAL Operator.
pub struct OpenDalLister {
    operator: Operator,
    persisted: bool,
}

impl OpenDalLister {
    /// Create a new lister. `persisted` is reported on every record.
    pub fn new(operator: Operator, persisted: bool) -> Self {
        Self {
            operator,
            persisted,
        }
    }

    /// Stat a listed path to fill in size and modification time.
    async fn describe(&self, path: &str, listed_size: u64) -> Result<FileRecord> {
        match self.operator.stat(path).await {
            Ok(meta) => Ok(FileRecord {
                name: path.to_string(),
                last_modified: meta.last_modified(),
                size: meta.content_length(),
                is_persisted: self.persisted,
                exists: true,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("listed file vanished before stat: {path}");
                Ok(FileRecord {
                    name: path.to_string(),
                    last_modified: None,
                    size: listed_size,
                    is_persisted: self.persisted,
                    exists: false,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Lister for OpenDalLister {
    async fn list(&self) -> Result<Vec<FileRecord>> {
        let entries: Vec<_> = self
            .operator
            .lister_with("/")
            .recursive(true)
            .await?
            .try_collect()
            .await?;

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            let meta = entry.metadata();
            if meta.mode().is_dir() {
                continue;
            }
            records.push(self.describe(entry.path(), meta.content_length()).await?);
        }
        Ok(records)
    }
}
