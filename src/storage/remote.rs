// Collaborator interface consumed by the catalog
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata of one file in an application's cloud namespace.
///
/// `exists` and `is_persisted` are independent: a record may be known to the
/// service but missing its content, or exist only locally without having
/// been synced to the cloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub name: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub size: u64,
    pub is_persisted: bool,
    pub exists: bool,
}

/// Byte allowance of the connected namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaInfo {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl QuotaInfo {
    pub fn new(total_bytes: u64, available_bytes: u64) -> Self {
        Self {
            total_bytes,
            available_bytes,
        }
    }

    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.available_bytes)
    }
}

/// Trait for a connected storage session scoped to one application.
pub trait RemoteStorage {
    type File: RemoteFile;

    /// List every file currently held in the namespace.
    async fn list_files(&self) -> Result<Vec<FileRecord>>;

    /// Query the namespace quota.
    async fn quota(&self) -> Result<QuotaInfo>;

    /// Get a handle for `name`. The file does not need to exist yet.
    fn file(&self, name: &str) -> Self::File;
}

/// Trait for a single remote file handle.
pub trait RemoteFile {
    fn name(&self) -> &str;

    async fn read_all_bytes(&self) -> Result<Vec<u8>>;

    /// Write `bytes` as the full content, creating or overwriting the file.
    async fn write_all_bytes(&self, bytes: Vec<u8>) -> Result<()>;

    /// Delete the file.
    ///
    /// # Returns
    /// * `Ok(true)` - The file was removed
    /// * `Ok(false)` - The service refused or the file was not there
    async fn delete(&self) -> Result<bool>;
}
