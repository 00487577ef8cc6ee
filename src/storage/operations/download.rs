use crate::error::Result;
use opendal::Operator;

/// Trait for reading a whole file from storage.
pub trait Downloader {
    /// Read the full content of `path`.
    async fn download(&self, path: &str) -> Result<Vec<u8>>;
}

/// Implementation of Downloader for OpenDAL Operator.
pub struct OpenDalDownloader {
    operator: Operator,
}

impl OpenDalDownloader {
    /// Create a new downloader with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl Downloader for OpenDalDownloader {
    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let data = self.operator.read(path).await?;
        Ok(data.to_vec())
    }
}
