use crate::error::Result;
use opendal::Operator;

/// Trait for writing a whole file to storage.
pub trait Uploader {
    /// Write `bytes` as the content of `path`, replacing any existing object.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<()>;
}

/// Implementation of Uploader for OpenDAL Operator.
pub struct OpenDalUploader {
    operator: Operator,
}

impl OpenDalUploader {
    /// Create a new uploader with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl Uploader for OpenDalUploader {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<()> {
        let total_bytes = bytes.len();
        self.operator.write(path, bytes).await?;
        log::debug!("wrote {path} ({total_bytes} bytes)");
        Ok(())
    }
}
