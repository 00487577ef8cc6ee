use crate::error::Result;
use crate::storage::remote::QuotaInfo;
use futures::stream::TryStreamExt;
use opendal::{ErrorKind, Operator};

/// Trait for calculating quota usage of a namespace.
pub trait UsageCalculator {
    /// Calculate the quota against a fixed allowance.
    ///
    /// # Arguments
    /// * `total_bytes` - Allowance granted to the namespace
    ///
    /// # Returns
    /// * `Result<QuotaInfo>` - Total and remaining bytes
    async fn calculate_quota(&self, total_bytes: u64) -> Result<QuotaInfo>;
}

/// Implementation of UsageCalculator for OpenDAL Operator.
pub struct OpenDalUsageCalculator {
    operator: Operator,
}

impl OpenDalUsageCalculator {
    /// Create a new usage calculator with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

/// Size of a listed file. Listing metadata may omit the length on some
/// services; a file gone before the `stat` counts as 0 bytes.
async fn entry_size(operator: &Operator, path: &str, listed: u64) -> opendal::Result<u64> {
    if listed > 0 {
        return Ok(listed);
    }
    match operator.stat(path).await {
        Ok(meta) => Ok(meta.content_length()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("listed file vanished before stat: {path}");
            Ok(0)
        }
        Err(e) => Err(e),
    }
}

impl UsageCalculator for OpenDalUsageCalculator {
    async fn calculate_quota(&self, total_bytes: u64) -> Result<QuotaInfo> {
        let lister = self.operator.lister_with("/").recursive(true).await?;
        let operator = &self.operator;
        let used = lister
            .try_fold(0u64, |used, entry| async move {
                if entry.metadata().mode().is_dir() {
                    return Ok(used);
                }
                let size =
                    entry_size(operator, entry.path(), entry.metadata().content_length()).await?;
                Ok(used + size)
            })
            .await?;

        Ok(QuotaInfo::new(total_bytes, total_bytes.saturating_sub(used)))
    }
}
