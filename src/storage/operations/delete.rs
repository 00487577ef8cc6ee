// Delete operation trait and implementation
use crate::error::Result;
use opendal::{ErrorKind, Operator};

/// Trait for deleting a single file from storage.
pub trait Deleter {
    /// Delete one file.
    ///
    /// # Returns
    /// * `Result<bool>` - `false` when there was nothing to delete
    async fn delete(&self, path: &str) -> Result<bool>;
}

/// Implementation of Deleter for OpenDAL Operator.
pub struct OpenDalDeleter {
    operator: Operator,
}

impl OpenDalDeleter {
    /// Create a new deleter with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Check if a path exists in storage.
    async fn path_exists(&self, path: &str) -> Result<bool> {
        match self.operator.stat(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl Deleter for OpenDalDeleter {
    async fn delete(&self, path: &str) -> Result<bool> {
        // OpenDAL treats removing a missing object as success
        if !self.path_exists(path).await? {
            log::debug!("delete target not found: {path}");
            return Ok(false);
        }
        self.operator.delete(path).await?;
        Ok(true)
    }
}
