use crate::error::{Error, InvalidAppIdSnafu, Result};
use opendal::Operator;
use std::str::FromStr;

pub mod constants;
mod operations;
pub mod remote;
pub mod utils;

use self::constants::{DEFAULT_FS_ROOT, DEFAULT_QUOTA_BYTES};
use self::operations::delete::OpenDalDeleter;
use self::operations::download::OpenDalDownloader;
use self::operations::list::OpenDalLister;
use self::operations::upload::OpenDalUploader;
use self::operations::usage::OpenDalUsageCalculator;
use self::operations::{Deleter, Downloader, Lister, Uploader, UsageCalculator};
use self::remote::{FileRecord, QuotaInfo, RemoteFile, RemoteStorage};
use self::utils::path::namespace_root;
use crate::wrap_err;

/// Storage provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    Oss,
    S3,
    Cos,
    Fs,
}

impl StorageProvider {
    /// Whether files written through this provider leave the local machine.
    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::Fs)
    }
}

impl FromStr for StorageProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "oss" => Ok(Self::Oss),
            "s3" | "minio" => Ok(Self::S3),
            "cos" => Ok(Self::Cos),
            "fs" => Ok(Self::Fs),
            _ => Err(Error::UnsupportedProvider {
                provider: s.to_string(),
            }),
        }
    }
}

/// Unified storage configuration for different providers
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub bucket: String,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    /// Prefix under which every application gets its own namespace.
    pub root_path: Option<String>,
    pub quota_bytes: u64,
}

impl StorageConfig {
    pub fn oss(
        bucket: String,
        access_key_id: String,
        access_key_secret: String,
        region: Option<String>,
    ) -> Self {
        Self {
            provider: StorageProvider::Oss,
            bucket,
            access_key_id: Some(access_key_id),
            access_key_secret: Some(access_key_secret),
            endpoint: None,
            region,
            root_path: None,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }

    pub fn s3(
        bucket: String,
        access_key_id: String,
        secret_access_key: String,
        region: Option<String>,
    ) -> Self {
        Self {
            provider: StorageProvider::S3,
            bucket,
            access_key_id: Some(access_key_id),
            access_key_secret: Some(secret_access_key),
            endpoint: None,
            region,
            root_path: None,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }

    pub fn cos(bucket: String, secret_id: String, secret_key: String) -> Self {
        Self {
            provider: StorageProvider::Cos,
            bucket,
            access_key_id: Some(secret_id),
            access_key_secret: Some(secret_key),
            endpoint: None,
            region: None,
            root_path: None,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }

    pub fn fs(root_path: String) -> Self {
        Self {
            provider: StorageProvider::Fs,
            bucket: "local".to_string(),
            access_key_id: None,
            access_key_secret: None,
            endpoint: None,
            region: None,
            root_path: Some(root_path),
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }

    pub fn with_quota_bytes(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }
}

/// Storage session for one application's namespace, backed by OpenDAL
#[derive(Clone)]
pub struct StorageClient {
    operator: Operator,
    provider: StorageProvider,
    app_id: u32,
    quota_bytes: u64,
}

impl StorageClient {
    /// Open the namespace of `app_id` and check that it is reachable.
    pub async fn connect(config: StorageConfig, app_id: u32) -> Result<Self> {
        snafu::ensure!(
            app_id > 0,
            InvalidAppIdSnafu {
                value: app_id.to_string()
            }
        );
        log::debug!(
            "connect provider={:?} bucket={} app_id={}",
            config.provider,
            config.bucket,
            app_id
        );
        wrap_err!(
            Self::open(&config, app_id).await,
            ConnectionFailed { app_id: app_id }
        )
    }

    async fn open(config: &StorageConfig, app_id: u32) -> Result<Self> {
        let root = Self::namespace(config, app_id);
        if config.provider == StorageProvider::Fs {
            tokio::fs::create_dir_all(&root).await?;
        }
        let operator = Self::build_operator(config, &root)?;
        operator.check().await?;
        Ok(Self {
            operator,
            provider: config.provider,
            app_id,
            quota_bytes: config.quota_bytes,
        })
    }

    fn namespace(config: &StorageConfig, app_id: u32) -> String {
        let default_root = match config.provider {
            StorageProvider::Fs => DEFAULT_FS_ROOT,
            _ => "",
        };
        namespace_root(config.root_path.as_deref().unwrap_or(default_root), app_id)
    }

    pub fn app_id(&self) -> u32 {
        self.app_id
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    fn build_operator(config: &StorageConfig, root: &str) -> Result<Operator> {
        match &config.provider {
            StorageProvider::Oss => {
                let mut builder = opendal::services::Oss::default()
                    .bucket(&config.bucket)
                    .root(root);
                if let Some(access_key_id) = &config.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }
                if let Some(access_key_secret) = &config.access_key_secret {
                    builder = builder.access_key_secret(access_key_secret);
                }
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                Ok(Operator::new(builder)?.finish())
            }
            StorageProvider::S3 => {
                let mut builder = opendal::services::S3::default()
                    .bucket(&config.bucket)
                    .root(root);
                if let Some(access_key_id) = &config.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }
                if let Some(secret_access_key) = &config.access_key_secret {
                    builder = builder.secret_access_key(secret_access_key);
                }
                if let Some(region) = &config.region {
                    builder = builder.region(region);
                }
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                Ok(Operator::new(builder)?.finish())
            }
            StorageProvider::Cos => {
                #[cfg(feature = "cos")]
                {
                    let mut builder = opendal::services::Cos::default()
                        .bucket(&config.bucket)
                        .root(root);
                    if let Some(secret_id) = &config.access_key_id {
                        builder = builder.secret_id(secret_id);
                    }
                    if let Some(secret_key) = &config.access_key_secret {
                        builder = builder.secret_key(secret_key);
                    }
                    if let Some(endpoint) = &config.endpoint {
                        builder = builder.endpoint(endpoint);
                    }
                    Ok(Operator::new(builder)?.finish())
                }

                #[cfg(not(feature = "cos"))]
                {
                    Err(Error::UnsupportedProvider {
                        provider: "cos (feature disabled)".to_string(),
                    })
                }
            }
            StorageProvider::Fs => {
                let builder = opendal::services::Fs::default().root(root);
                Ok(Operator::new(builder)?.finish())
            }
        }
    }
}

impl RemoteStorage for StorageClient {
    type File = StorageFile;

    async fn list_files(&self) -> Result<Vec<FileRecord>> {
        log::debug!(
            "list_files provider={:?} app_id={}",
            self.provider,
            self.app_id
        );
        let lister = OpenDalLister::new(self.operator.clone(), self.provider.is_remote());
        lister.list().await
    }

    async fn quota(&self) -> Result<QuotaInfo> {
        log::debug!(
            "quota provider={:?} app_id={} total_bytes={}",
            self.provider,
            self.app_id,
            self.quota_bytes
        );
        let calculator = OpenDalUsageCalculator::new(self.operator.clone());
        calculator.calculate_quota(self.quota_bytes).await
    }

    fn file(&self, name: &str) -> StorageFile {
        StorageFile {
            operator: self.operator.clone(),
            name: name.to_string(),
        }
    }
}

/// Handle to a single file inside a `StorageClient` namespace
#[derive(Clone)]
pub struct StorageFile {
    operator: Operator,
    name: String,
}

impl RemoteFile for StorageFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_all_bytes(&self) -> Result<Vec<u8>> {
        log::debug!("read_all_bytes name={}", self.name);
        let downloader = OpenDalDownloader::new(self.operator.clone());
        downloader.download(&self.name).await
    }

    async fn write_all_bytes(&self, bytes: Vec<u8>) -> Result<()> {
        log::debug!("write_all_bytes name={} bytes={}", self.name, bytes.len());
        let uploader = OpenDalUploader::new(self.operator.clone());
        uploader.upload(&self.name, bytes).await
    }

    async fn delete(&self) -> Result<bool> {
        log::debug!("delete name={}", self.name);
        let deleter = OpenDalDeleter::new(self.operator.clone());
        deleter.delete(&self.name).await
    }
}
