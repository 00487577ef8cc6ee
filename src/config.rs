use std::env;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::storage::constants::DEFAULT_FS_ROOT;
use crate::storage::{StorageConfig, StorageProvider};

// Helper function to reduce repetitive environment variable loading logic.
fn get_env_var(primary_key: &str, secondary_key: &str) -> Result<String> {
    env::var(primary_key)
        .or_else(|_| env::var(secondary_key))
        .map_err(|_| Error::MissingEnvVar {
            key: format!("{primary_key} or {secondary_key}"),
        })
}

/// Load storage configuration from environment variables
pub fn load_storage_config() -> Result<StorageConfig> {
    let provider_str = env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "fs".to_string());
    let provider = StorageProvider::from_str(&provider_str)?;

    let mut config = match provider {
        StorageProvider::Oss => load_oss_config()?,
        StorageProvider::S3 => load_s3_config(&provider_str)?,
        StorageProvider::Cos => load_cos_config()?,
        StorageProvider::Fs => load_fs_config(),
    };

    if let Ok(root) = env::var("STORAGE_ROOT_PATH") {
        config.root_path = Some(root);
    }
    if let Some(quota_bytes) = parse_quota(env::var("STORAGE_QUOTA_BYTES").ok())? {
        config.quota_bytes = quota_bytes;
    }
    Ok(config)
}

fn parse_quota(raw: Option<String>) -> Result<Option<u64>> {
    raw.map(|value| {
        value
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::InvalidConfig {
                key: "STORAGE_QUOTA_BYTES".to_string(),
                value,
            })
    })
    .transpose()
}

/// Parse an application id as typed by the user.
pub fn parse_app_id(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
        Ok(app_id) if app_id > 0 => Ok(app_id),
        _ => Err(Error::InvalidAppId {
            value: raw.to_string(),
        }),
    }
}

/// Load OSS (Alibaba Cloud) configuration
fn load_oss_config() -> Result<StorageConfig> {
    let bucket = get_env_var("STORAGE_BUCKET", "OSS_BUCKET")?;
    let access_key_id = get_env_var("STORAGE_ACCESS_KEY_ID", "OSS_ACCESS_KEY_ID")?;
    let access_key_secret = get_env_var("STORAGE_ACCESS_KEY_SECRET", "OSS_ACCESS_KEY_SECRET")?;

    let region = env::var("STORAGE_REGION")
        .or_else(|_| env::var("OSS_REGION"))
        .ok();

    let endpoint = env::var("STORAGE_ENDPOINT")
        .or_else(|_| env::var("OSS_ENDPOINT"))
        .unwrap_or_else(|_| "https://oss-cn-hangzhou.aliyuncs.com".to_string());

    let mut config = StorageConfig::oss(bucket, access_key_id, access_key_secret, region);
    config.endpoint = Some(endpoint);
    Ok(config)
}

/// Load S3 (AWS) or MinIO configuration
fn load_s3_config(provider_str: &str) -> Result<StorageConfig> {
    let is_minio = provider_str.to_lowercase() == "minio";
    let (bucket_key, access_key, secret_key) = if is_minio {
        ("MINIO_BUCKET", "MINIO_ACCESS_KEY", "MINIO_SECRET_KEY")
    } else {
        ("AWS_S3_BUCKET", "AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY")
    };

    let bucket = get_env_var("STORAGE_BUCKET", bucket_key)?;
    let access_key_id = get_env_var("STORAGE_ACCESS_KEY_ID", access_key)?;
    let secret_access_key = get_env_var("STORAGE_ACCESS_KEY_SECRET", secret_key)?;

    let region = env::var("STORAGE_REGION")
        .or_else(|_| env::var("AWS_DEFAULT_REGION"))
        .or_else(|_| env::var("MINIO_DEFAULT_REGION"))
        .ok();

    let endpoint = if is_minio {
        Some(
            env::var("STORAGE_ENDPOINT")
                .or_else(|_| env::var("MINIO_ENDPOINT"))
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
        )
    } else {
        env::var("STORAGE_ENDPOINT").ok()
    };

    let mut config = StorageConfig::s3(bucket, access_key_id, secret_access_key, region);
    config.endpoint = endpoint;
    Ok(config)
}

/// Load COS (Tencent Cloud) configuration
fn load_cos_config() -> Result<StorageConfig> {
    let bucket = get_env_var("STORAGE_BUCKET", "COS_BUCKET")?;
    let secret_id = get_env_var("STORAGE_ACCESS_KEY_ID", "COS_SECRET_ID")?;
    let secret_key = get_env_var("STORAGE_ACCESS_KEY_SECRET", "COS_SECRET_KEY")?;

    let mut config = StorageConfig::cos(bucket, secret_id, secret_key);
    config.endpoint = env::var("STORAGE_ENDPOINT")
        .or_else(|_| env::var("COS_ENDPOINT"))
        .ok();
    Ok(config)
}

/// Load filesystem configuration (local development and tests)
fn load_fs_config() -> StorageConfig {
    StorageConfig::fs(DEFAULT_FS_ROOT.to_string())
}
