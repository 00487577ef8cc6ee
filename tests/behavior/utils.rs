use assert_cmd::prelude::*;
use cloudshelf::catalog::CatalogView;
use cloudshelf::error::Result;
use cloudshelf::storage::{StorageClient, StorageConfig};
use libtest_mimic::{Failed, Trial};
use rand::Rng;
use rand::prelude::*;
use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

/// Quota granted to every namespace created by the behavior tests.
pub const TEST_QUOTA_BYTES: u64 = 1024 * 1024;

const FIRST_TEST_APP_ID: u32 = 1000;

pub static TEST_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
});

pub static TEST_FIXTURE: Fixture = Fixture::new();

/// Filesystem-backed configuration rooted in this run's scratch directory.
pub fn test_config() -> StorageConfig {
    StorageConfig::fs(TEST_FIXTURE.root().to_string_lossy().to_string())
        .with_quota_bytes(TEST_QUOTA_BYTES)
}

/// Connect to a namespace no other test uses.
pub async fn init_test_service() -> Result<StorageClient> {
    StorageClient::connect(test_config(), TEST_FIXTURE.new_app_id()).await
}

/// Open a catalog view on `client`'s namespace.
pub async fn open_view(client: &StorageClient) -> Result<CatalogView<StorageClient>> {
    let mut view = CatalogView::new();
    view.connect(client.clone()).await?;
    Ok(view)
}

/// A fresh local scratch directory for download and upload tests.
pub fn local_dir(tag: &str) -> PathBuf {
    let dir = TEST_FIXTURE
        .root()
        .join("local")
        .join(format!("{tag}-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create local scratch dir");
    dir
}

pub struct Fixture {
    next_app_id: AtomicU32,
    root: LazyLock<PathBuf>,
}

impl Fixture {
    pub const fn new() -> Self {
        Self {
            next_app_id: AtomicU32::new(FIRST_TEST_APP_ID),
            root: LazyLock::new(|| {
                std::env::temp_dir().join(format!("cloudshelf-behavior-{}", Uuid::new_v4()))
            }),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn new_app_id(&self) -> u32 {
        self.next_app_id.fetch_add(1, Ordering::SeqCst)
    }

    pub fn new_file_name(&self) -> String {
        format!("{}.sav", Uuid::new_v4())
    }

    pub fn new_file(&self) -> (String, Vec<u8>, usize) {
        self.new_file_with_range(self.new_file_name(), 1..64 * 1024)
    }

    pub fn new_file_with_range(
        &self,
        name: impl Into<String>,
        range: std::ops::Range<usize>,
    ) -> (String, Vec<u8>, usize) {
        let mut rng = rand::rng();
        let size = rng.random_range(range);
        let mut content = vec![0; size];
        rng.fill_bytes(&mut content);

        (name.into(), content, size)
    }

    pub fn cleanup(&self) {
        let _ = std::fs::remove_dir_all(self.root());
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a base cloudshelf Command pointed at `app_id` in the test root.
pub fn cloudshelf_cmd(app_id: u32) -> Command {
    let mut cmd = Command::cargo_bin("cloudshelf").unwrap();
    cmd.env_clear()
        .env("RUST_LOG", "info")
        .env("STORAGE_PROVIDER", "fs")
        .env("STORAGE_ROOT_PATH", TEST_FIXTURE.root())
        .env("STORAGE_QUOTA_BYTES", TEST_QUOTA_BYTES.to_string())
        .env("CLOUD_APP_ID", app_id.to_string());
    cmd
}

pub fn build_async_trial<F, Fut>(name: &str, f: F) -> Trial
where
    F: FnOnce(StorageClient) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<()>>,
{
    let handle = TEST_RUNTIME.handle().clone();

    Trial::test(format!("behavior::{name}"), move || {
        handle
            .block_on(async move {
                let client = init_test_service().await?;
                f(client).await
            })
            .map_err(|err| Failed::from(err.to_string()))
    })
}

#[macro_export]
macro_rules! async_trials {
    ($($test:ident),*) => {
        vec![$(build_async_trial(stringify!($test), $test),)*]
    };
}
