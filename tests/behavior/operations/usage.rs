use crate::*;
use assert_cmd::prelude::*;
use cloudshelf::catalog::QuotaInfo;
use cloudshelf::error::Result;
use cloudshelf::storage::StorageClient;
use cloudshelf::storage::remote::RemoteStorage;
use predicates::prelude::*;

pub fn tests(tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        test_quota_tracks_file_sizes,
        test_empty_namespace_has_full_quota,
        test_cli_quota
    ));
}

async fn test_quota_tracks_file_sizes(client: StorageClient) -> Result<()> {
    let sizes: [usize; 3] = [1000, 2048, 3];
    for (idx, size) in sizes.iter().enumerate() {
        client
            .operator()
            .write(&format!("f{idx}"), vec![b'a'; *size])
            .await?;
    }
    let expected_used: u64 = sizes.iter().map(|s| *s as u64).sum();

    let quota = client.quota().await?;
    assert_eq!(
        quota,
        QuotaInfo::new(TEST_QUOTA_BYTES, TEST_QUOTA_BYTES - expected_used)
    );

    let mut view = open_view(&client).await?;
    client.operator().write("late", vec![b'b'; 7]).await?;
    let recomputed = view.recompute_quota().await?;
    assert_eq!(recomputed.used_bytes(), expected_used + 7);
    Ok(())
}

async fn test_empty_namespace_has_full_quota(client: StorageClient) -> Result<()> {
    let view = open_view(&client).await?;
    let summary = view.summary().expect("summary after connect");
    assert_eq!(
        summary.to_string(),
        format!("0 files, 0/{TEST_QUOTA_BYTES} bytes used")
    );
    Ok(())
}

async fn test_cli_quota(client: StorageClient) -> Result<()> {
    client.operator().write("one", vec![b'z'; 42]).await?;

    cloudshelf_cmd(client.app_id())
        .arg("quota")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "1 files, 42/{TEST_QUOTA_BYTES} bytes used"
        )));

    cloudshelf_cmd(client.app_id())
        .args(["quota", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "\"available_bytes\":{}",
            TEST_QUOTA_BYTES - 42
        )));
    Ok(())
}
