use crate::*;
use assert_cmd::prelude::*;
use cloudshelf::error::{Error, Result};
use cloudshelf::storage::StorageClient;
use predicates::prelude::*;

pub fn tests(tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        test_upload_many_lists_new_files,
        test_upload_overwrites_existing_file,
        test_upload_stops_at_missing_file,
        test_cli_put
    ));
}

async fn test_upload_many_lists_new_files(client: StorageClient) -> Result<()> {
    let local = local_dir("up");
    let mut paths = Vec::new();
    for _ in 0..3 {
        let (name, content, _) = TEST_FIXTURE.new_file();
        let path = local.join(&name);
        std::fs::write(&path, content)?;
        paths.push(path);
    }

    let mut view = open_view(&client).await?;
    let uploaded = view.upload_many(&paths).await?;

    assert_eq!(uploaded.len(), 3);
    assert_eq!(view.len(), 3);
    for name in &uploaded {
        assert!(client.operator().exists(name).await?);
    }
    Ok(())
}

async fn test_upload_overwrites_existing_file(client: StorageClient) -> Result<()> {
    let name = TEST_FIXTURE.new_file_name();
    client.operator().write(&name, b"old".to_vec()).await?;
    let path = local_dir("up-over").join(&name);
    std::fs::write(&path, b"replacement content")?;

    let mut view = open_view(&client).await?;
    view.upload_many(&[&path]).await?;

    let stored = client.operator().read(&name).await?.to_vec();
    assert_eq!(stored, b"replacement content");
    assert_eq!(view.get(&name).map(|r| r.size), Some(19));
    Ok(())
}

async fn test_upload_stops_at_missing_file(client: StorageClient) -> Result<()> {
    let local = local_dir("up-missing");
    let first = local.join(TEST_FIXTURE.new_file_name());
    std::fs::write(&first, b"first")?;
    let missing = local.join("not-there.sav");
    let last = local.join(TEST_FIXTURE.new_file_name());
    std::fs::write(&last, b"last")?;

    let mut view = open_view(&client).await?;
    let result = view.upload_many(&[&first, &missing, &last]).await;

    assert!(matches!(result, Err(Error::UploadFailed { .. })));
    assert_eq!(view.len(), 1, "only the file before the failure is uploaded");
    Ok(())
}

async fn test_cli_put(client: StorageClient) -> Result<()> {
    let (name, content, size) = TEST_FIXTURE.new_file();
    let path = local_dir("cli-put").join(&name);
    std::fs::write(&path, &content)?;

    cloudshelf_cmd(client.app_id())
        .arg("put")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Uploaded: {name}")))
        .stdout(predicate::str::contains(format!(
            "1 files, {size}/{TEST_QUOTA_BYTES} bytes used"
        )));

    assert_eq!(client.operator().read(&name).await?.to_vec(), content);
    Ok(())
}
