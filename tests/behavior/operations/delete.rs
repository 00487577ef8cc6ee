use crate::*;
use assert_cmd::prelude::*;
use cloudshelf::catalog::BatchSummary;
use cloudshelf::error::{Error, Result};
use cloudshelf::storage::StorageClient;
use predicates::prelude::*;
use std::io::{BufRead, BufReader, Read, Write};
use std::process::Stdio;

pub fn tests(tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        test_delete_many_removes_selected_files,
        test_delete_many_reports_missing_file,
        test_delete_without_selection_fails,
        test_cli_rm_force,
        test_cli_rm_unknown_name,
        test_shell_reports_each_failure_once
    ));
}

async fn test_delete_many_removes_selected_files(client: StorageClient) -> Result<()> {
    let mut names = Vec::new();
    for _ in 0..3 {
        let (name, content, _) = TEST_FIXTURE.new_file();
        client.operator().write(&name, content).await?;
        names.push(name);
    }
    let (keep, content, keep_size) = TEST_FIXTURE.new_file();
    client.operator().write(&keep, content).await?;

    let mut view = open_view(&client).await?;
    view.select(&names)?;
    let report = view.delete_many().await?;

    assert_eq!(report.summary(), BatchSummary::AllSucceeded);
    assert_eq!(report.deleted, names);
    assert_eq!(view.len(), 1);
    for name in &names {
        let result = client.operator().stat(name).await;
        assert!(
            matches!(result, Err(e) if e.kind() == opendal::ErrorKind::NotFound),
            "{name} should be deleted"
        );
    }
    let quota = view.quota().expect("quota after delete");
    assert_eq!(quota.used_bytes(), keep_size as u64);
    Ok(())
}

async fn test_delete_many_reports_missing_file(client: StorageClient) -> Result<()> {
    let (gone, content, _) = TEST_FIXTURE.new_file();
    client.operator().write(&gone, content).await?;
    let (present, content, _) = TEST_FIXTURE.new_file();
    client.operator().write(&present, content).await?;

    let mut view = open_view(&client).await?;
    // Removed behind the view's back: the snapshot is now stale
    client.operator().delete(&gone).await?;
    view.select([&gone, &present])?;
    let report = view.delete_many().await?;

    assert_eq!(report.summary(), BatchSummary::SomeFailed);
    assert_eq!(report.deleted, [present.clone()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, gone);
    assert!(view.get(&gone).is_some(), "failed file stays listed");
    assert!(view.get(&present).is_none());
    Ok(())
}

async fn test_delete_without_selection_fails(client: StorageClient) -> Result<()> {
    let mut view = open_view(&client).await?;
    assert!(matches!(
        view.delete_many().await,
        Err(Error::InvalidSelection { .. })
    ));
    Ok(())
}

async fn test_cli_rm_force(client: StorageClient) -> Result<()> {
    let (name, content, _) = TEST_FIXTURE.new_file();
    client.operator().write(&name, content).await?;

    cloudshelf_cmd(client.app_id())
        .args(["rm", "-f", name.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Deleted: {name}")))
        .stdout(predicate::str::contains("Files deleted."))
        .stdout(predicate::str::contains("0 files, 0/"));

    assert!(!client.operator().exists(&name).await?);
    Ok(())
}

async fn test_cli_rm_unknown_name(client: StorageClient) -> Result<()> {
    let name = TEST_FIXTURE.new_file_name();

    cloudshelf_cmd(client.app_id())
        .args(["rm", "-f", name.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not in the current file list"));
    Ok(())
}

async fn test_shell_reports_each_failure_once(client: StorageClient) -> Result<()> {
    let (gone, content, _) = TEST_FIXTURE.new_file();
    client.operator().write(&gone, content).await?;
    let (present, content, _) = TEST_FIXTURE.new_file();
    client.operator().write(&present, content).await?;

    let mut child = cloudshelf_cmd(client.app_id())
        .env("RUST_LOG", "warn")
        .arg("shell")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    let mut stdin = child.stdin.take().expect("shell stdin");
    let mut stdout = BufReader::new(child.stdout.take().expect("shell stdout"));

    writeln!(stdin, "select {gone} {present}")?;
    let mut line = String::new();
    while !line.contains("selected.") {
        line.clear();
        if stdout.read_line(&mut line)? == 0 {
            break;
        }
    }
    assert!(line.contains("2 file(s) selected."), "got: {line}");

    // Removed while the shell still lists it
    client.operator().delete(&gone).await?;
    writeln!(stdin, "rm -f")?;
    writeln!(stdin, "quit")?;
    drop(stdin);

    let mut rest = String::new();
    stdout.read_to_string(&mut rest)?;
    let output = child.wait_with_output()?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(rest.contains(&format!("Deleted: {present}")), "stdout: {rest}");
    assert_eq!(stderr.matches("failed to delete").count(), 1, "stderr: {stderr}");
    assert!(stderr.contains(&format!("{gone} failed to delete.")));
    Ok(())
}
