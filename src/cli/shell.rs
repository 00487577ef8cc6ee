// Interactive session: one catalog view kept alive across commands
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use super::{print_delete_report, print_listing, print_quota};
use crate::catalog::{CatalogView, Column, default_destination};
use crate::config::parse_app_id;
use crate::error::{Error, Result};
use crate::storage::utils::OutputFormat;
use crate::storage::{StorageClient, StorageConfig};

const HELP: &str = "\
Commands:
  connect APP_ID     open an application's cloud namespace
  refresh | ls       reload the file list
  sort COLUMN        sort by column (name, timestamp, size, persisted, exists or 0-4);
                     repeating the same column toggles the direction
  select NAME...     select files (no names clears the selection)
  get [DEST]         download the selected file
  rm [-f]            delete the selected files
  put PATH...        upload local files and reload
  quota              show quota usage
  help               show this help
  quit | exit        leave the shell";

/// Parsed shell input.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Connect(String),
    Refresh,
    Sort(String),
    Select(Vec<String>),
    Get(Option<PathBuf>),
    Rm { force: bool },
    Put(Vec<PathBuf>),
    Quota,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ShellCommand {
    fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return ShellCommand::Empty;
        };
        let rest: Vec<&str> = words.collect();
        match (command, rest.as_slice()) {
            ("connect", [app_id]) => ShellCommand::Connect(app_id.to_string()),
            ("refresh" | "ls", []) => ShellCommand::Refresh,
            ("sort", [column]) => ShellCommand::Sort(column.to_string()),
            ("select", names) => {
                ShellCommand::Select(names.iter().map(|n| n.to_string()).collect())
            }
            ("get", []) => ShellCommand::Get(None),
            ("get", [dest]) => ShellCommand::Get(Some(PathBuf::from(dest))),
            ("rm", []) => ShellCommand::Rm { force: false },
            ("rm", ["-f"]) => ShellCommand::Rm { force: true },
            ("put", paths) if !paths.is_empty() => {
                ShellCommand::Put(paths.iter().map(PathBuf::from).collect())
            }
            ("quota", []) => ShellCommand::Quota,
            ("help" | "?", _) => ShellCommand::Help,
            ("quit" | "exit", _) => ShellCommand::Quit,
            _ => ShellCommand::Unknown(line.trim().to_string()),
        }
    }
}

struct Shell {
    config: StorageConfig,
    view: CatalogView<StorageClient>,
    input: Lines<BufReader<Stdin>>,
}

pub async fn run(config: StorageConfig, app_id: Option<&str>) -> Result<()> {
    let mut shell = Shell {
        config,
        view: CatalogView::new(),
        input: BufReader::new(tokio::io::stdin()).lines(),
    };

    if let Some(app_id) = app_id.filter(|id| !id.trim().is_empty()) {
        let outcome = shell_connect(&mut shell, app_id).await;
        report(outcome);
    }
    println!("Type 'help' for a list of commands.");

    loop {
        let Some(line) = shell.prompt("> ").await? else {
            break;
        };
        let command = ShellCommand::parse(&line);
        if command == ShellCommand::Quit {
            break;
        }
        let outcome = shell.execute(command).await;
        report(outcome);
    }
    Ok(())
}

/// Errors end the command, never the session.
fn report(outcome: Result<()>) {
    if let Err(e) = outcome {
        eprintln!("Error: {e}");
    }
}

async fn shell_connect(shell: &mut Shell, raw: &str) -> Result<()> {
    let app_id = parse_app_id(raw)?;
    let client = StorageClient::connect(shell.config.clone(), app_id).await?;
    let refreshed = shell.view.connect(client).await;
    println!("Connected to app {app_id}.");
    refreshed?;
    print_listing(&shell.view, OutputFormat::Human)
}

impl Shell {
    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(text.as_bytes()).await?;
        stdout.flush().await?;
        Ok(self.input.next_line().await?)
    }

    async fn execute(&mut self, command: ShellCommand) -> Result<()> {
        match command {
            ShellCommand::Connect(raw) => shell_connect(self, &raw).await,
            ShellCommand::Refresh => {
                self.view.refresh().await?;
                print_listing(&self.view, OutputFormat::Human)
            }
            ShellCommand::Sort(raw) => {
                let column: Column = raw.parse()?;
                let key = self.view.click_column(column);
                println!("Sorted by {} ({:?}).", key.column.title(), key.direction);
                print_listing(&self.view, OutputFormat::Human)
            }
            ShellCommand::Select(names) if names.is_empty() => {
                self.view.clear_selection();
                println!("Selection cleared.");
                Ok(())
            }
            ShellCommand::Select(names) => {
                self.view.select(&names)?;
                println!("{} file(s) selected.", self.view.selected().len());
                Ok(())
            }
            ShellCommand::Get(dest) => self.download(dest).await,
            ShellCommand::Rm { force } => self.delete(force).await,
            ShellCommand::Put(paths) => {
                let uploaded = self.view.upload_many(&paths).await?;
                for name in &uploaded {
                    println!("Uploaded: {name}");
                }
                print_listing(&self.view, OutputFormat::Human)
            }
            ShellCommand::Quota => {
                self.view.recompute_quota().await?;
                print_quota(&self.view, OutputFormat::Human)
            }
            ShellCommand::Help => {
                println!("{HELP}");
                Ok(())
            }
            ShellCommand::Quit | ShellCommand::Empty => Ok(()),
            ShellCommand::Unknown(line) => {
                eprintln!("Unknown command: {line}. Type 'help' for a list of commands.");
                Ok(())
            }
        }
    }

    async fn download(&self, dest: Option<PathBuf>) -> Result<()> {
        let destination = match (dest, self.view.selected().as_slice()) {
            (Some(path), _) => path,
            (None, [record]) => default_destination(record),
            (None, _) => PathBuf::from("."),
        };
        let outcome = self.view.download_one(Path::new(&destination)).await?;
        println!(
            "File downloaded: {} -> {}",
            outcome.name,
            outcome.local_path.display()
        );
        Ok(())
    }

    async fn delete(&mut self, force: bool) -> Result<()> {
        if !self.view.is_connected() {
            return Err(Error::NotConnected);
        }
        let count = self.view.selected().len();
        if count > 0 && !force {
            let answer = self
                .prompt(&format!("Delete {count} selected file(s)? (y/N): "))
                .await?
                .unwrap_or_default();
            if !crate::utils::is_affirmative(&answer) {
                println!("Aborted.");
                return Ok(());
            }
        }
        let report = self.view.delete_many().await?;
        print_delete_report(&self.view, &report);
        Ok(())
    }
}
