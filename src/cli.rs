use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::catalog::{
    BatchSummary, CatalogView, Column, DeleteReport, FileRecord, QuotaInfo, SortDirection,
    SortKey, default_destination,
};
use crate::config::parse_app_id;
use crate::error::{Error, Result};
use crate::storage::remote::RemoteStorage;
use crate::storage::utils::OutputFormat;
use crate::storage::utils::size::{format_size, usage_percent};
use crate::storage::{StorageClient, StorageConfig};
use crate::utils::confirm_deletion;

mod shell;

#[derive(Parser, Debug)]
#[command(
    name = "cloudshelf",
    version,
    about = "Inspect, upload, download and delete files in a per-application cloud file store"
)]
pub struct Args {
    /// Application whose cloud namespace to open
    #[arg(short, long, env = "CLOUD_APP_ID", global = true)]
    pub app_id: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List files with their metadata and the quota usage
    Ls {
        /// Column to sort by
        #[arg(short, long, value_enum)]
        sort: Option<Column>,
        /// Sort descending instead of ascending
        #[arg(short, long, requires = "sort")]
        reverse: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },
    /// Show quota usage
    Quota {
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },
    /// Download one file
    Get {
        /// Remote file name; exactly one is accepted
        #[arg(required = true)]
        names: Vec<String>,
        /// Local destination file or directory (defaults to the file's base name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete one or more files
    Rm {
        #[arg(required = true)]
        names: Vec<String>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Upload local files, each stored under its base name
    Put {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Interactive session keeping the file list, sort order and selection
    Shell,
}

pub async fn run(args: Args, config: StorageConfig) -> Result<()> {
    if let Command::Shell = args.command {
        return shell::run(config, args.app_id.as_deref()).await;
    }

    let app_id = require_app_id(args.app_id.as_deref())?;
    let mut view = CatalogView::new();
    view.connect(StorageClient::connect(config, app_id).await?)
        .await?;

    match args.command {
        Command::Ls {
            sort,
            reverse,
            format,
        } => {
            if let Some(column) = sort {
                let direction = if reverse {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                view.sort_by(SortKey::new(column, direction));
            }
            print_listing(&view, format)
        }
        Command::Quota { format } => print_quota(&view, format),
        Command::Get { names, output } => {
            view.select(&names)?;
            let destination = match (output, view.selected().as_slice()) {
                (Some(path), _) => path,
                (None, [record]) => default_destination(record),
                (None, _) => PathBuf::from("."),
            };
            let outcome = view.download_one(&destination).await?;
            println!(
                "File downloaded: {} -> {} ({} bytes)",
                outcome.name,
                outcome.local_path.display(),
                outcome.bytes
            );
            Ok(())
        }
        Command::Rm { names, force } => {
            view.select(&names)?;
            if !confirm_deletion(&names, force)? {
                println!("Aborted.");
                return Ok(());
            }
            let report = view.delete_many().await?;
            print_delete_report(&view, &report);
            report.into_result().map(|_| ())
        }
        Command::Put { paths } => {
            let uploaded = view.upload_many(&paths).await?;
            for name in &uploaded {
                println!("Uploaded: {name}");
            }
            print_summary(&view);
            Ok(())
        }
        Command::Shell => unreachable!("handled above"),
    }
}

fn require_app_id(raw: Option<&str>) -> Result<u32> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse_app_id(raw),
        _ => Err(Error::MissingEnvVar {
            key: "CLOUD_APP_ID".to_string(),
        }),
    }
}

#[derive(Serialize)]
struct Listing<'a> {
    files: &'a [FileRecord],
    quota: Option<QuotaInfo>,
}

pub(crate) fn print_listing<S: RemoteStorage>(
    view: &CatalogView<S>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            let mut stdout = io::stdout().lock();
            write_table(&mut stdout, view.records())?;
            drop(stdout);
            print_summary(view);
        }
        OutputFormat::Json => {
            let listing = Listing {
                files: view.records(),
                quota: view.quota(),
            };
            println!("{}", serde_json::to_string(&listing)?);
        }
    }
    Ok(())
}

pub(crate) fn print_quota<S: RemoteStorage>(
    view: &CatalogView<S>,
    format: OutputFormat,
) -> Result<()> {
    match (format, view.quota()) {
        (OutputFormat::Json, quota) => println!("{}", serde_json::to_string(&quota)?),
        (OutputFormat::Human, Some(quota)) => {
            print_summary(view);
            println!(
                "{} of {} available ({}% used)",
                format_size(quota.available_bytes),
                format_size(quota.total_bytes),
                usage_percent(quota.used_bytes(), quota.total_bytes)
            );
        }
        (OutputFormat::Human, None) => println!("Quota unknown"),
    }
    Ok(())
}

pub(crate) fn print_summary<S: RemoteStorage>(view: &CatalogView<S>) {
    if let Some(summary) = view.summary() {
        println!("{summary}");
    }
}

pub(crate) fn print_delete_report<S: RemoteStorage>(
    view: &CatalogView<S>,
    report: &DeleteReport,
) {
    for name in &report.deleted {
        println!("Deleted: {name}");
    }
    for failure in &report.failures {
        eprintln!("{failure}");
    }
    if let Some(e) = &report.quota_error {
        eprintln!("{e}");
    }
    if report.summary() == BatchSummary::AllSucceeded {
        println!("Files deleted.");
    }
    print_summary(view);
}

/// Write records as an aligned table, one row per file.
pub fn write_table<W: Write>(out: &mut W, records: &[FileRecord]) -> io::Result<()> {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            Column::ALL
                .iter()
                .map(|column| column.cell(record).to_string())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = Column::ALL
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.title().len()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let header: Vec<String> = Column::ALL.iter().map(|c| c.title().to_string()).collect();
    for row in std::iter::once(&header).chain(rows.iter()) {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &width))| {
                if Column::from_index(i) == Some(Column::Size) {
                    format!("{cell:>width$}")
                } else {
                    format!("{cell:<width$}")
                }
            })
            .collect();
        writeln!(out, "{}", line.join("  ").trim_end())?;
    }
    Ok(())
}
