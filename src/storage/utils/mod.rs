// Utilities for storage module
pub mod error;
pub mod path;
pub mod size;

/// Output format for CLI commands that can render machine-readable results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human friendly table output
    #[default]
    Human,
    /// Single-line JSON output
    Json,
}
