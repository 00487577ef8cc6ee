use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Environment variable '{key}' is required but not found"))]
    MissingEnvVar { key: String },

    #[snafu(display("Invalid value for '{key}': {value}"))]
    InvalidConfig { key: String, value: String },

    #[snafu(display("Unsupported storage provider: {provider}"))]
    UnsupportedProvider { provider: String },

    #[snafu(display("Invalid application id '{value}': expected a positive integer"))]
    InvalidAppId { value: String },

    #[snafu(display("Not connected"))]
    NotConnected,

    #[snafu(display("Failed to connect to storage for app {app_id}: {source}"))]
    ConnectionFailed { app_id: u32, source: Box<Error> },

    #[snafu(display("Can't refresh: {source}"))]
    FetchFailed { source: Box<Error> },

    #[snafu(display("Failed to query quota: {source}"))]
    QuotaFailed { source: Box<Error> },

    #[snafu(display("Failed to read '{name}': {source}"))]
    ReadFailed { name: String, source: Box<Error> },

    #[snafu(display("Failed to write '{name}': {source}"))]
    WriteFailed { name: String, source: Box<Error> },

    #[snafu(display("'{name}' failed to delete: {source}"))]
    DeleteFailed { name: String, source: Box<Error> },

    #[snafu(display("{message} ({selected} selected)"))]
    InvalidSelection {
        message: &'static str,
        selected: usize,
    },

    #[snafu(display("'{name}' is not in the current file list"))]
    UnknownFile { name: String },

    #[snafu(display("File download failed: '{name}' to '{}': {source}", local_path.display()))]
    TransferFailed {
        name: String,
        local_path: PathBuf,
        source: Box<Error>,
    },

    #[snafu(display("Failed to upload '{}': {source}", local_path.display()))]
    UploadFailed {
        local_path: PathBuf,
        source: Box<Error>,
    },

    #[snafu(display("Path does not exist: {}", path.display()))]
    PathNotFound { path: PathBuf },

    #[snafu(display("Partial deletion failure: {} file(s) failed to delete: {}", failed_names.len(), failed_names.join(", ")))]
    PartialDeletion { failed_names: Vec<String> },

    #[snafu(display("OpenDAL error: {source}"))]
    OpenDal { source: opendal::Error },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },
}

impl From<opendal::Error> for Error {
    fn from(error: opendal::Error) -> Self {
        Error::OpenDal { source: error }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json { source: error }
    }
}
