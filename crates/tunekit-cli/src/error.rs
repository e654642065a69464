//! Error types for the tunekit CLI

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Library-level failure (invalid facts, unknown profile)
    #[error(transparent)]
    Tunekit(#[from] tunekit::TunekitError),

    /// Artifact write error
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backup of an existing artifact failed
    #[error("failed to back up existing file {path}: {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Drift target does not exist
    #[error("no installed file at {path}; run 'tunekit generate' first")]
    DriftTargetMissing { path: PathBuf },

    /// Installed file differs from the generated parameters
    #[error("drift detected: installed file differs from the generated parameters")]
    DriftDetected,

    /// Interactive prompt error
    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
