//! Error types for portbump.
//!
//! All operations return `Result<T>` which aliases `Result<T, BumpError>`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from scan and bump operations.
#[derive(Debug, Error)]
pub enum BumpError {
    /// Target port has no recipe under the ports root.
    #[error("Port '{0}' not found")]
    PortNotFound(String),

    /// Origin is not of the form `category/name`.
    #[error("Invalid origin '{0}': {1}")]
    InvalidOrigin(String, String),

    /// Library name or version argument rejected.
    #[error("Invalid {0}: {1}")]
    InvalidArgument(String, String),

    /// Build tool printed the wrong number of lines.
    #[error("Malformed build-tool output for {origin}: expected {expected} lines, got {actual}")]
    MalformedToolOutput {
        origin: String,
        expected: usize,
        actual: usize,
    },

    /// PORTREVISION did not parse as a non-negative integer.
    #[error("Invalid PORTREVISION '{value}' for {origin}")]
    InvalidRevision { origin: String, value: String },

    /// Build tool could not be started or exited unsuccessfully.
    #[error("Build tool failed in {port}: {message}")]
    ToolFailed { port: String, message: String },

    /// Version-control checkout failed.
    #[error("Checkout failed: {0}")]
    CheckoutFailed(String),

    /// A backup from an earlier run is still in place.
    #[error("Backup already exists: {0}")]
    BackupExists(PathBuf),

    /// Rollback failed after commit error.
    #[error("Rollback failed: {0}")]
    RollbackFailed(String),

    /// User declined confirmation.
    ///
    /// Not a failure, used for control flow when user cancels.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// File system operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Regex compilation failed (indicates bug).
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Directory walk failed.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Unexpected error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for portbump operations.
pub type Result<T> = std::result::Result<T, BumpError>;
