//! Backup and export error types

use crate::diary::error::ValidationError;
use thiserror::Error;

/// Reasons a backup could not be restored; the store is untouched in every case
#[derive(Error, Debug)]
pub enum RestoreError {
    /// Backup written by a newer format version
    #[error("Unsupported backup version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Compressed container damaged or truncated
    #[error("Failed to decompress backup: {0}")]
    Decompression(String),

    /// Payload is not a well-formed backup document
    #[error("Malformed backup: {0}")]
    Malformed(String),

    /// An entry failed validation
    #[error("Invalid entry at index {index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// Two entries share an id
    #[error("Duplicate entry id in backup: {0}")]
    DuplicateId(String),

    /// Stored data has not finished loading
    #[error("Diary is still loading; try again once hydrated")]
    NotHydrated,
}

impl From<serde_json::Error> for RestoreError {
    fn from(err: serde_json::Error) -> Self {
        RestoreError::Malformed(err.to_string())
    }
}

/// Result type for restore operations
pub type RestoreResult<T> = Result<T, RestoreError>;

/// Failures while producing or delivering an export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Destination rejected the file
    #[error("Export sink error: {0}")]
    Sink(String),

    /// Snapshot could not be taken
    #[error("Backup unavailable: {0}")]
    Restore(#[from] RestoreError),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
