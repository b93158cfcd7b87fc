//! Backup-specific error types
//!
//! Backup failures are ERROR severity, never FATAL. A failed backup leaves
//! the primary database and any previous backup untouched.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Result type for backup operations
pub type BackupResult<T> = Result<T, BackupError>;

/// Backup errors
#[derive(Debug, Error)]
pub enum BackupError {
    /// Could not prepare the target location
    #[error("Cannot prepare backup target {path}: {source}")]
    Target {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SQLite failed to write the copy
    #[error("Backup copy failed: {0}")]
    Copy(#[from] StoreError),

    /// The finished copy could not be moved into place
    #[error("Cannot move backup into {path}: {source}")]
    Finalize {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<rusqlite::Error> for BackupError {
    fn from(err: rusqlite::Error) -> Self {
        BackupError::Copy(StoreError::Sqlite(err))
    }
}

impl BackupError {
    /// Stable error code for logs
    pub fn code(&self) -> &'static str {
        match self {
            BackupError::Target { .. } | BackupError::Finalize { .. } => "SQLGATE_BACKUP_IO",
            BackupError::Copy(_) => "SQLGATE_BACKUP_FAILED",
        }
    }
}
