//! # Store Errors

use thiserror::Error;

/// Result type for backing-store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Backing-store errors
///
/// Messages carry raw SQLite diagnostics. They are for logs only and are
/// never copied into HTTP bodies.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection could not be opened or configured
    #[error("Failed to open database {path}: {reason}")]
    Open { path: String, reason: String },

    /// SQLite rejected a statement
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A positional marker was not present in the prepared statement
    #[error("Statement has no parameter named {0}")]
    MissingMarker(String),

    /// Filesystem failure around the database file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn open(path: impl Into<String>, reason: impl ToString) -> Self {
        StoreError::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True when SQLite reported a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}
