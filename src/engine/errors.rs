//! # Execution Errors

use thiserror::Error;

use crate::store::StoreError;

/// Execution failures. Messages are for logs only.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// A row in a write batch failed; the batch was rolled back
    #[error("Row {row} failed, batch rolled back: {source}")]
    RowFailed {
        row: usize,
        #[source]
        source: StoreError,
    },

    /// Connection, transaction or read-path failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<rusqlite::Error> for ExecutionError {
    fn from(err: rusqlite::Error) -> Self {
        ExecutionError::Store(StoreError::Sqlite(err))
    }
}

impl ExecutionError {
    /// 1-based index of the failing row, if the failure was row-specific
    pub fn failed_row(&self) -> Option<usize> {
        match self {
            ExecutionError::RowFailed { row, .. } => Some(*row),
            ExecutionError::Store(_) => None,
        }
    }
}
