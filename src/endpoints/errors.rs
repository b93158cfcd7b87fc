//! # Registry Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Endpoint registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registration is missing a required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Backing store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// In-memory state could not be accessed
    #[error("Registry storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for RegistryError {
    fn from(err: rusqlite::Error) -> Self {
        RegistryError::Store(StoreError::Sqlite(err))
    }
}

impl RegistryError {
    /// True when the caller sent a bad registration
    pub fn is_client_error(&self) -> bool {
        matches!(self, RegistryError::MissingField(_))
    }
}
