//! # Session Errors

use axum::http::StatusCode;
use thiserror::Error;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Session store errors
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// No live session with this id
    #[error("Session not found")]
    NotFound,

    /// Session id was blank
    #[error("Session id must not be empty")]
    InvalidId,

    /// Lock poisoned or similar
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl SessionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SessionError::NotFound => StatusCode::NOT_FOUND,
            SessionError::InvalidId => StatusCode::BAD_REQUEST,
            SessionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
