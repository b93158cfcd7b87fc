//! # Gateway Errors
//!
//! The failure taxonomy every request outcome maps onto.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::lifecycle::ForbiddenTransition;
use crate::endpoints::RegistryError;
use crate::engine::ExecutionError;
use crate::schema::ValidationFailure;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Body sent for every server-side fault
pub const INTERNAL_SERVER_ERROR_TEXT: &str = "Internal Server Error";

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    // ==================
    // Rejections (4xx)
    // ==================
    /// No credential was supplied
    #[error("Unauthorized")]
    AuthRejected,

    /// No definition matches name, method and credential
    #[error("Unauthorized")]
    NotResolved,

    /// Payload does not carry the expected fields
    #[error("{0}")]
    ValidationRejected(#[from] ValidationFailure),

    /// Body or registration could not be used at all
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    // ==================
    // Server faults (5xx)
    // ==================
    /// Backing-store failure while running a template; already rolled back
    #[error("Execution failed: {0}")]
    ExecutionFailed(#[from] ExecutionError),

    /// Backing-store failure while persisting a definition
    #[error("Registration failed: {0}")]
    RegistrationFailed(RegistryError),

    /// Anything else on the server side
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ForbiddenTransition> for GatewayError {
    fn from(err: ForbiddenTransition) -> Self {
        GatewayError::Internal(err.to_string())
    }
}

impl GatewayError {
    /// Map a registry failure during resolution
    pub fn from_resolution(err: RegistryError) -> Self {
        match err {
            RegistryError::Store(store) => {
                GatewayError::ExecutionFailed(ExecutionError::Store(store))
            }
            other => GatewayError::Internal(other.to_string()),
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::AuthRejected | GatewayError::NotResolved => StatusCode::UNAUTHORIZED,
            GatewayError::ValidationRejected(_) | GatewayError::MalformedRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::ExecutionFailed(_)
            | GatewayError::RegistrationFailed(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::AuthRejected => "AuthRejected",
            GatewayError::NotResolved => "NotResolved",
            GatewayError::ValidationRejected(_) => "ValidationRejected",
            GatewayError::MalformedRequest(_) => "MalformedRequest",
            GatewayError::ExecutionFailed(_) => "ExecutionFailed",
            GatewayError::RegistrationFailed(_) => "RegistrationFailed",
            GatewayError::Internal(_) => "Internal",
        }
    }

    pub fn is_server_fault(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Text safe to send to the caller. Server faults never carry
    /// backing-store diagnostics.
    pub fn public_message(&self) -> String {
        if self.is_server_fault() {
            INTERNAL_SERVER_ERROR_TEXT.to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), self.public_message()).into_response()
    }
}
