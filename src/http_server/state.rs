//! Shared handler state and header helpers

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::endpoints::constant_time_str_eq;
use crate::gateway::{Gateway, GatewayError, GatewayResult};

/// Header carrying the endpoint credential
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the admin secret for registration routes
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// State for the dynamic and registration routers
pub struct GatewayState {
    pub gateway: Arc<Gateway>,
    /// When set, `/api/endpoints` requires it in [`ADMIN_KEY_HEADER`]
    pub admin_key: Option<String>,
}

impl GatewayState {
    pub fn new(gateway: Arc<Gateway>, admin_key: Option<String>) -> Self {
        Self { gateway, admin_key }
    }

    /// Reject the request unless it carries the configured admin key
    pub fn check_admin(&self, headers: &HeaderMap) -> GatewayResult<()> {
        let Some(expected) = self.admin_key.as_deref() else {
            return Ok(());
        };
        match header_value(headers, ADMIN_KEY_HEADER) {
            Some(supplied) if constant_time_str_eq(expected, &supplied) => Ok(()),
            _ => Err(GatewayError::AuthRejected),
        }
    }
}

/// Header value as a string, if present and valid UTF-8
pub fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Run blocking gateway work off the async executor
pub async fn run_blocking<T, F>(work: F) -> GatewayResult<T>
where
    F: FnOnce() -> GatewayResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| GatewayError::Internal(format!("worker failed: {}", e)))?
}
