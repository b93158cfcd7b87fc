//! Endpoint registration routes
//!
//! `POST`/`PUT /api/endpoints` registers, `GET /api/endpoints` lists.
//! Guarded by the admin key when one is configured.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::state::{run_blocking, GatewayState};
use crate::endpoints::{EndpointDefinition, EndpointRegistration};
use crate::gateway::GatewayError;

/// Registration routes with shared state
pub fn registration_routes(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route(
            "/api/endpoints",
            get(list_handler).post(register_handler).put(register_handler),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub endpoint_id: i64,
    pub message: String,
}

async fn register_handler(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<RegisterResponse>), GatewayError> {
    state.check_admin(&headers)?;

    let registration: EndpointRegistration = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::MalformedRequest(format!("invalid registration: {}", e)))?;

    let gateway = Arc::clone(&state.gateway);
    let endpoint_id = run_blocking(move || gateway.register(registration)).await?;

    Ok((
        StatusCode::OK,
        Json(RegisterResponse {
            endpoint_id,
            message: "Dynamic endpoint created successfully.".to_string(),
        }),
    ))
}

async fn list_handler(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<EndpointDefinition>>, GatewayError> {
    state.check_admin(&headers)?;

    let gateway = Arc::clone(&state.gateway);
    let definitions = run_blocking(move || gateway.endpoints()).await?;
    Ok(Json(definitions))
}
