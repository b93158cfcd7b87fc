//! Dynamic endpoint routes
//!
//! `POST`/`PUT`/`DELETE /api/dynamic/:name` invoke a write template.
//! `GET /api/dynamic/:name[/:id]` runs a read template.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use super::state::{header_value, run_blocking, GatewayState, API_KEY_HEADER};
use crate::gateway::{GatewayError, Invocation, InvocationBody, ReadRequest};
use crate::template::RowPayload;

/// Dynamic routes with shared state
pub fn dynamic_routes(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route(
            "/api/dynamic/:name",
            get(read_handler)
                .post(invoke_handler)
                .put(invoke_handler)
                .delete(invoke_handler),
        )
        .route("/api/dynamic/:name/:id", get(read_by_id_handler))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct InvokeResponse {
    pub message: String,
    pub rows_affected: u64,
}

async fn invoke_handler(
    State(state): State<Arc<GatewayState>>,
    method: Method,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<InvokeResponse>), GatewayError> {
    let body: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(RowPayload::new())
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| GatewayError::MalformedRequest(format!("invalid JSON body: {}", e)))?
    };

    let invocation = Invocation {
        endpoint: name,
        method: method.as_str().to_string(),
        credential: header_value(&headers, API_KEY_HEADER),
        body: InvocationBody::from_json(body)?,
    };

    let gateway = Arc::clone(&state.gateway);
    let outcome = run_blocking(move || gateway.invoke(invocation)).await?;

    Ok((
        StatusCode::OK,
        Json(InvokeResponse {
            message: "Ok".to_string(),
            rows_affected: outcome.rows_affected,
        }),
    ))
}

async fn read_handler(
    State(state): State<Arc<GatewayState>>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RowPayload>>, GatewayError> {
    read(state, name, None, params, &headers).await
}

async fn read_by_id_handler(
    State(state): State<Arc<GatewayState>>,
    Path((name, id)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RowPayload>>, GatewayError> {
    read(state, name, Some(id), params, &headers).await
}

async fn read(
    state: Arc<GatewayState>,
    name: String,
    id: Option<String>,
    params: HashMap<String, String>,
    headers: &HeaderMap,
) -> Result<Json<Vec<RowPayload>>, GatewayError> {
    let request = ReadRequest {
        endpoint: name,
        credential: header_value(headers, API_KEY_HEADER),
        fields: read_fields(id, params),
    };

    let gateway = Arc::clone(&state.gateway);
    let rows = run_blocking(move || gateway.read(request)).await?;
    Ok(Json(rows))
}

/// The id segment becomes field `id`; query parameters are merged over it.
pub fn read_fields(id: Option<String>, params: HashMap<String, String>) -> RowPayload {
    let mut fields = RowPayload::new();
    if let Some(id) = id {
        fields.insert("id".to_string(), Value::String(id));
    }
    for (key, value) in params {
        fields.insert(key, Value::String(value));
    }
    fields
}
