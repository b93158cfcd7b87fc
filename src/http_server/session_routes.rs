//! Session HTTP Routes
//!
//! `POST /api/sessions` starts a session, `/api/sessions/:id` reads,
//! replaces or ends one.

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::observability::{log_event_with_fields, Event};
use crate::session::{SessionError, SessionStore};

/// Shared session state
pub struct SessionState {
    pub store: Arc<SessionStore>,
}

impl SessionState {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }
}

/// Session routes with shared state
pub fn session_routes(state: Arc<SessionState>) -> Router {
    Router::new()
        .route("/api/sessions", post(start_handler))
        .route(
            "/api/sessions/:id",
            get(get_handler).put(store_handler).delete(end_handler),
        )
        .with_state(state)
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
}

async fn start_handler(
    State(state): State<Arc<SessionState>>,
    Json(document): Json<Value>,
) -> Result<(StatusCode, Json<StartSessionResponse>), SessionError> {
    let session_id = state.store.start(document)?;
    log_event_with_fields(Event::SessionStarted, &[]);
    Ok((StatusCode::CREATED, Json(StartSessionResponse { session_id })))
}

async fn get_handler(
    State(state): State<Arc<SessionState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, SessionError> {
    state.store.get(&id)?.map(Json).ok_or(SessionError::NotFound)
}

async fn store_handler(
    State(state): State<Arc<SessionState>>,
    Path(id): Path<String>,
    Json(document): Json<Value>,
) -> Result<StatusCode, SessionError> {
    state.store.store(&id, document)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn end_handler(
    State(state): State<Arc<SessionState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, SessionError> {
    let document = state.store.end(&id)?.ok_or(SessionError::NotFound)?;
    log_event_with_fields(Event::SessionEnded, &[]);
    Ok(Json(document))
}
