//! HTTP Gateway Tests
//!
//! Drives the full router in-process:
//! register -> invoke -> read, plus the status mapping of each failure kind.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use sqlgate::endpoints::SqliteEndpointRegistry;
use sqlgate::engine::ExecutionEngine;
use sqlgate::gateway::Gateway;
use sqlgate::http_server::{HttpServer, HttpServerConfig, ServerContext};
use sqlgate::observability::MetricsRegistry;
use sqlgate::schema::{SchemaCatalog, SchemaDescriptor};
use sqlgate::session::SessionStore;
use sqlgate::store::{Database, DatabaseConfig};

const ADMIN: &str = "admin-secret";

struct App {
    _tmp: TempDir,
    router: Router,
}

fn app() -> App {
    let tmp = TempDir::new().unwrap();
    let db = Database::open(DatabaseConfig::new(tmp.path().join("gate.db"))).unwrap();
    db.connect()
        .unwrap()
        .execute_batch("CREATE TABLE items (name TEXT UNIQUE NOT NULL, qty INTEGER);")
        .unwrap();

    let mut catalog = SchemaCatalog::new();
    catalog.insert("items", SchemaDescriptor::new(["name", "qty"]));

    let gateway = Gateway::new(
        Arc::new(SqliteEndpointRegistry::new(db.clone())),
        Arc::new(catalog),
        ExecutionEngine::new(db),
        Arc::new(MetricsRegistry::new()),
    );
    let context = ServerContext {
        gateway: Arc::new(gateway),
        sessions: Arc::new(SessionStore::new()),
        admin_key: Some(ADMIN.to_string()),
    };

    App {
        _tmp: tmp,
        router: HttpServer::new(HttpServerConfig::default(), context).router(),
    }
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn register(router: &Router, name: &str, method: &str, template: &str) -> StatusCode {
    let (status, _) = send(
        router,
        Method::POST,
        "/api/endpoints",
        &[("x-admin-key", ADMIN)],
        Some(json!({
            "endpointName": name,
            "method": method,
            "credential": "k1",
            "sqlTemplate": template,
        })),
    )
    .await;
    status
}

async fn register_items(router: &Router) {
    assert_eq!(
        register(router, "items", "post", "INSERT INTO items VALUES ($name$, $qty$)").await,
        StatusCode::OK
    );
    assert_eq!(
        register(
            router,
            "items",
            "GET",
            "SELECT name, qty FROM items WHERE qty >= $min$ ORDER BY name",
        )
        .await,
        StatusCode::OK
    );
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

// =============================================================================
// Happy path
// =============================================================================

#[tokio::test]
async fn test_register_invoke_read() {
    let app = app();
    register_items(&app.router).await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/dynamic/items",
        &[("x-api-key", "k1")],
        Some(json!({"rows": [
            {"name": "bolt", "qty": 10},
            {"name": "nut", "qty": 3},
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({"message": "Ok", "rows_affected": 2}));

    let (status, body) = send(
        &app.router,
        Method::GET,
        "/api/dynamic/items?min=5",
        &[("x-api-key", "k1")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!([{"name": "bolt", "qty": 10}]));
}

/// The id path segment reaches the template as field `id`, beside the query.
#[tokio::test]
async fn test_read_by_id_merges_path_and_query() {
    let app = app();
    assert_eq!(
        register(&app.router, "items", "POST", "INSERT INTO items VALUES ($name$, $qty$)").await,
        StatusCode::OK
    );
    assert_eq!(
        register(
            &app.router,
            "items",
            "GET",
            "SELECT name, qty FROM items WHERE name = $id$ AND qty >= $x$",
        )
        .await,
        StatusCode::OK
    );

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/dynamic/items",
        &[("x-api-key", "k1")],
        Some(json!({"rows": [
            {"name": "bolt", "qty": 10},
            {"name": "nut", "qty": 3},
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app.router,
        Method::GET,
        "/api/dynamic/items/bolt?x=1",
        &[("x-api-key", "k1")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!([{"name": "bolt", "qty": 10}]));

    let (status, body) = send(
        &app.router,
        Method::GET,
        "/api/dynamic/items/nut?x=5",
        &[("x-api-key", "k1")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!([]));
}

#[tokio::test]
async fn test_registration_response_and_listing() {
    let app = app();

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/endpoints",
        &[("x-admin-key", ADMIN)],
        Some(json!({
            "endpointName": "items",
            "method": "POST",
            "apiKey": "k1",
            "sqlCommand": "INSERT INTO items VALUES ($name$, $qty$)",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["endpoint_id"], json!(1));
    assert_eq!(body["message"], json!("Dynamic endpoint created successfully."));

    let (status, body) = send(
        &app.router,
        Method::GET,
        "/api/endpoints",
        &[("x-admin-key", ADMIN)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listing = json_body(&body);
    assert_eq!(listing[0]["name"], json!("items"));
    assert_eq!(listing[0]["method"], json!("POST"));
    assert_eq!(
        listing[0]["sqlTemplate"],
        json!("INSERT INTO items VALUES ($name$, $qty$)")
    );
    assert!(listing[0].get("createdAt").is_some());
    assert!(listing[0].get("credential").is_none());
}

// =============================================================================
// Failure mapping
// =============================================================================

#[tokio::test]
async fn test_registration_requires_admin_key() {
    let app = app();

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/endpoints",
        &[("x-admin-key", "wrong")],
        Some(json!({
            "endpointName": "items",
            "method": "POST",
            "credential": "k1",
            "sqlTemplate": "SELECT 1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_blank_registration_field_is_bad_request() {
    let app = app();
    assert_eq!(
        register(&app.router, "items", "POST", "   ").await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_wrong_credential_is_unauthorized() {
    let app = app();
    register_items(&app.router).await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/dynamic/items",
        &[("x-api-key", "k2")],
        Some(json!({"name": "bolt", "qty": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, b"Unauthorized");

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/dynamic/items",
        &[],
        Some(json!({"name": "bolt", "qty": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let app = app();
    register_items(&app.router).await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/dynamic/items",
        &[("x-api-key", "k1")],
        Some(json!({"rows": [{"name": "bolt", "qty": 1}, {"NAME": "nut"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("qty"));
}

#[tokio::test]
async fn test_non_object_body_is_bad_request() {
    let app = app();
    register_items(&app.router).await;

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/dynamic/items",
        &[("x-api-key", "k1")],
        Some(json!([1, 2, 3])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// A rows array with a non-object element is a malformed batch, never a single row.
#[tokio::test]
async fn test_rows_with_non_object_element_is_bad_request() {
    let app = app();
    register_items(&app.router).await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/dynamic/items",
        &[("x-api-key", "k1")],
        Some(json!({"name": "bolt", "qty": 1, "rows": [{"name": "nut", "qty": 2}, 5]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("rows[1]"));

    let (_, body) = send(
        &app.router,
        Method::GET,
        "/api/dynamic/items?min=0",
        &[("x-api-key", "k1")],
        None,
    )
    .await;
    assert_eq!(json_body(&body), json!([]));
}

/// Store diagnostics stay out of the response body.
#[tokio::test]
async fn test_store_failure_is_opaque_server_error() {
    let app = app();
    register_items(&app.router).await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/dynamic/items",
        &[("x-api-key", "k1")],
        Some(json!({"rows": [
            {"name": "bolt", "qty": 1},
            {"name": "bolt", "qty": 2},
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"Internal Server Error");

    let (_, body) = send(
        &app.router,
        Method::GET,
        "/api/dynamic/items?min=0",
        &[("x-api-key", "k1")],
        None,
    )
    .await;
    assert_eq!(json_body(&body), json!([]));
}

// =============================================================================
// Sessions and observability
// =============================================================================

#[tokio::test]
async fn test_session_round_trip() {
    let app = app();

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/sessions",
        &[],
        Some(json!({"cart": ["bolt"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json_body(&body)["session_id"].as_str().unwrap().to_string();
    let uri = format!("/api/sessions/{}", id);

    let (status, _) = send(
        &app.router,
        Method::PUT,
        &uri,
        &[],
        Some(json!({"cart": ["bolt", "nut"]})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app.router, Method::DELETE, &uri, &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({"cart": ["bolt", "nut"]}));

    let (status, _) = send(&app.router, Method::GET, &uri, &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_count_outcomes() {
    let app = app();
    register_items(&app.router).await;

    send(
        &app.router,
        Method::POST,
        "/api/dynamic/items",
        &[("x-api-key", "k1")],
        Some(json!({"name": "bolt", "qty": 1})),
    )
    .await;
    send(
        &app.router,
        Method::POST,
        "/api/dynamic/items",
        &[("x-api-key", "nope")],
        Some(json!({"name": "nut", "qty": 1})),
    )
    .await;

    let (status, body) = send(&app.router, Method::GET, "/observability/metrics", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    let metrics = json_body(&body);
    assert_eq!(metrics["requests_received"], json!(2));
    assert_eq!(metrics["requests_committed"], json!(1));
    assert_eq!(metrics["requests_rejected"], json!(1));
    assert_eq!(metrics["endpoints_registered"], json!(2));

    let (status, _) = send(&app.router, Method::GET, "/health", &[], None).await;
    assert_eq!(status, StatusCode::OK);
}
