//! # HTTP Server Module
//!
//! Axum routers over the gateway and the session store.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/observability/metrics` - Counters
//! - `/api/endpoints` - Register and list endpoint definitions
//! - `/api/dynamic/:name` - Invoke or read a registered endpoint
//! - `/api/sessions` - Session documents

pub mod config;
pub mod dynamic_routes;
pub mod observability_routes;
pub mod registration_routes;
pub mod server;
pub mod session_routes;
pub mod state;

pub use config::HttpServerConfig;
pub use server::{HttpServer, ServerContext};
pub use state::{ADMIN_KEY_HEADER, API_KEY_HEADER};
