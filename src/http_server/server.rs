//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use super::config::HttpServerConfig;
use super::dynamic_routes::dynamic_routes;
use super::observability_routes::observability_routes;
use super::registration_routes::registration_routes;
use super::session_routes::{session_routes, SessionState};
use super::state::GatewayState;
use crate::gateway::Gateway;
use crate::observability::{log_event_with_fields, Event};
use crate::session::SessionStore;

/// Everything the routers share
#[derive(Clone)]
pub struct ServerContext {
    pub gateway: Arc<Gateway>,
    pub sessions: Arc<SessionStore>,
    pub admin_key: Option<String>,
}

/// HTTP server for the gateway
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, context: ServerContext) -> Self {
        let router = Self::build_router(&config, context);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, context: ServerContext) -> Router {
        let metrics = Arc::clone(context.gateway.metrics());
        let gateway_state = Arc::new(GatewayState::new(context.gateway, context.admin_key));
        let session_state = Arc::new(SessionState::new(context.sessions));

        Router::new()
            .merge(observability_routes(metrics))
            .merge(registration_routes(Arc::clone(&gateway_state)))
            .merge(dynamic_routes(gateway_state))
            .merge(session_routes(session_state))
            .layer(config.cors_layer())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;

        log_event_with_fields(Event::Serving, &[("addr", addr.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    // An error here means no handler could be installed; keep serving.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
