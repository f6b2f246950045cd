//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the Axum router around the single dispatch handler
//! - Wire up middleware (timeout, request ID, tracing)
//! - Run the server with graceful shutdown
//!
//! # Design Decisions
//! - One catch-all handler; the route table, not Axum, decides dispatch
//! - The table and config are shared immutably through `AppState`
//! - Shutdown is cooperative: ctrl-c or the lifecycle broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::http::handler;
use crate::http::request::RequestIdLayer;
use crate::lifecycle;
use crate::routing::RouteTable;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub config: Arc<ServerConfig>,
}

/// HTTP server for the fragment router.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a server over an already-built route table.
    pub fn new(config: ServerConfig, table: RouteTable) -> Self {
        let state = AppState {
            table: Arc::new(table),
            config: Arc::new(config.clone()),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(handler::handle))
            .route("/", any(handler::handle))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(lifecycle::shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
