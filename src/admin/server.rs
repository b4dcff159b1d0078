//! Admin server implementation
//!
//! Wires the content store into an axum router with optional CORS and
//! request tracing, a metrics middleware, and graceful shutdown.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::api::create_router;
use crate::config::{AdminConfig, Config};
use crate::storage::SharedStore;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to bind to address
    #[error("Failed to bind: {0}")]
    Bind(String),

    /// Server error while serving
    #[error("Server error: {0}")]
    Serve(String),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Content store
    pub store: SharedStore,

    /// List-view settings (page sizes)
    pub admin: AdminConfig,

    /// Server start time
    pub start_time: Instant,
}

/// Main admin server
pub struct AdminServer {
    config: Config,
    state: AppState,
}

impl std::fmt::Debug for AdminServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminServer").finish_non_exhaustive()
    }
}

impl AdminServer {
    /// Create a new admin server over an opened store
    pub fn new(config: Config, store: SharedStore) -> Result<Self, ServerError> {
        config
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let state = AppState {
            store,
            admin: config.admin.clone(),
            start_time: Instant::now(),
        };

        Ok(Self { config, state })
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes and configured layers
    pub fn build_router(&self) -> Router {
        // route_layer so MatchedPath is populated when metrics are recorded
        let mut router =
            create_router(self.state.clone()).route_layer(middleware::from_fn(track_metrics));

        if self.config.server.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.server.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server
    pub async fn start(&self) -> Result<(), ServerError> {
        let addr = self.bind_address()?;
        let listener = self.bind(addr).await?;

        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        Ok(())
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let addr = self.bind_address()?;
        let listener = self.bind(addr).await?;

        axum::serve(listener, self.build_router())
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("admin server shutdown complete");
        Ok(())
    }

    fn bind_address(&self) -> Result<SocketAddr, ServerError> {
        self.config
            .bind_address()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    async fn bind(&self, addr: SocketAddr) -> Result<tokio::net::TcpListener, ServerError> {
        tracing::info!("starting admin server on {}", addr);
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))
    }

    /// Get server info
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            host: self.config.server.host.clone(),
            port: self.config.server.port,
            database: self.config.database.path.display().to_string(),
            page_size: self.config.admin.page_size,
            cors_enabled: self.config.server.enable_cors,
            request_logging_enabled: self.config.server.enable_request_logging,
        }
    }
}

/// Record route/status/duration for every request
async fn track_metrics(req: Request, next: Next) -> Response {
    // Matched route template keeps label cardinality bounded
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let start = Instant::now();
    let response = next.run(req).await;

    crate::metrics::record_http_request(
        &route,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

/// Server information for startup banners
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub page_size: u32,
    pub cors_enabled: bool,
    pub request_logging_enabled: bool,
}

impl ServerInfo {
    /// Format as display string
    pub fn display(&self) -> String {
        format!(
            "Admin Server\n\
             {:-<40}\n\
             Bind Address: {}:{}\n\
             Database: {}\n\
             Page Size: {}\n\
             CORS: {}\n\
             Request Logging: {}",
            "",
            self.host,
            self.port,
            self.database,
            self.page_size,
            if self.cors_enabled { "enabled" } else { "disabled" },
            if self.request_logging_enabled {
                "enabled"
            } else {
                "disabled"
            }
        )
    }
}

/// Build a standalone router over an in-memory-style state (test harnesses)
pub fn router_with_state(store: SharedStore, admin: AdminConfig) -> Router {
    let state = AppState {
        store,
        admin,
        start_time: Instant::now(),
    };
    create_router(state).route_layer(middleware::from_fn(track_metrics))
}
