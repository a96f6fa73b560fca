//! Server Implementation
//!
//! HTTP 服务器启动和管理

use axum::Router;
use axum::response::Html;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{Config, ServerState};
use crate::utils::{AppError, AppResult};

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (tests hand in a MemoryStore-backed
    /// state here)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Assemble the application router. Exposed so tests can drive it
    /// without binding a port.
    pub fn build_router(state: ServerState) -> Router {
        let max_connections = state.config.max_connections as usize;
        api::router()
            .fallback(landing)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(ConcurrencyLimitLayer::new(max_connections))
            .with_state(state)
    }

    pub async fn run(&self) -> AppResult<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config),
        };

        let app = Self::build_router(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("🪸 Coral Order Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("failed to bind {addr}: {e}")))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal(format!("server error: {e}")))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
}

/// Fallback: every non-API path serves the embedded landing page.
async fn landing() -> Html<&'static str> {
    Html(include_str!("../static/landing.html"))
}
