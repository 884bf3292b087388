//! Axum-based HTTP server.

use crate::error::RpcError;
use crate::handlers;
use axum::routing::get;
use axum::Router;
use cashscope_explorer::{Explorer, ExplorerMetrics};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Shared handler state.
pub struct RpcState {
    pub explorer: Arc<Explorer>,
    /// `None` disables `/metrics`.
    pub metrics: Option<Arc<ExplorerMetrics>>,
}

/// All routes, with permissive CORS so browser front-ends can call them.
pub fn router(state: Arc<RpcState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/token/:id", get(handlers::get_token))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(cors)
        .with_state(state)
}

pub struct RpcServer {
    pub bind: String,
    pub port: u16,
    state: Arc<RpcState>,
}

impl RpcServer {
    pub fn new(bind: impl Into<String>, port: u16, state: RpcState) -> Self {
        Self {
            bind: bind.into(),
            port,
            state: Arc::new(state),
        }
    }

    fn addr(&self) -> Result<SocketAddr, RpcError> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| RpcError::Server(format!("invalid bind address: {e}")))
    }

    /// Serve until `shutdown` resolves.
    pub async fn start<F>(&self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {addr}: {e}")))?;
        tracing::info!(%addr, "HTTP API listening");

        axum::serve(listener, router(self.state.clone()))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
