//! Request handlers.

use crate::error::RpcError;
use crate::server::RpcState;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use cashscope_explorer::TokenReport;
use cashscope_types::Network;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub network: Network,
    /// Whether the trust registry has been downloaded yet.
    pub trust_registry_loaded: bool,
}

pub async fn get_token(
    State(state): State<Arc<RpcState>>,
    Path(id): Path<String>,
) -> Result<Json<TokenReport>, RpcError> {
    let report = state.explorer.lookup_input(&id).await?;
    Ok(Json(report))
}

pub async fn health(State(state): State<Arc<RpcState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        network: state.explorer.network(),
        trust_registry_loaded: state.explorer.trust_cache().is_loaded(),
    })
}

pub async fn metrics(State(state): State<Arc<RpcState>>) -> Result<impl IntoResponse, RpcError> {
    let metrics = state.metrics.as_ref().ok_or(RpcError::MetricsDisabled)?;
    let text = metrics
        .encode()
        .map_err(|e| RpcError::Server(e.to_string()))?;
    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], text))
}
