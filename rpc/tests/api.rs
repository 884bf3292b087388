//! HTTP API behaviour through the router, without binding a socket.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use cashscope_explorer::{Explorer, ExplorerConfig, ExplorerMetrics};
use cashscope_nullables::fixtures::{self, migration, p2pkh};
use cashscope_nullables::{NullFetcher, NullIndexer, TokenFixture};
use cashscope_rpc::{router, RpcState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app(metrics: Option<Arc<ExplorerMetrics>>) -> axum::Router {
    let token = fixtures::token_id(0x21);
    let indexer = NullIndexer::new().with_token(
        token,
        TokenFixture {
            genesis: Some(fixtures::genesis(token, 1_700_000_000, &[5_000])),
            authchain: Some(fixtures::authchain(
                vec![migration(token.genesis_tx(), Some(1_700_000_000), p2pkh(1), None)],
                0,
            )),
            ..Default::default()
        },
    );
    let mut explorer = Explorer::new(
        Arc::new(indexer),
        Arc::new(NullFetcher::new()),
        &ExplorerConfig::default(),
    );
    if let Some(metrics) = &metrics {
        explorer = explorer.with_metrics(metrics.clone());
    }
    router(Arc::new(RpcState {
        explorer: Arc::new(explorer),
        metrics,
    }))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn serves_a_token_report() {
    let token = fixtures::token_id(0x21);
    let (status, body) = get(app(None), &format!("/token/{}", token.to_hex())).await;
    assert_eq!(status, StatusCode::OK);

    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["overview"]["token_id"], token.to_hex());
    assert_eq!(report["overview"]["token_kind"], "fungible");
    assert_eq!(report["trust_verified"], false);
    assert_eq!(report["timeline"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() {
    let (status, body) = get(app(None), "/token/xyz").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "the input is not a valid token id");
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let unknown = fixtures::token_id(0x77);
    let (status, body) = get(app(None), &format!("/token/{}", unknown.to_hex())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "the input is not a valid token id");
    assert_eq!(error["status"], 404);
}

#[tokio::test]
async fn health_reports_network() {
    let (status, body) = get(app(None), "/health").await;
    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["network"], "mainnet");
}

#[tokio::test]
async fn metrics_only_when_enabled() {
    let (status, _) = get(app(None), "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let metrics = Arc::new(ExplorerMetrics::new());
    let app = app(Some(metrics));
    let token = fixtures::token_id(0x21);
    let (status, _) = get(app.clone(), &format!("/token/{}", token.to_hex())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("cashscope_lookups_started_total 1"));
}
