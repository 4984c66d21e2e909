//! Metrics Endpoint Tests
//!
//! Installs the process-wide Prometheus recorder, so these checks live in
//! their own test binary and run as a single test.

// Allow unwrap in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kraken_webhook::infrastructure::config::Credentials;
use kraken_webhook::{
    AppState, KrakenConfig, KrakenExchangeAdapter, OrderClient, SessionSettings, WebhookSecret,
    create_router, init_metrics,
};

const SECRET: &str = "metrics-secret";

async fn kraken() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/0/public/AssetPairs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": [],
            "result": {
                "XXBTZUSD": {
                    "altname": "XBTUSD",
                    "wsname": "XBT/USD",
                    "base": "XXBT",
                    "quote": "ZUSD",
                    "lot_decimals": 8
                }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/0/private/AddOrder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": [],
            "result": {
                "descr": {"order": "sell 0.50000000 XBTUSD @ market"},
                "txid": ["OTCJRA-SZQTC-QRRG4T"]
            }
        })))
        .mount(&server)
        .await;
    server
}

async fn app(server: &MockServer) -> Router {
    let config = KrakenConfig::new(Credentials::new(
        "metrics-key".to_string(),
        "c2VjcmV0LWtleS1ieXRlcw==".to_string(),
    ))
    .with_api_url(server.uri())
    .with_rate_limit(Duration::ZERO);

    let adapter = KrakenExchangeAdapter::new(&config).unwrap();
    let client = OrderClient::connect(adapter, SessionSettings::default())
        .await
        .unwrap();

    create_router(AppState::new(Arc::new(client), WebhookSecret::new(SECRET)))
}

fn webhook(body: &str, secret: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/kraken-webhook")
        .header("content-type", "application/json")
        .header("X-Webhook-Secret", secret)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn scrape() -> Request<Body> {
    Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn metrics_count_webhook_outcomes() {
    let server = kraken().await;
    let app = app(&server).await;

    let (status, _) = send(&app, scrape()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    init_metrics().unwrap();
    assert!(init_metrics().is_ok());

    let (status, _) = send(
        &app,
        webhook(r#"{"side": "sell", "symbol": "BTC/USD", "amount": 0.5}"#, SECRET),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        webhook(r#"{"side": "hold", "symbol": "BTC/USD", "amount": 1}"#, SECRET),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, webhook("{}", "wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        webhook(r#"{"side": "buy", "symbol": "DOGE/JPY", "amount": 1}"#, SECRET),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, metrics) = send(&app, scrape()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(metrics.contains(r#"kraken_webhook_requests_total{outcome="accepted"} 1"#));
    assert!(metrics.contains(r#"kraken_webhook_requests_total{outcome="invalid"} 1"#));
    assert!(metrics.contains(r#"kraken_webhook_requests_total{outcome="unauthorized"} 1"#));
    assert!(metrics.contains(r#"kraken_webhook_requests_total{outcome="failed"} 1"#));
    assert!(metrics.contains(r#"kraken_webhook_orders_total{side="sell"} 1"#));
    assert!(metrics.contains("kraken_webhook_order_duration_seconds"));
}
