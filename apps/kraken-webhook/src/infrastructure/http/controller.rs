//! HTTP Controller (Driver Adapter)
//!
//! Axum router for the webhook endpoint. Authentication and validation happen
//! here; everything past validation is delegated to the Order Client.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::application::ports::ExchangePort;
use crate::application::services::OrderClient;
use crate::infrastructure::config::WebhookSecret;
use crate::infrastructure::metrics::{
    WebhookOutcome, get_metrics_handle, record_order, record_order_duration, record_webhook,
};

use super::request::{parse_body, validate_payload};
use super::response::{ErrorResponse, HealthResponse, OrderAcceptedResponse};

/// Header carrying the shared webhook secret.
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Application state shared across handlers.
pub struct AppState<E: ExchangePort> {
    /// Order client bound to the exchange session.
    pub order_client: Arc<OrderClient<E>>,
    /// Expected webhook secret; `None` disables the header check.
    pub webhook_secret: Option<WebhookSecret>,
    /// Application version.
    pub version: String,
}

impl<E: ExchangePort> AppState<E> {
    /// Create state with the crate version.
    pub fn new(order_client: Arc<OrderClient<E>>, webhook_secret: Option<WebhookSecret>) -> Self {
        Self {
            order_client,
            webhook_secret,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl<E: ExchangePort> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            order_client: Arc::clone(&self.order_client),
            webhook_secret: self.webhook_secret.clone(),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<E>(state: AppState<E>) -> Router
where
    E: ExchangePort + 'static,
{
    Router::new()
        .route("/kraken-webhook", post(kraken_webhook::<E>))
        .route("/health", get(health_check::<E>))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Webhook endpoint. Each request runs in its own span tagged with a request id.
async fn kraken_webhook<E: ExchangePort + 'static>(
    State(state): State<AppState<E>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let span = tracing::info_span!("kraken_webhook", request_id = %Uuid::new_v4());
    handle_webhook(state, headers, body).instrument(span).await
}

async fn handle_webhook<E: ExchangePort>(
    state: AppState<E>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = &state.webhook_secret {
        let presented = headers
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|value| value.to_str().ok());
        if !secret.matches(presented) {
            tracing::warn!("Rejected webhook with missing or wrong secret");
            record_webhook(WebhookOutcome::Unauthorized);
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let payload = parse_body(content_type, &body);
    let order = match validate_payload(&payload) {
        Ok(order) => order,
        Err(e) => {
            tracing::info!(reason = %e, "Rejected invalid webhook payload");
            record_webhook(WebhookOutcome::Invalid);
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string())))
                .into_response();
        }
    };

    let Some(amount) = order.amount.to_decimal() else {
        tracing::error!(
            side = %order.side,
            symbol = %order.symbol,
            amount = order.amount.as_str(),
            "Order failed: amount has no exact decimal form"
        );
        record_webhook(WebhookOutcome::Failed);
        return order_failed();
    };

    let started = Instant::now();
    let result = state
        .order_client
        .place_order(&order.side, &order.symbol, amount)
        .await;
    record_order_duration(started.elapsed());

    match result {
        Ok(placed) => {
            record_webhook(WebhookOutcome::Accepted);
            record_order(&order.side);
            (StatusCode::OK, Json(OrderAcceptedResponse::new(placed))).into_response()
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                side = %order.side,
                symbol = %order.symbol,
                amount = %amount,
                "Order failed"
            );
            record_webhook(WebhookOutcome::Failed);
            order_failed()
        }
    }
}

fn order_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(ErrorResponse::ORDER_FAILED)),
    )
        .into_response()
}

/// Health check endpoint.
async fn health_check<E: ExchangePort>(State(state): State<AppState<E>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        markets: state.order_client.catalog().len(),
        sandbox: state.order_client.is_sandbox(),
    })
}

async fn metrics_handler() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                handle.render(),
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ExchangeError, MarketOrderRequest, MockExchangePort};
    use crate::domain::market::{Market, MarketCatalog};
    use crate::domain::order::{OrderResult, OrderSide};
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};
    use test_case::test_case;
    use tower::ServiceExt;

    const SECRET: &str = "hook-secret";

    fn btc_usd() -> Market {
        Market {
            symbol: "BTC/USD".to_string(),
            id: "XXBTZUSD".to_string(),
            base: "BTC".to_string(),
            quote: "USD".to_string(),
            amount_precision: Some(8),
        }
    }

    fn ack(request: &MarketOrderRequest) -> OrderResult {
        OrderResult {
            id: "OQCLML-BW3P3-BUCMWZ".to_string(),
            txids: vec!["OQCLML-BW3P3-BUCMWZ".to_string()],
            client_order_id: Some(request.client_order_id.to_string()),
            symbol: request.symbol.clone(),
            order_type: "market".to_string(),
            side: request.side,
            amount: request.amount,
            status: "open".to_string(),
            timestamp: Utc::now(),
            description: Some("buy 0.00100000 XBTUSD @ market".to_string()),
            info: json!({"txid": ["OQCLML-BW3P3-BUCMWZ"]}),
        }
    }

    fn mock_exchange() -> MockExchangePort {
        let mut exchange = MockExchangePort::new();
        exchange.expect_name().return_const("kraken");
        exchange
    }

    fn app(exchange: MockExchangePort, secret: Option<&str>) -> Router {
        let client = OrderClient::with_catalog(exchange, MarketCatalog::new([btc_usd()]), true);
        create_router(AppState::new(
            Arc::new(client),
            secret.and_then(WebhookSecret::new),
        ))
    }

    fn webhook(body: &str, secret: Option<&str>) -> Request<Body> {
        post_webhook(body, Some("application/json"), secret)
    }

    fn post_webhook(body: &str, content_type: Option<&str>, secret: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/kraken-webhook");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        if let Some(secret) = secret {
            builder = builder.header("X-Webhook-Secret", secret);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn json_body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn places_order_with_uppercased_symbol() {
        let mut exchange = mock_exchange();
        exchange
            .expect_create_market_order()
            .withf(|request| {
                request.symbol.as_str() == "BTC/USD"
                    && request.side == OrderSide::Buy
                    && request.amount.value() == dec!(0.001)
            })
            .times(1)
            .returning(|request| Ok(ack(&request)));

        let (status, body) = send(
            app(exchange, Some(SECRET)),
            webhook(
                r#"{"side": "buy", "symbol": "btc/usd", "amount": 0.001}"#,
                Some(SECRET),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["order"]["id"], "OQCLML-BW3P3-BUCMWZ");
        assert_eq!(body["order"]["symbol"], "BTC/USD");
        assert_eq!(body["order"]["side"], "buy");
        assert_eq!(body["order"]["type"], "market");
        assert_eq!(body["order"]["amount"], 0.001);
    }

    #[tokio::test]
    async fn invalid_side_is_rejected() {
        let mut exchange = mock_exchange();
        exchange.expect_create_market_order().never();

        let (status, body) = send(
            app(exchange, None),
            webhook(r#"{"side": "hold", "symbol": "BTC/USD", "amount": 1}"#, None),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(&body),
            json!({"error": "Invalid side. Must be 'buy' or 'sell'."})
        );
    }

    #[test_case(r#"{"symbol": "BTC/USD", "amount": 1}"#, "Missing field: side" ; "missing side")]
    #[test_case(r#"{"side": "buy", "amount": 1}"#, "Missing field: symbol" ; "missing symbol")]
    #[test_case(r#"{"side": "buy", "symbol": "BTC/USD"}"#, "Missing field: amount" ; "missing amount")]
    #[test_case(r#"{"side": "buy", "symbol": "  ", "amount": 1}"#, "Symbol must be a non-empty string." ; "blank symbol")]
    #[test_case(r#"{"side": "buy", "symbol": "BTC/USD", "amount": "lots"}"#, "Amount must be a valid number." ; "text amount")]
    #[test_case(r#"{"side": "sell", "symbol": "BTC/USD", "amount": 0}"#, "Amount must be greater than zero." ; "zero amount")]
    #[test_case(r#"{"side": "sell", "symbol": "BTC/USD", "amount": -2}"#, "Amount must be greater than zero." ; "negative amount")]
    #[test_case("not json", "Missing field: side" ; "unparseable body")]
    #[tokio::test]
    async fn validation_failures(body: &str, message: &str) {
        let mut exchange = mock_exchange();
        exchange.expect_create_market_order().never();

        let (status, response) = send(app(exchange, None), webhook(body, None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&response), json!({"error": message}));
    }

    #[test_case(Some("text/plain") ; "plain text")]
    #[test_case(Some("application/x-www-form-urlencoded") ; "form encoded")]
    #[test_case(None ; "no content type")]
    #[tokio::test]
    async fn non_json_bodies_count_as_empty(content_type: Option<&str>) {
        let mut exchange = mock_exchange();
        exchange.expect_create_market_order().never();

        let (status, body) = send(
            app(exchange, None),
            post_webhook(
                r#"{"side": "buy", "symbol": "BTC/USD", "amount": 1}"#,
                content_type,
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body), json!({"error": "Missing field: side"}));
    }

    #[tokio::test]
    async fn json_content_type_with_charset_is_accepted() {
        let mut exchange = mock_exchange();
        exchange
            .expect_create_market_order()
            .times(1)
            .returning(|request| Ok(ack(&request)));

        let (status, _) = send(
            app(exchange, None),
            post_webhook(
                r#"{"side": "buy", "symbol": "BTC/USD", "amount": 1}"#,
                Some("application/json; charset=utf-8"),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[test_case("1e-30" ; "below decimal scale")]
    #[test_case("1e-29" ; "just below decimal scale")]
    #[test_case("1e300" ; "beyond decimal range")]
    #[test_case(r#""Infinity""# ; "infinity string")]
    #[tokio::test]
    async fn amounts_without_decimal_form_fail_the_order(amount: &str) {
        let mut exchange = mock_exchange();
        exchange.expect_create_market_order().never();

        let body = format!(r#"{{"side": "buy", "symbol": "BTC/USD", "amount": {amount}}}"#);
        let (status, response) = send(app(exchange, None), webhook(&body, None)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(&response), json!({"error": "Order failed"}));
    }

    #[test_case(None ; "header absent")]
    #[test_case(Some("wrong") ; "header mismatched")]
    #[test_case(Some("") ; "header empty")]
    #[tokio::test]
    async fn unauthorized_without_matching_secret(presented: Option<&str>) {
        let mut exchange = mock_exchange();
        exchange.expect_create_market_order().never();

        let (status, body) = send(
            app(exchange, Some(SECRET)),
            webhook(r#"{"side": "buy", "symbol": "BTC/USD", "amount": 1}"#, presented),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_even_for_invalid_payload() {
        let (status, body) = send(
            app(mock_exchange(), Some(SECRET)),
            webhook("{}", Some("wrong")),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn no_secret_configured_skips_auth() {
        let mut exchange = mock_exchange();
        exchange
            .expect_create_market_order()
            .times(1)
            .returning(|request| Ok(ack(&request)));

        let (status, _) = send(
            app(exchange, None),
            webhook(
                r#"{"side": "buy", "symbol": "BTC/USD", "amount": 1}"#,
                Some("anything"),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn exchange_failure_is_generic_500() {
        let mut exchange = mock_exchange();
        exchange
            .expect_create_market_order()
            .returning(|_| Err(ExchangeError::InsufficientFunds));

        let (status, body) = send(
            app(exchange, Some(SECRET)),
            webhook(
                r#"{"side": "buy", "symbol": "BTC/USD", "amount": 5}"#,
                Some(SECRET),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(&body), json!({"error": "Order failed"}));
    }

    #[tokio::test]
    async fn unsupported_symbol_is_generic_500() {
        let mut exchange = mock_exchange();
        exchange.expect_create_market_order().never();

        let (status, body) = send(
            app(exchange, None),
            webhook(r#"{"side": "sell", "symbol": "doge/jpy", "amount": 5}"#, None),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(&body), json!({"error": "Order failed"}));
    }

    #[tokio::test]
    async fn health_reports_catalog_and_mode() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app(mock_exchange(), Some(SECRET)), request).await;

        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["markets"], 1);
        assert_eq!(body["sandbox"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn metrics_unavailable_without_recorder() {
        let request = Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app(mock_exchange(), None), request).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, b"Metrics not initialized");
    }

    #[tokio::test]
    async fn webhook_rejects_get() {
        let request = Request::builder()
            .uri("/kraken-webhook")
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(app(mock_exchange(), None), request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
