//! Prometheus Metrics
//!
//! Webhook outcome counters and order latency, rendered at `GET /metrics`.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Later calls return the existing handle.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();

    Ok(PROMETHEUS_HANDLE.get_or_init(|| handle).clone())
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

fn register_metrics() {
    describe_counter!(
        "kraken_webhook_requests_total",
        "Webhook requests by outcome"
    );
    describe_counter!(
        "kraken_webhook_orders_total",
        "Market orders accepted by the exchange, by side"
    );
    describe_histogram!(
        "kraken_webhook_order_duration_seconds",
        "Time from validated payload to exchange acknowledgement"
    );
}

/// How a webhook request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Order placed.
    Accepted,
    /// Secret header missing or wrong.
    Unauthorized,
    /// Payload failed validation.
    Invalid,
    /// Order client returned an error.
    Failed,
}

impl WebhookOutcome {
    /// Label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Unauthorized => "unauthorized",
            Self::Invalid => "invalid",
            Self::Failed => "failed",
        }
    }
}

/// Record the outcome of one webhook request.
pub fn record_webhook(outcome: WebhookOutcome) {
    counter!(
        "kraken_webhook_requests_total",
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record an accepted order.
pub fn record_order(side: &str) {
    counter!(
        "kraken_webhook_orders_total",
        "side" => side.to_string()
    )
    .increment(1);
}

/// Record how long order placement took.
pub fn record_order_duration(duration: Duration) {
    histogram!("kraken_webhook_order_duration_seconds").record(duration.as_secs_f64());
}
