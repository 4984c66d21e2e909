//! HTTP response DTOs.

use serde::Serialize;

use crate::domain::order::OrderResult;

/// Body of a 200 response to the webhook.
#[derive(Debug, Clone, Serialize)]
pub struct OrderAcceptedResponse {
    /// Always `ok`.
    pub status: &'static str,
    /// Order record from the exchange.
    pub order: OrderResult,
}

impl OrderAcceptedResponse {
    /// Wrap an order record.
    #[must_use]
    pub const fn new(order: OrderResult) -> Self {
        Self {
            status: "ok",
            order,
        }
    }
}

/// Body of a 400 or 500 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Message shown to the caller.
    pub error: String,
}

impl ErrorResponse {
    /// Generic message for any order placement failure.
    pub const ORDER_FAILED: &'static str = "Order failed";

    /// Create an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Number of markets in the catalog.
    pub markets: usize,
    /// Whether orders go to the sandbox environment.
    pub sandbox: bool,
}
