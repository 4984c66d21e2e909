//! Order record returned by the exchange.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::value_objects::{Amount, OrderSide, Symbol};

/// Acknowledgement of a placed order, passed through to the webhook caller.
///
/// `info` carries the exchange's raw response untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderResult {
    /// Primary exchange order id.
    pub id: String,
    /// Every transaction id the exchange assigned.
    pub txids: Vec<String>,
    /// Client order id sent with the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// Unified pair symbol.
    pub symbol: Symbol,
    /// Order type, always `market` here.
    #[serde(rename = "type")]
    pub order_type: String,
    /// Order side.
    pub side: OrderSide,
    /// Requested base-asset amount.
    pub amount: Amount,
    /// Status as acknowledged by the exchange.
    pub status: String,
    /// Time the acknowledgement was received.
    pub timestamp: DateTime<Utc>,
    /// Human-readable description from the exchange.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw exchange payload.
    pub info: serde_json::Value,
}
