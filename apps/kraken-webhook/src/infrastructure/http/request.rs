//! Webhook payload validation.
//!
//! The payload is handled as raw JSON rather than a derived DTO so that each
//! failure maps to its own message, checked in a fixed order.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;

/// Fields every payload must carry, in the order they are checked.
const REQUIRED_FIELDS: [&str; 3] = ["side", "symbol", "amount"];

/// A payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookOrder {
    /// `buy` or `sell`.
    pub side: String,
    /// Symbol as supplied, uppercased.
    pub symbol: String,
    /// Base-asset amount, strictly positive.
    pub amount: WebhookAmount,
}

/// A validated amount: its float value and the numeric text it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookAmount {
    value: f64,
    text: String,
}

impl WebhookAmount {
    /// Float value used for validation.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Numeric text as received, without padding or digit separators.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Exact decimal form of the amount.
    ///
    /// `None` for values `Decimal` cannot hold: non-finite values, magnitudes
    /// beyond its range and scales finer than 28 places.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        Decimal::from_str(&self.text)
            .or_else(|_| Decimal::from_scientific(&self.text))
            .ok()
    }
}

/// Why a payload was rejected. The `Display` text is returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// A required field is absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Side is not exactly `buy` or `sell`.
    #[error("Invalid side. Must be 'buy' or 'sell'.")]
    InvalidSide,

    /// Symbol is not a string or is blank.
    #[error("Symbol must be a non-empty string.")]
    InvalidSymbol,

    /// Amount does not parse as a number.
    #[error("Amount must be a valid number.")]
    InvalidAmount,

    /// Amount is zero or negative.
    #[error("Amount must be greater than zero.")]
    NonPositiveAmount,
}

/// Whether a `Content-Type` value names JSON: `application/json` or an
/// `application/*+json` subtype. Parameters such as `charset` are ignored.
#[must_use]
pub fn is_json_content_type(content_type: &str) -> bool {
    let mimetype = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mimetype == "application/json"
        || (mimetype.starts_with("application/") && mimetype.ends_with("+json"))
}

/// Decode a request body.
///
/// Bodies sent without a JSON content type, and anything that is not a JSON
/// object, count as `{}`.
#[must_use]
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Map<String, Value> {
    if !content_type.is_some_and(is_json_content_type) {
        return Map::new();
    }

    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Validate a webhook payload, returning the first failure.
pub fn validate_payload(payload: &Map<String, Value>) -> Result<WebhookOrder, PayloadError> {
    for field in REQUIRED_FIELDS {
        if !payload.contains_key(field) {
            return Err(PayloadError::MissingField(field));
        }
    }

    let side = match &payload["side"] {
        Value::String(side) if side == "buy" || side == "sell" => side.clone(),
        _ => return Err(PayloadError::InvalidSide),
    };

    let symbol = match &payload["symbol"] {
        Value::String(symbol) if !symbol.trim().is_empty() => symbol.to_uppercase(),
        _ => return Err(PayloadError::InvalidSymbol),
    };

    let amount = parse_amount(&payload["amount"]).ok_or(PayloadError::InvalidAmount)?;
    // NaN compares false here and is caught when the amount becomes a decimal.
    if amount.value <= 0.0 {
        return Err(PayloadError::NonPositiveAmount);
    }

    Ok(WebhookOrder {
        side,
        symbol,
        amount,
    })
}

/// JSON numbers and numeric strings are accepted, with the same grammar as a
/// float literal: optional sign, decimal or scientific notation, `inf`, `nan`,
/// and `_` between digits.
fn parse_amount(value: &Value) -> Option<WebhookAmount> {
    match value {
        Value::Number(number) => Some(WebhookAmount {
            value: number.as_f64()?,
            text: number.to_string(),
        }),
        Value::String(text) => {
            let text = strip_digit_separators(text.trim())?;
            let value = f64::from_str(&text).ok()?;
            Some(WebhookAmount { value, text })
        }
        _ => None,
    }
}

/// Remove `_` separators, which are only allowed between two digits.
fn strip_digit_separators(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    for (i, byte) in bytes.iter().enumerate() {
        if *byte != b'_' {
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| bytes.get(j)).copied();
        let after = bytes.get(i + 1).copied();
        let between_digits =
            before.is_some_and(|b| b.is_ascii_digit()) && after.is_some_and(|b| b.is_ascii_digit());
        if !between_digits {
            return None;
        }
    }
    Some(text.replace('_', ""))
}
