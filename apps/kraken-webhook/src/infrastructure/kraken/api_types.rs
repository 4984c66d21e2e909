//! Kraken REST API request/response types.

use serde::Deserialize;

use crate::domain::market::Market;

use super::error::KrakenError;

/// Envelope wrapping every Kraken REST response.
#[derive(Debug, Deserialize)]
pub struct KrakenResponse<T> {
    /// Error strings; empty on success.
    #[serde(default)]
    pub error: Vec<String>,
    /// Payload on success.
    pub result: Option<T>,
}

impl<T> KrakenResponse<T> {
    /// Unwrap the payload, classifying reported errors.
    pub fn into_result(self) -> Result<T, KrakenError> {
        if !self.error.is_empty() {
            return Err(KrakenError::from_api_errors(&self.error));
        }
        self.result
            .ok_or_else(|| KrakenError::JsonParse("response has no result".to_string()))
    }
}

/// One entry of `GET /0/public/AssetPairs`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetPair {
    /// Alternate pair name, e.g. `XBTUSD`.
    pub altname: String,
    /// WebSocket pair name, e.g. `XBT/USD`.
    #[serde(default)]
    pub wsname: Option<String>,
    /// Base asset id, e.g. `XXBT`.
    pub base: String,
    /// Quote asset id, e.g. `ZUSD`.
    pub quote: String,
    /// Decimal places allowed in the order volume.
    #[serde(default)]
    pub lot_decimals: Option<u32>,
}

impl AssetPair {
    /// Convert to a catalog market. Pairs without a `wsname` are not tradable
    /// through the unified symbol scheme and yield `None`.
    #[must_use]
    pub fn to_market(&self, id: &str) -> Option<Market> {
        let wsname = self.wsname.as_deref()?;
        let (base, quote) = wsname.split_once('/')?;
        let base = common_currency_code(base);
        let quote = common_currency_code(quote);

        Some(Market {
            symbol: format!("{base}/{quote}"),
            id: id.to_string(),
            base: base.to_string(),
            quote: quote.to_string(),
            amount_precision: self.lot_decimals,
        })
    }
}

/// Map Kraken's legacy currency codes to the common ones.
#[must_use]
pub fn common_currency_code(code: &str) -> &str {
    match code {
        "XBT" => "BTC",
        "XDG" => "DOGE",
        other => other,
    }
}

/// Result of `POST /0/private/AddOrder`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddOrderResult {
    /// Order description.
    #[serde(default)]
    pub descr: Option<OrderDescription>,
    /// Transaction ids of the placed order.
    #[serde(default)]
    pub txid: Vec<String>,
}

/// Order description echoed by `AddOrder`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDescription {
    /// e.g. `buy 1.25000000 XBTUSD @ market`.
    pub order: String,
}
