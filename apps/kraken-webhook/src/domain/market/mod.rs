//! Market Catalog
//!
//! The set of trading pairs the exchange supports, loaded once at startup and
//! used only for membership checks and pair-id lookup.

use std::collections::HashMap;

use serde::Serialize;

/// A tradable pair as known to the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Market {
    /// Unified symbol, e.g. `BTC/USD`.
    pub symbol: String,
    /// Exchange pair id used when placing orders, e.g. `XXBTZUSD`.
    pub id: String,
    /// Unified base currency code.
    pub base: String,
    /// Unified quote currency code.
    pub quote: String,
    /// Decimal places allowed in an order amount; `None` when the exchange
    /// does not say.
    pub amount_precision: Option<u32>,
}

/// Read-only catalog of supported markets keyed by unified symbol.
#[derive(Debug, Clone, Default)]
pub struct MarketCatalog {
    markets: HashMap<String, Market>,
}

impl MarketCatalog {
    /// Build a catalog. Later duplicates of a symbol are ignored.
    #[must_use]
    pub fn new(markets: impl IntoIterator<Item = Market>) -> Self {
        let mut by_symbol = HashMap::new();
        for market in markets {
            by_symbol.entry(market.symbol.clone()).or_insert(market);
        }
        Self {
            markets: by_symbol,
        }
    }

    /// Look up a market by unified symbol.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&Market> {
        self.markets.get(symbol)
    }

    /// Number of markets loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Whether no markets were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Sorted list of supported symbols.
    #[must_use]
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.markets.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }
}
