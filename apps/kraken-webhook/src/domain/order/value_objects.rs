//! Order value objects.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use super::errors::OrderDomainError;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy the base asset.
    Buy,
    /// Sell the base asset.
    Sell,
}

impl OrderSide {
    /// Wire name used by the exchange API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl FromStr for OrderSide {
    type Err = OrderDomainError;

    /// Parses an exact, lowercase side name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(OrderDomainError::InvalidSide(other.to_string())),
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified trading pair symbol, e.g. `BTC/USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol, upper-casing the input.
    ///
    /// Surrounding whitespace is kept; only an all-whitespace symbol is rejected.
    pub fn new(raw: &str) -> Result<Self, OrderDomainError> {
        if raw.trim().is_empty() {
            return Err(OrderDomainError::EmptySymbol);
        }
        Ok(Self(raw.to_uppercase()))
    }

    /// Get the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order amount in base-asset units. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    /// Create an amount, rejecting zero and negative values.
    pub fn new(value: Decimal) -> Result<Self, OrderDomainError> {
        if value <= Decimal::ZERO {
            return Err(OrderDomainError::NonPositiveAmount(value));
        }
        Ok(Self(value))
    }

    /// Get the underlying decimal.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// A validated market order instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Order side.
    pub side: OrderSide,
    /// Unified pair symbol.
    pub symbol: Symbol,
    /// Base-asset amount.
    pub amount: Amount,
}

impl OrderRequest {
    /// Build an order request from raw parts, enforcing every invariant.
    pub fn parse(side: &str, symbol: &str, amount: Decimal) -> Result<Self, OrderDomainError> {
        Ok(Self {
            side: side.parse()?,
            symbol: Symbol::new(symbol)?,
            amount: Amount::new(amount)?,
        })
    }
}
