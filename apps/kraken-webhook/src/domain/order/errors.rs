//! Order domain errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Invariant violations on order value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderDomainError {
    /// Side is neither `buy` nor `sell`.
    #[error("invalid side '{0}', expected 'buy' or 'sell'")]
    InvalidSide(String),

    /// Symbol is empty or whitespace-only.
    #[error("symbol must not be empty")]
    EmptySymbol,

    /// Amount is zero or negative.
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
}
