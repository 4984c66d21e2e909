//! Exchange Port (Driven Port)
//!
//! Interface for a single, pre-authenticated exchange session.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::market::Market;
use crate::domain::order::{Amount, OrderResult, OrderSide, Symbol};

/// Market order submission, resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketOrderRequest {
    /// Exchange pair id.
    pub pair_id: String,
    /// Unified symbol the caller asked for.
    pub symbol: Symbol,
    /// Order side.
    pub side: OrderSide,
    /// Base-asset amount.
    pub amount: Amount,
    /// Decimal places the exchange accepts for this market's amounts.
    pub amount_precision: Option<u32>,
    /// Client order id attached to the exchange order.
    pub client_order_id: Uuid,
}

/// Exchange port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    /// Transport-level failure.
    #[error("Exchange connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Credentials, signature or nonce rejected.
    #[error("Exchange authentication failed: {message}")]
    AuthenticationFailed {
        /// Error details.
        message: String,
    },

    /// Not enough balance for the order.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Rate limited by the exchange.
    #[error("Rate limited by exchange")]
    RateLimited,

    /// Order rejected by the exchange.
    #[error("Order rejected: {reason}")]
    OrderRejected {
        /// Rejection reason.
        reason: String,
    },

    /// Response could not be understood.
    #[error("Invalid exchange response: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },

    /// The session has no sandbox environment.
    #[error("Sandbox mode is not supported by {exchange}")]
    SandboxUnsupported {
        /// Exchange name.
        exchange: String,
    },

    /// Anything else.
    #[error("Exchange error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

/// Port for exchange interactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangePort: Send + Sync {
    /// Short exchange name for logs.
    fn name(&self) -> &'static str;

    /// Whether this session can switch to a sandbox environment.
    fn supports_sandbox(&self) -> bool;

    /// Switch the session to or from the sandbox environment.
    fn set_sandbox_mode(&mut self, enabled: bool) -> Result<(), ExchangeError>;

    /// Fetch every tradable market.
    async fn load_markets(&self) -> Result<Vec<Market>, ExchangeError>;

    /// Submit a market order and return the exchange's acknowledgement.
    async fn create_market_order(
        &self,
        request: MarketOrderRequest,
    ) -> Result<OrderResult, ExchangeError>;
}
