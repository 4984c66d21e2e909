//! Order Client
//!
//! Wraps one exchange session that is authenticated, optionally switched to
//! sandbox, and has its market catalog loaded before the first order.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::{ExchangeError, ExchangePort, MarketOrderRequest};
use crate::domain::market::MarketCatalog;
use crate::domain::order::{OrderDomainError, OrderRequest, OrderResult};

/// Session options applied once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSettings {
    /// Request the exchange's sandbox environment.
    pub sandbox: bool,
}

/// Errors from order placement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Side, symbol or amount rejected before reaching the exchange.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The exchange failed or rejected the order.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

impl From<OrderDomainError> for OrderError {
    fn from(err: OrderDomainError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Places market orders against a single exchange session.
#[derive(Debug)]
pub struct OrderClient<E> {
    exchange: E,
    catalog: MarketCatalog,
    sandbox: bool,
}

impl<E: ExchangePort> OrderClient<E> {
    /// Establish the session: apply sandbox mode when supported, then load markets.
    ///
    /// An exchange without sandbox support keeps running live; this is logged,
    /// not returned as an error.
    pub async fn connect(mut exchange: E, settings: SessionSettings) -> Result<Self, ExchangeError> {
        let mut sandbox = false;

        if settings.sandbox {
            if exchange.supports_sandbox() {
                exchange.set_sandbox_mode(true)?;
                sandbox = true;
                tracing::info!(exchange = exchange.name(), "Sandbox mode enabled");
            } else {
                tracing::warn!(
                    exchange = exchange.name(),
                    "Sandbox mode requested but not supported, continuing in LIVE mode"
                );
            }
        }

        let markets = exchange.load_markets().await?;
        let catalog = MarketCatalog::new(markets);

        tracing::info!(
            exchange = exchange.name(),
            markets = catalog.len(),
            sandbox,
            "Markets loaded"
        );
        tracing::debug!(symbols = ?catalog.symbols(), "Supported symbols");

        Ok(Self {
            exchange,
            catalog,
            sandbox,
        })
    }

    /// Create a client over an already prepared catalog.
    pub const fn with_catalog(exchange: E, catalog: MarketCatalog, sandbox: bool) -> Self {
        Self {
            exchange,
            catalog,
            sandbox,
        }
    }

    /// Place a market order for `amount` base units of `symbol`.
    ///
    /// `side` must be exactly `buy` or `sell` and `symbol` must be in the
    /// catalog; neither check reaches the exchange when it fails.
    pub async fn place_order(
        &self,
        side: &str,
        symbol: &str,
        amount: Decimal,
    ) -> Result<OrderResult, OrderError> {
        let order = OrderRequest::parse(side, symbol, amount)?;

        let market = self.catalog.get(order.symbol.as_str()).ok_or_else(|| {
            OrderError::InvalidArgument(format!(
                "Symbol not supported on {}: {}",
                self.exchange.name(),
                order.symbol
            ))
        })?;

        let request = MarketOrderRequest {
            pair_id: market.id.clone(),
            symbol: order.symbol,
            side: order.side,
            amount: order.amount,
            amount_precision: market.amount_precision,
            client_order_id: Uuid::new_v4(),
        };

        tracing::info!(
            exchange = self.exchange.name(),
            client_order_id = %request.client_order_id,
            symbol = %request.symbol,
            pair = %request.pair_id,
            side = %request.side,
            amount = %request.amount,
            sandbox = self.sandbox,
            "Submitting market order"
        );

        let result = self.exchange.create_market_order(request).await?;

        tracing::info!(
            order_id = %result.id,
            symbol = %result.symbol,
            status = %result.status,
            "Market order accepted"
        );

        Ok(result)
    }

    /// Markets loaded at startup.
    pub const fn catalog(&self) -> &MarketCatalog {
        &self.catalog
    }

    /// Whether the session runs against the sandbox environment.
    pub const fn is_sandbox(&self) -> bool {
        self.sandbox
    }
}
