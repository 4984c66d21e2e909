//! Port Definitions
//!
//! Interfaces implemented by infrastructure adapters.

mod exchange_port;

#[cfg(test)]
pub use exchange_port::MockExchangePort;
pub use exchange_port::{ExchangeError, ExchangePort, MarketOrderRequest};
