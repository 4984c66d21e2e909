//! Kraken Spot Exchange Adapter
//!
//! Implementation of `ExchangePort` for the Kraken REST API with:
//! - HMAC-SHA512 request signing and monotonic nonces
//! - Request pacing in place of an SDK rate limiter
//! - `AssetPairs` market loading with unified `BASE/QUOTE` symbols
//! - Market orders through `AddOrder`

mod adapter;
mod api_types;
mod auth;
mod config;
mod error;
mod http_client;

pub use adapter::KrakenExchangeAdapter;
pub use auth::{NonceGenerator, sign_request};
pub use config::KrakenConfig;
pub use error::KrakenError;
