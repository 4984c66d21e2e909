// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Kraken Webhook Bridge
//!
//! Receives `buy`/`sell` webhook notifications, validates them and forwards
//! them as market orders to the Kraken spot REST API.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: order value objects and the market catalog
//!   - `order`: `OrderSide`, `Symbol`, `Amount`, `OrderResult`
//!   - `market`: `Market`, `MarketCatalog`
//!
//! - **Application**: ports and services
//!   - `ports`: `ExchangePort`, the driven port to the exchange
//!   - `services`: `OrderClient`, one pre-initialised exchange session
//!
//! - **Infrastructure**: adapters
//!   - `kraken`: signed REST adapter implementing `ExchangePort`
//!   - `http`: webhook endpoint, health and metrics routes
//!   - `config`, `telemetry`, `metrics`
//!
//! # Request Flow
//!
//! ```text
//! POST /kraken-webhook ──► auth ──► validate ──► OrderClient ──► Kraken AddOrder
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - Order value objects and market catalog.
pub mod domain;

/// Application layer - Ports and the Order Client.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// Domain re-exports
pub use domain::market::{Market, MarketCatalog};
pub use domain::order::{Amount, OrderResult, OrderSide, Symbol};

// Application re-exports
pub use application::ports::{ExchangeError, ExchangePort, MarketOrderRequest};
pub use application::services::{OrderClient, OrderError, SessionSettings};

// Infrastructure re-exports
pub use infrastructure::config::{ConfigError, WebhookConfig, WebhookSecret};
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::kraken::{KrakenConfig, KrakenError, KrakenExchangeAdapter};
pub use infrastructure::metrics::init_metrics;
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
