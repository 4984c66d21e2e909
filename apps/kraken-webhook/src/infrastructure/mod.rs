//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer.
//!
//! - **Driven Adapters (Outbound)**
//!   - `kraken/`: Kraken spot REST adapter
//!
//! - **Driver Adapters (Inbound)**
//!   - `http/`: Webhook endpoint, health and metrics routes
//!
//! - **Cross-cutting**
//!   - `config/`: Environment configuration
//!   - `telemetry/`: Tracing subscriber and optional OTLP export
//!   - `metrics/`: Prometheus counters

pub mod config;
pub mod http;
pub mod kraken;
pub mod metrics;
pub mod telemetry;
