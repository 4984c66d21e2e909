//! HTTP adapter.
//!
//! Inbound adapter exposing the webhook endpoint, health check and metrics.

mod controller;
mod request;
mod response;

pub use controller::{AppState, WEBHOOK_SECRET_HEADER, create_router};
pub use request::*;
pub use response::*;
