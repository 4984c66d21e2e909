//! Application Layer
//!
//! - `ports`: Interfaces for external systems (`ExchangePort`)
//! - `services`: The order client that validates and forwards market orders

pub mod ports;
pub mod services;
