//! Application Services

mod order_client;

pub use order_client::{OrderClient, OrderError, SessionSettings};
