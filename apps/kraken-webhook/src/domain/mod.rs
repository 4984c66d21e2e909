//! Domain Layer
//!
//! Order and market types with no infrastructure dependencies.
//!
//! # Bounded Contexts
//!
//! - [`order`]: Order requests, sides, amounts and exchange order records
//! - [`market`]: The catalog of tradable pairs loaded from the exchange

pub mod market;
pub mod order;
