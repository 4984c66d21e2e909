//! Order Context
//!
//! Value objects describing a single market order from request to exchange
//! acknowledgement.

mod errors;
mod result;
mod value_objects;

pub use errors::OrderDomainError;
pub use result::OrderResult;
pub use value_objects::{Amount, OrderRequest, OrderSide, Symbol};
