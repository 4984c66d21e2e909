//! Kraken-specific error types.

use thiserror::Error;

use crate::application::ports::ExchangeError;

/// Errors from the Kraken adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KrakenError {
    /// Non-success HTTP status.
    #[error("HTTP error: {status} - {body}")]
    Http {
        /// Status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Missing or malformed credentials.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Key, signature, nonce or permission rejected.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Not enough balance.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Rate limited.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Order rejected.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Any other error the API reported.
    #[error("API error: {0}")]
    Api(String),

    /// No sandbox URL configured.
    #[error("Sandbox mode is not available")]
    SandboxUnavailable,
}

impl KrakenError {
    /// Classify the `error` array of a Kraken response envelope.
    #[must_use]
    pub fn from_api_errors(errors: &[String]) -> Self {
        let joined = errors.join(", ");
        let first = errors.first().map_or("", String::as_str);

        if first.starts_with("EAPI:Invalid key")
            || first.starts_with("EAPI:Invalid signature")
            || first.starts_with("EAPI:Invalid nonce")
            || first.starts_with("EGeneral:Permission denied")
        {
            Self::AuthenticationFailed(joined)
        } else if first.starts_with("EOrder:Insufficient funds") {
            Self::InsufficientFunds(joined)
        } else if first.starts_with("EAPI:Rate limit exceeded")
            || first.starts_with("EOrder:Rate limit exceeded")
            || first.starts_with("EGeneral:Too many requests")
        {
            Self::RateLimited(joined)
        } else if first.starts_with("EOrder:") {
            Self::OrderRejected(joined)
        } else {
            Self::Api(joined)
        }
    }
}

impl From<KrakenError> for ExchangeError {
    fn from(err: KrakenError) -> Self {
        match err {
            KrakenError::Network(message) => Self::ConnectionError { message },
            KrakenError::Http { status, body } => Self::ConnectionError {
                message: format!("HTTP {status}: {body}"),
            },
            KrakenError::JsonParse(message) => Self::InvalidResponse { message },
            KrakenError::InvalidCredentials(message) | KrakenError::AuthenticationFailed(message) => {
                Self::AuthenticationFailed { message }
            }
            KrakenError::InsufficientFunds(_) => Self::InsufficientFunds,
            KrakenError::RateLimited(_) => Self::RateLimited,
            KrakenError::OrderRejected(reason) => Self::OrderRejected { reason },
            KrakenError::Api(message) => Self::Unknown { message },
            KrakenError::SandboxUnavailable => Self::SandboxUnsupported {
                exchange: "kraken".to_string(),
            },
        }
    }
}
