//! Kraken adapter configuration.

use std::time::Duration;

use crate::infrastructure::config::{Credentials, ExchangeSettings};

/// Default REST endpoint.
pub const KRAKEN_API_URL: &str = "https://api.kraken.com";

/// Configuration for the Kraken exchange adapter.
#[derive(Debug, Clone)]
pub struct KrakenConfig {
    /// API credentials; the secret is base64 as issued by Kraken.
    pub credentials: Credentials,
    /// Live REST base URL.
    pub api_url: String,
    /// Sandbox REST base URL. Kraken spot has none unless one is configured.
    pub sandbox_url: Option<String>,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Minimum spacing between requests.
    pub rate_limit: Duration,
}

impl KrakenConfig {
    /// Create a configuration pointing at the production API.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_url: KRAKEN_API_URL.to_string(),
            sandbox_url: None,
            timeout: Duration::from_secs(30),
            rate_limit: Duration::from_millis(1000),
        }
    }

    /// Create a configuration from service settings.
    #[must_use]
    pub fn from_settings(credentials: Credentials, settings: &ExchangeSettings) -> Self {
        Self {
            credentials,
            api_url: settings.api_url.clone(),
            sandbox_url: settings.sandbox_url.clone(),
            timeout: settings.timeout,
            rate_limit: settings.rate_limit,
        }
    }

    /// Set the live REST base URL.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the sandbox REST base URL.
    #[must_use]
    pub fn with_sandbox_url(mut self, url: impl Into<String>) -> Self {
        self.sandbox_url = Some(url.into());
        self
    }

    /// Set the request spacing.
    #[must_use]
    pub const fn with_rate_limit(mut self, rate_limit: Duration) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}
