//! Webhook Configuration Settings
//!
//! Configuration types for the webhook service, loaded from environment variables.

use std::time::Duration;

/// Default listening port.
const DEFAULT_PORT: u16 = 5003;

/// Default Kraken REST endpoint.
const DEFAULT_API_URL: &str = "https://api.kraken.com";

/// Shared secret expected in the `X-Webhook-Secret` header.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    /// Wrap a secret. Empty secrets disable authentication, so they yield `None`.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    /// Whether a presented header value matches exactly.
    #[must_use]
    pub fn matches(&self, presented: Option<&str>) -> bool {
        presented.is_some_and(|value| value == self.0)
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WebhookSecret([REDACTED])")
    }
}

/// Exchange API credentials.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }

    /// Get the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the API secret.
    #[must_use]
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Listening port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

/// Exchange client settings.
#[derive(Debug, Clone)]
pub struct ExchangeSettings {
    /// REST base URL.
    pub api_url: String,
    /// Sandbox REST base URL, if the deployment has one.
    pub sandbox_url: Option<String>,
    /// Minimum spacing between exchange requests.
    pub rate_limit: Duration,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            sandbox_url: None,
            rate_limit: Duration::from_millis(1000),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Complete webhook service configuration.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Webhook shared secret; `None` disables header authentication.
    pub webhook_secret: Option<WebhookSecret>,
    /// Exchange API credentials.
    pub credentials: Credentials,
    /// Request the exchange sandbox.
    pub sandbox: bool,
    /// Server settings.
    pub server: ServerSettings,
    /// Exchange client settings.
    pub exchange: ExchangeSettings,
}

impl WebhookConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, "KRAKEN_API_KEY")?;
        let api_secret = required(&lookup, "KRAKEN_API_SECRET")?;

        let webhook_secret = lookup("WEBHOOK_SECRET").and_then(WebhookSecret::new);

        let sandbox = lookup("KRAKEN_SANDBOX").map_or(true, |v| parse_flag(&v));

        let port = match lookup("KRAKEN_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("KRAKEN_PORT".to_string(), raw))?,
            None => DEFAULT_PORT,
        };

        let defaults = ExchangeSettings::default();
        let exchange = ExchangeSettings {
            api_url: lookup("KRAKEN_API_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_url),
            sandbox_url: lookup("KRAKEN_SANDBOX_URL").filter(|v| !v.is_empty()),
            rate_limit: parse_duration_millis(&lookup, "KRAKEN_RATE_LIMIT_MS", defaults.rate_limit),
            timeout: parse_duration_secs(&lookup, "KRAKEN_TIMEOUT_SECS", defaults.timeout),
        };

        Ok(Self {
            webhook_secret,
            credentials: Credentials::new(api_key, api_secret),
            sandbox,
            server: ServerSettings { port },
            exchange,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Environment variable could not be parsed.
    #[error("environment variable {0} has invalid value '{1}'")]
    InvalidValue(String, String),
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))?;
    if value.is_empty() {
        return Err(ConfigError::EmptyValue(key.to_string()));
    }
    Ok(value)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes")
}

/// Zero is treated as invalid.
fn parse_duration_secs<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map_or(default, Duration::from_secs)
}

fn parse_duration_millis<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}
