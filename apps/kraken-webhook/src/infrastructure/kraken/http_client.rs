//! HTTP client wrapper with request signing and pacing.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::api_types::KrakenResponse;
use super::auth::{NonceGenerator, decode_secret, sign_request};
use super::config::KrakenConfig;
use super::error::KrakenError;

/// HTTP client for the Kraken REST API.
pub struct KrakenHttpClient {
    client: Client,
    api_key: String,
    secret: Vec<u8>,
    base_url: String,
    nonces: NonceGenerator,
    pacer: RequestPacer,
}

impl KrakenHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &KrakenConfig) -> Result<Self, KrakenError> {
        let api_key = config.credentials.api_key();
        let api_secret = config.credentials.api_secret();
        if api_key.is_empty() || api_secret.is_empty() {
            return Err(KrakenError::InvalidCredentials(
                "API key and secret are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KrakenError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            secret: decode_secret(api_secret)?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            nonces: NonceGenerator::new(),
            pacer: RequestPacer::new(config.rate_limit),
        })
    }

    /// Current REST base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Point subsequent requests at another base URL.
    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = url.trim_end_matches('/').to_string();
    }

    /// Call a public endpoint, e.g. `AssetPairs`.
    pub async fn public_get<T: DeserializeOwned>(&self, method: &str) -> Result<T, KrakenError> {
        let url = format!("{}/0/public/{method}", self.base_url);
        self.send(self.client.get(&url), method).await
    }

    /// Call a private endpoint with form parameters; `nonce` is prepended.
    pub async fn private_post<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, KrakenError> {
        let path = format!("/0/private/{method}");
        let url = format!("{}{path}", self.base_url);

        // Nonce is taken after pacing so requests leave in nonce order.
        self.pacer.wait().await;
        let nonce = self.nonces.next();

        let mut form: Vec<(&str, String)> = Vec::with_capacity(params.len() + 1);
        form.push(("nonce", nonce.to_string()));
        form.extend(params.iter().cloned());

        let body =
            serde_html_form::to_string(&form).map_err(|e| KrakenError::JsonParse(e.to_string()))?;
        let signature = sign_request(&path, nonce, &body, &self.secret)?;

        let request = self
            .client
            .post(&url)
            .header("API-Key", &self.api_key)
            .header("API-Sign", signature)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=utf-8",
            )
            .body(body);

        Self::execute(request, method).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: &str,
    ) -> Result<T, KrakenError> {
        self.pacer.wait().await;
        Self::execute(request, method).await
    }

    async fn execute<T: DeserializeOwned>(
        request: RequestBuilder,
        method: &str,
    ) -> Result<T, KrakenError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(method, error = %e, "Kraken request failed");
            KrakenError::Network(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| KrakenError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(method, status = status.as_u16(), "Kraken returned HTTP error");
            return Err(KrakenError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope: KrakenResponse<T> =
            serde_json::from_str(&text).map_err(|e| KrakenError::JsonParse(e.to_string()))?;

        envelope.into_result().inspect_err(|e| {
            tracing::warn!(method, error = %e, "Kraken API error");
        })
    }
}

impl std::fmt::Debug for KrakenHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KrakenHttpClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Spaces requests at least `interval` apart.
#[derive(Debug)]
struct RequestPacer {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl RequestPacer {
    const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::const_new(None),
        }
    }

    async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }

        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
