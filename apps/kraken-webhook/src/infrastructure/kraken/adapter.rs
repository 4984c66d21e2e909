//! Kraken exchange adapter implementing ExchangePort.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;

use crate::application::ports::{ExchangeError, ExchangePort, MarketOrderRequest};
use crate::domain::market::Market;
use crate::domain::order::{Amount, OrderResult};

use super::api_types::{AddOrderResult, AssetPair};
use super::config::KrakenConfig;
use super::error::KrakenError;
use super::http_client::KrakenHttpClient;

/// Kraken spot exchange adapter.
///
/// Implements `ExchangePort` for the Kraken REST API.
#[derive(Debug)]
pub struct KrakenExchangeAdapter {
    client: KrakenHttpClient,
    api_url: String,
    sandbox_url: Option<String>,
    sandbox: bool,
}

impl KrakenExchangeAdapter {
    /// Create a new Kraken adapter. Starts in live mode.
    pub fn new(config: &KrakenConfig) -> Result<Self, KrakenError> {
        let client = KrakenHttpClient::new(config)?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            sandbox_url: config.sandbox_url.clone(),
            sandbox: false,
        })
    }

    /// Whether requests currently go to the sandbox URL.
    #[must_use]
    pub const fn is_sandbox(&self) -> bool {
        self.sandbox
    }

    /// REST base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Order volume truncated to the market's lot precision.
    fn order_volume(request: &MarketOrderRequest) -> Result<Amount, KrakenError> {
        let Some(decimals) = request.amount_precision else {
            return Ok(request.amount);
        };

        Amount::new(request.amount.value().trunc_with_scale(decimals)).map_err(|_| {
            KrakenError::OrderRejected(format!(
                "amount {} is below the {decimals}-decimal lot precision of {}",
                request.amount, request.pair_id
            ))
        })
    }

    fn to_add_order_params(
        request: &MarketOrderRequest,
        volume: Amount,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("ordertype", "market".to_string()),
            ("type", request.side.as_str().to_string()),
            ("volume", volume.to_string()),
            ("pair", request.pair_id.clone()),
            ("cl_ord_id", request.client_order_id.to_string()),
        ]
    }

    fn to_order_result(
        request: &MarketOrderRequest,
        volume: Amount,
        raw: serde_json::Value,
    ) -> Result<OrderResult, KrakenError> {
        let parsed: AddOrderResult = serde_json::from_value(raw.clone())
            .map_err(|e| KrakenError::JsonParse(e.to_string()))?;

        let id = parsed
            .txid
            .first()
            .cloned()
            .ok_or_else(|| KrakenError::JsonParse("AddOrder returned no txid".to_string()))?;

        Ok(OrderResult {
            id,
            txids: parsed.txid,
            client_order_id: Some(request.client_order_id.to_string()),
            symbol: request.symbol.clone(),
            order_type: "market".to_string(),
            side: request.side,
            amount: volume,
            status: "open".to_string(),
            timestamp: Utc::now(),
            description: parsed.descr.map(|d| d.order),
            info: raw,
        })
    }
}

#[async_trait]
impl ExchangePort for KrakenExchangeAdapter {
    fn name(&self) -> &'static str {
        "kraken"
    }

    fn supports_sandbox(&self) -> bool {
        self.sandbox_url.is_some()
    }

    fn set_sandbox_mode(&mut self, enabled: bool) -> Result<(), ExchangeError> {
        if enabled {
            let url = self
                .sandbox_url
                .as_deref()
                .ok_or(KrakenError::SandboxUnavailable)?;
            self.client.set_base_url(url);
        } else {
            self.client.set_base_url(&self.api_url);
        }
        self.sandbox = enabled;

        tracing::info!(
            base_url = %self.client.base_url(),
            sandbox = enabled,
            "Kraken endpoint selected"
        );
        Ok(())
    }

    async fn load_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        let pairs: HashMap<String, AssetPair> = self
            .client
            .public_get("AssetPairs")
            .await
            .map_err(ExchangeError::from)?;

        let total = pairs.len();
        let markets: Vec<Market> = pairs
            .iter()
            .filter_map(|(id, pair)| pair.to_market(id))
            .collect();

        tracing::debug!(
            pairs = total,
            markets = markets.len(),
            "Parsed Kraken asset pairs"
        );

        Ok(markets)
    }

    async fn create_market_order(
        &self,
        request: MarketOrderRequest,
    ) -> Result<OrderResult, ExchangeError> {
        if !self.sandbox {
            tracing::warn!(
                client_order_id = %request.client_order_id,
                symbol = %request.symbol,
                "Submitting LIVE order - this will execute real trades"
            );
        }

        let volume = Self::order_volume(&request)?;
        if volume != request.amount {
            tracing::debug!(
                requested = %request.amount,
                volume = %volume,
                "Amount truncated to lot precision"
            );
        }

        let params = Self::to_add_order_params(&request, volume);
        let raw: serde_json::Value = self
            .client
            .private_post("AddOrder", &params)
            .await
            .map_err(ExchangeError::from)?;

        Self::to_order_result(&request, volume, raw).map_err(ExchangeError::from)
    }
}
