//! Kraken Webhook Binary
//!
//! Starts the webhook receiver.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin kraken-webhook
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `KRAKEN_API_KEY`: Kraken API key
//! - `KRAKEN_API_SECRET`: Kraken API secret (base64)
//!
//! ## Optional
//! - `WEBHOOK_SECRET`: Shared secret for `X-Webhook-Secret` (unset disables auth)
//! - `KRAKEN_SANDBOX`: Request sandbox mode (default: true)
//! - `KRAKEN_PORT`: HTTP port (default: 5003)
//! - `KRAKEN_API_URL`: REST base URL (default: <https://api.kraken.com>)
//! - `KRAKEN_SANDBOX_URL`: Sandbox REST base URL (default: unset)
//! - `KRAKEN_RATE_LIMIT_MS`: Minimum spacing between exchange requests (default: 1000)
//! - `KRAKEN_TIMEOUT_SECS`: Exchange HTTP timeout (default: 30)
//! - `OTEL_ENABLED`: Export spans over OTLP (default: false)
//! - `RUST_LOG`: Log filter (default: kraken_webhook=info)

use std::net::SocketAddr;
use std::sync::Arc;

use kraken_webhook::infrastructure::kraken::{KrakenConfig, KrakenExchangeAdapter};
use kraken_webhook::{
    AppState, OrderClient, SessionSettings, WebhookConfig, create_router, init_metrics,
    init_telemetry,
};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();

    let _telemetry_guard = init_telemetry()?;

    tracing::info!("Starting Kraken webhook");

    if let Err(e) = init_metrics() {
        tracing::warn!(error = %e, "Prometheus recorder not installed, /metrics disabled");
    }

    let config = WebhookConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
    })?;
    log_config(&config);

    let kraken_config = KrakenConfig::from_settings(config.credentials.clone(), &config.exchange);
    let adapter = KrakenExchangeAdapter::new(&kraken_config).inspect_err(|e| {
        tracing::error!(error = %e, "Failed to create Kraken client");
    })?;

    let session = SessionSettings {
        sandbox: config.sandbox,
    };
    let order_client = OrderClient::connect(adapter, session)
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "Failed to initialise exchange session");
        })?;

    if !order_client.is_sandbox() {
        tracing::warn!("Orders will execute LIVE on Kraken");
    }

    let state = AppState::new(Arc::new(order_client), config.webhook_secret.clone());
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(await_shutdown())
        .await?;

    tracing::info!("Kraken webhook stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &WebhookConfig) {
    tracing::info!(
        port = config.server.port,
        sandbox_requested = config.sandbox,
        webhook_auth = config.webhook_secret.is_some(),
        api_url = %config.exchange.api_url,
        rate_limit_ms = u64::try_from(config.exchange.rate_limit.as_millis()).unwrap_or(u64::MAX),
        "Configuration loaded"
    );

    if config.webhook_secret.is_none() {
        tracing::warn!("WEBHOOK_SECRET not set, webhook authentication disabled");
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
async fn await_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
