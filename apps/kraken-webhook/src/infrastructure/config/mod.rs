//! Configuration Module
//!
//! Configuration loading for the webhook service.

mod settings;

pub use settings::{
    ConfigError, Credentials, ExchangeSettings, ServerSettings, WebhookConfig, WebhookSecret,
};
