//! Configuration types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::common::errors::ConfigError;
use crate::common::types::Market;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Exchange connection settings
    pub exchange: ExchangeConfig,
    /// The market to trade on
    pub market: Market,
    /// Which strategy to run and its settings
    #[serde(default)]
    pub strategy: StrategySettings,
    /// Trade cycle settings
    #[serde(default)]
    pub engine: EngineSettings,
}

impl AppConfig {
    /// Reject configurations the bot cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market.id.trim().is_empty() {
            return Err(ConfigError::Invalid("market.id must not be empty".to_string()));
        }
        if self.engine.trade_cycle_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "engine.trade_cycle_interval_seconds must be greater than zero".to_string(),
            ));
        }
        if self.exchange.credentials().is_none() {
            return Err(ConfigError::Invalid(
                "exchange.api_key and exchange.api_secret are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Exchange configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Exchange name, for logging
    #[serde(default = "default_exchange_name")]
    pub name: String,
    /// API key for authenticated requests
    #[serde(default)]
    pub api_key: Option<String>,
    /// API secret for signing requests
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Base URL for the REST API
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// HTTP status codes treated as network errors (retried next cycle)
    #[serde(default = "default_non_fatal_error_codes")]
    pub non_fatal_error_codes: Vec<u16>,
    /// Transport error fragments treated as network errors
    #[serde(default = "default_non_fatal_error_messages")]
    pub non_fatal_error_messages: Vec<String>,
    /// Simulate order submission instead of sending orders
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            name: default_exchange_name(),
            api_key: None,
            api_secret: None,
            rest_url: default_rest_url(),
            request_timeout_seconds: default_request_timeout(),
            non_fatal_error_codes: default_non_fatal_error_codes(),
            non_fatal_error_messages: default_non_fatal_error_messages(),
            dry_run: false,
        }
    }
}

impl ExchangeConfig {
    /// API credentials, if both key and secret are set
    pub fn credentials(&self) -> Option<ApiCredentials> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(ApiCredentials::new(key.clone(), secret.clone()))
            }
            _ => None,
        }
    }
}

fn default_exchange_name() -> String {
    "bitstamp".to_string()
}

fn default_rest_url() -> String {
    "https://www.bitstamp.net".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_non_fatal_error_codes() -> Vec<u16> {
    vec![502, 503, 504, 520, 522, 525]
}

fn default_non_fatal_error_messages() -> Vec<String> {
    vec![
        "Connection reset".to_string(),
        "Connection refused".to_string(),
        "Remote host closed connection during handshake".to_string(),
    ]
}

/// Strategy selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySettings {
    /// Strategy name, for logging
    #[serde(default = "default_strategy_name")]
    pub name: String,
    /// Free-form items passed to the strategy
    #[serde(default)]
    pub config: StrategyConfig,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            name: default_strategy_name(),
            config: StrategyConfig::default(),
        }
    }
}

fn default_strategy_name() -> String {
    "scalping".to_string()
}

/// Key/value items a strategy reads at start-up
///
/// Each strategy decides which keys it needs and how to parse them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyConfig {
    items: HashMap<String, String>,
}

impl StrategyConfig {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.insert(key.into(), value.into());
        self
    }
}

/// Trade cycle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Seconds between trade cycles
    #[serde(default = "default_trade_cycle_interval")]
    pub trade_cycle_interval_seconds: u64,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            trade_cycle_interval_seconds: default_trade_cycle_interval(),
            log_level: default_log_level(),
        }
    }
}

fn default_trade_cycle_interval() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

/// API credentials for authenticated requests
#[derive(Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl ApiCredentials {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
