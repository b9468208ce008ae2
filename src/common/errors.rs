//! Error types for the application

use thiserror::Error;

/// Result type alias for exchange calls
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// How a failed exchange call should be treated by a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Network/timeout-like failure. Wait for the next trade cycle.
    Transient,
    /// API rejection or unexpected response. Stop trading.
    NonRecoverable,
}

/// Error type for exchange capability calls
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Connection failures, resets and gateway errors
    #[error("Network error: {0}")]
    Network(String),

    /// Request did not complete in time
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded: {message}, retry after {retry_after_seconds:?} seconds")]
    RateLimit {
        message: String,
        retry_after_seconds: Option<u64>,
    },

    /// HTTP status the adapter does not consider recoverable
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Exchange rejected the request
    #[error("Exchange API error: {0}")]
    Api(String),

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExchangeError {
    /// Classify this error for the strategy's retry policy
    pub fn class(&self) -> ErrorClass {
        match self {
            ExchangeError::Network(_)
            | ExchangeError::Timeout(_)
            | ExchangeError::RateLimit { .. } => ErrorClass::Transient,
            ExchangeError::HttpStatus { .. }
            | ExchangeError::Api(_)
            | ExchangeError::InvalidResponse(_)
            | ExchangeError::JsonParse(_)
            | ExchangeError::Authentication(_)
            | ExchangeError::Configuration(_)
            | ExchangeError::Internal(_) => ErrorClass::NonRecoverable,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.class() == ErrorClass::Transient
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExchangeError::Timeout(err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_body() {
            ExchangeError::Network(err.to_string())
        } else if err.is_decode() {
            ExchangeError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ExchangeError::HttpStatus {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ExchangeError::Internal(err.to_string())
        }
    }
}

/// Errors raised by a trading strategy
///
/// Any `StrategyError` returned from a trade cycle tells the host to stop the bot.
#[derive(Error, Debug)]
pub enum StrategyError {
    /// Missing or malformed strategy configuration
    #[error("Strategy configuration error: {0}")]
    Configuration(String),

    /// Non-recoverable exchange failure
    #[error("Exchange failure: {0}")]
    Exchange(#[from] ExchangeError),
}

/// Errors raised while loading application configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
