//! Application configuration

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::{AppConfig, ExchangeConfig, StrategyConfig};
