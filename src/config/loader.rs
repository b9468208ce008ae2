//! Configuration loader

use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::ConfigError;

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP, sections split by `__`,
///    e.g. `APP__EXCHANGE__API_KEY`)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    finish(builder)
}

/// Load configuration from a TOML document plus environment overrides
pub fn load_config_from_str(toml: &str) -> Result<AppConfig, ConfigError> {
    finish(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, ConfigError> {
    let config = builder
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"
        [exchange]
        api_key = "key"
        api_secret = "secret"
        dry_run = true

        [market]
        id = "ltcbtc"
        name = "LTC/BTC"
        base_currency = "LTC"
        counter_currency = "BTC"

        [strategy.config]
        counter-currency-buy-order-amount = "0.5"

        [engine]
        trade_cycle_interval_seconds = 30
    "#;

    #[test]
    fn test_load_sample_config() {
        let config = load_config_from_str(SAMPLE).unwrap();

        assert_eq!(config.exchange.name, "bitstamp");
        assert_eq!(config.exchange.rest_url, "https://www.bitstamp.net");
        assert!(config.exchange.dry_run);
        assert_eq!(config.exchange.non_fatal_error_codes, vec![502, 503, 504, 520, 522, 525]);
        assert_eq!(config.market.id, "ltcbtc");
        assert_eq!(config.strategy.name, "scalping");
        assert_eq!(
            config.strategy.config.get("counter-currency-buy-order-amount"),
            Some("0.5")
        );
        assert_eq!(config.engine.trade_cycle_interval_seconds, 30);
        assert_eq!(config.engine.log_level, "info");
        // parsing the amount is the strategy's job
        assert_eq!(
            config
                .strategy
                .config
                .get("counter-currency-buy-order-amount")
                .map(|v| v.parse::<rust_decimal::Decimal>().unwrap()),
            Some(dec!(0.5))
        );
    }

    #[test]
    fn test_missing_market_is_rejected() {
        let result = load_config_from_str(
            r#"
            [exchange]
            api_key = "key"
            api_secret = "secret"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let toml = SAMPLE.replace(
            "trade_cycle_interval_seconds = 30",
            "trade_cycle_interval_seconds = 0",
        );
        assert!(matches!(
            load_config_from_str(&toml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_credentials_are_rejected() {
        let toml = SAMPLE.replace("api_secret = \"secret\"", "");
        assert!(matches!(
            load_config_from_str(&toml),
            Err(ConfigError::Invalid(_))
        ));
    }
}
