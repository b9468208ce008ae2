//! Scalper Library
//!
//! A single-market scalping bot: buys at the best bid, then resells the
//! filled quantity at a price covering both exchange fees and a profit margin.

pub mod common;
pub mod config;
pub mod exchange;
pub mod runner;
pub mod strategy;

// Re-export commonly used types
pub use common::errors::{ErrorClass, ExchangeError, Result, StrategyError};
pub use common::traits::TradingApi;
pub use common::types::{Market, OpenOrder, OrderBook, OrderId, OrderSide, PriceLevel};
pub use config::types::AppConfig;
pub use exchange::{BitstampRestClient, DryRunTradingApi};
pub use runner::{EngineStats, TradingEngine};

// Strategy types
pub use strategy::{
    BoxedStrategy, CycleOutcome, OrderState, PlacedOrder, ScalpingStrategy, TradingStrategy,
};
