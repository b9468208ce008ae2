//! Exchange module - TradingApi implementations

pub mod auth;
pub mod dry_run;
pub mod messages;
pub mod rest;

pub use dry_run::{DryRunTradingApi, SimulatedOrder};
pub use rest::BitstampRestClient;
