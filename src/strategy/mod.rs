//! Strategy module for trade decision making
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  TradingEngine (runner)                                     │
//! │    - ticks once per trade cycle                             │
//! │    - stops the bot on StrategyError                         │
//! └─────────────────────────────────────────────────────────────┘
//!        │ execute()
//!        ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ScalpingStrategy                                           │
//! │    - order book -> best bid / best ask                      │
//! │    - match OrderState { None, Buy, Sell }                   │
//! │    - pricing: quantity for budget, ask from buy             │
//! │    - TradingApi: open orders, fees, submit order            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The order lifecycle is a loop:
//!
//! ```text
//! None --buy--> Buy --filled, sell--> Sell --filled, buy--> Buy ...
//! ```
//!
//! # Components
//!
//! - [`TradingStrategy`]: Trait the host drives once per tick
//! - [`ScalpingStrategy`]: The buy-low/sell-with-margin implementation
//! - [`OrderState`]: The one order a strategy remembers between cycles
//! - [`CycleOutcome`]: What a cycle did, for logging and tests
//! - [`pricing`]: Quantity and ask price arithmetic
//! - [`FeeSchedule`]: Buy and sell fee rates for a market

mod engine;
mod fees;
pub mod pricing;
mod state;
mod traits;
mod types;

pub use engine::{ScalpingStrategy, BUY_ORDER_AMOUNT_KEY};

pub use fees::FeeSchedule;

pub use state::{OrderState, PlacedOrder};

pub use traits::{BoxedStrategy, TradingStrategy};

pub use types::{AskPosition, CycleOutcome, HoldReason, SkipReason};
