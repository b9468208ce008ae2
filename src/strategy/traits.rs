use async_trait::async_trait;

use crate::common::errors::StrategyError;
use crate::strategy::types::CycleOutcome;

/// Core strategy trait
///
/// The host calls [`execute`](TradingStrategy::execute) once per trade cycle and
/// never overlaps two calls. A strategy keeps whatever state it needs between
/// cycles.
///
/// # Stopping the bot
///
/// Returning `Err` tells the host to shut the bot down immediately to avoid
/// unexpected losses. Recoverable problems (network blips, empty books) are
/// handled inside the strategy and reported through [`CycleOutcome`].
#[async_trait]
pub trait TradingStrategy: Send {
    /// Unique identifier for this strategy
    fn name(&self) -> &str;

    /// Run one trade cycle
    async fn execute(&mut self) -> Result<CycleOutcome, StrategyError>;
}

/// Boxed strategy for dynamic dispatch
pub type BoxedStrategy = Box<dyn TradingStrategy>;
