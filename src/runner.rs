//! Trading engine - runs a strategy once per trade cycle.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::common::errors::StrategyError;
use crate::strategy::{BoxedStrategy, CycleOutcome};

/// Counters kept across trade cycles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub cycles: u64,
    pub orders_placed: u64,
    pub holds: u64,
    pub skipped: u64,
    pub deferred: u64,
}

impl EngineStats {
    fn record(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::Placed { .. } => self.orders_placed += 1,
            CycleOutcome::Holding(_) => self.holds += 1,
            CycleOutcome::Skipped(_) => self.skipped += 1,
            CycleOutcome::Deferred => self.deferred += 1,
        }
    }
}

/// Drives a single strategy on a fixed trade cycle.
///
/// Cycles never overlap: the next tick is only awaited once the previous
/// `execute` call has returned. A [`StrategyError`] stops the engine and is
/// returned to the caller, which should exit the process.
pub struct TradingEngine {
    strategy: BoxedStrategy,
    trade_cycle_interval: Duration,
    stats: EngineStats,
}

impl TradingEngine {
    pub fn new(strategy: BoxedStrategy, trade_cycle_interval: Duration) -> Self {
        Self {
            strategy,
            trade_cycle_interval,
            stats: EngineStats::default(),
        }
    }

    /// Run until shutdown is signaled or the strategy fails.
    pub async fn run(
        mut self,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<EngineStats, StrategyError> {
        info!(
            strategy = self.strategy.name(),
            interval_secs = self.trade_cycle_interval.as_secs_f64(),
            "Starting trading engine"
        );

        let mut ticker = tokio::time::interval(self.trade_cycle_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!(stats = ?self.stats, "Shutdown signaled, stopping trading engine");
                        return Ok(self.stats);
                    }
                }

                _ = ticker.tick() => {
                    let cycle = self.stats.cycles + 1;
                    debug!(cycle, "Starting trade cycle");

                    match self.strategy.execute().await {
                        Ok(outcome) => {
                            debug!(cycle, ?outcome, "Trade cycle complete");
                            self.stats.record(&outcome);
                        }
                        Err(err) => {
                            error!(
                                cycle,
                                error = %err,
                                stats = ?self.stats,
                                "Strategy failed - shutting down bot to prevent unexpected losses"
                            );
                            return Err(err);
                        }
                    }
                }
            }
        }
    }
}
