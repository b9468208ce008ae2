use rust_decimal::Decimal;

use crate::common::types::{OrderId, OrderSide};

/// What a single trade cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing to act on this cycle
    Skipped(SkipReason),
    /// A new order was sent and is now the remembered order
    Placed {
        side: OrderSide,
        id: OrderId,
        price: Decimal,
        quantity: Decimal,
    },
    /// The remembered order is still open
    Holding(HoldReason),
    /// A transient exchange failure ended the cycle early; retried next tick
    Deferred,
}

impl CycleOutcome {
    /// Returns true if an order was sent this cycle
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}

/// Why a cycle was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyBids,
    EmptyAsks,
}

/// Why the remembered order is being held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    BuyNotFilled,
    SellNotFilled(AskPosition),
}

/// Best ask relative to our resting sell price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskPosition {
    BelowOurAsk,
    AtOurAsk,
    /// Our own sell should bound the best ask, so this means the book and our
    /// bookkeeping disagree
    AboveOurAsk,
}

impl AskPosition {
    pub fn classify(best_ask: Decimal, our_ask: Decimal) -> Self {
        match best_ask.cmp(&our_ask) {
            std::cmp::Ordering::Less => Self::BelowOurAsk,
            std::cmp::Ordering::Equal => Self::AtOurAsk,
            std::cmp::Ordering::Greater => Self::AboveOurAsk,
        }
    }
}
