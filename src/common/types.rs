//! Exchange-neutral types shared by the strategy and the adapters

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The market a strategy trades on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Exchange identifier for the market (e.g. `btcusd`)
    pub id: String,
    /// Human-readable name used in logs
    pub name: String,
    /// Currency being bought and sold
    pub base_currency: String,
    /// Currency prices are quoted in
    pub counter_currency: String,
}

impl Market {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_currency: impl Into<String>,
        counter_currency: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_currency: base_currency.into(),
            counter_currency: counter_currency.into(),
        }
    }
}

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Exchange-assigned order identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single price level in an order book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price at this level in counter currency
    pub price: Decimal,
    /// Total base-currency quantity at this price level
    pub quantity: Decimal,
}

impl PriceLevel {
    /// Create a new price level
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }
}

/// Order book snapshot for a market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Market identifier
    pub market_id: String,
    /// Bid (buy) orders sorted by price descending
    pub bids: Vec<PriceLevel>,
    /// Ask (sell) orders sorted by price ascending
    pub asks: Vec<PriceLevel>,
    /// Timestamp of this snapshot
    pub timestamp: DateTime<Utc>,
}

impl OrderBook {
    /// Highest bid, if anyone is bidding
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Lowest ask, if anyone is asking
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Best ask minus best bid; `None` unless both sides have orders
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }
}

/// One of our orders still resting on the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenOrder {
    pub id: OrderId,
    pub market_id: String,
    pub side: OrderSide,
    pub price: Decimal,
    /// Remaining quantity
    pub quantity: Decimal,
    pub created_at: Option<DateTime<Utc>>,
}
