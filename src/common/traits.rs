//! Trait definitions for exchange clients

use async_trait::async_trait;
use rust_decimal::Decimal;

#[cfg(test)]
use mockall::automock;

use super::errors::Result;
use super::types::{OpenOrder, OrderBook, OrderId, OrderSide};

/// Trading capability a strategy needs from an exchange
///
/// Every fallible call reports failures as an [`ExchangeError`](super::errors::ExchangeError)
/// whose [`class`](super::errors::ExchangeError::class) tells the caller whether
/// waiting for the next trade cycle is enough. Implementations own their
/// timeouts and must surface them as transient errors.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TradingApi: Send + Sync {
    /// Name of the exchange, for logging
    fn name(&self) -> &str;

    /// Current order book, bids descending and asks ascending by price
    async fn get_order_book(&self, market_id: &str) -> Result<OrderBook>;

    /// Our orders that are still open on the market
    async fn get_open_orders(&self, market_id: &str) -> Result<Vec<OpenOrder>>;

    /// Price of the last trade on the market
    async fn get_last_trade_price(&self, market_id: &str) -> Result<Decimal>;

    /// Fraction of a buy order taken as fee (0.0025 means 0.25%)
    async fn get_buy_fee_rate(&self, market_id: &str) -> Result<Decimal>;

    /// Fraction of a sell order taken as fee
    async fn get_sell_fee_rate(&self, market_id: &str) -> Result<Decimal>;

    /// Place a limit order and return the exchange's id for it
    async fn submit_order(
        &self,
        market_id: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OrderId>;
}
