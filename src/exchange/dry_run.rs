//! Dry run wrapper that simulates order submission.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::common::errors::Result;
use crate::common::traits::TradingApi;
use crate::common::types::{OpenOrder, OrderBook, OrderId, OrderSide};

/// Prefix of ids handed out for simulated orders
pub const DRY_RUN_ID_PREFIX: &str = "DRY-";

/// Exchange wrapper for running a strategy without trading.
///
/// Market data, open orders and fees come from the wrapped exchange. Orders
/// are logged and given a synthetic id instead of being sent. Simulated orders
/// never show up in the exchange's open orders, so a strategy sees them as
/// filled on its next cycle.
pub struct DryRunTradingApi<A> {
    inner: A,
    submitted: Mutex<Vec<SimulatedOrder>>,
}

/// An order that would have been sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedOrder {
    pub id: OrderId,
    pub market_id: String,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub price: Decimal,
}

impl<A: TradingApi> DryRunTradingApi<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Number of orders simulated so far
    pub fn submitted_count(&self) -> usize {
        self.submitted().len()
    }

    /// Orders simulated so far, oldest first
    pub fn submitted_orders(&self) -> Vec<SimulatedOrder> {
        self.submitted().clone()
    }

    fn submitted(&self) -> MutexGuard<'_, Vec<SimulatedOrder>> {
        // the list is append-only, so a poisoned lock still holds valid orders
        self.submitted.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<A: TradingApi> TradingApi for DryRunTradingApi<A> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn get_order_book(&self, market_id: &str) -> Result<OrderBook> {
        self.inner.get_order_book(market_id).await
    }

    async fn get_open_orders(&self, market_id: &str) -> Result<Vec<OpenOrder>> {
        self.inner.get_open_orders(market_id).await
    }

    async fn get_last_trade_price(&self, market_id: &str) -> Result<Decimal> {
        self.inner.get_last_trade_price(market_id).await
    }

    async fn get_buy_fee_rate(&self, market_id: &str) -> Result<Decimal> {
        self.inner.get_buy_fee_rate(market_id).await
    }

    async fn get_sell_fee_rate(&self, market_id: &str) -> Result<Decimal> {
        self.inner.get_sell_fee_rate(market_id).await
    }

    #[instrument(skip(self))]
    async fn submit_order(
        &self,
        market_id: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OrderId> {
        let id = OrderId::new(format!("{}{}", DRY_RUN_ID_PREFIX, uuid::Uuid::new_v4()));
        info!(
            exchange = self.inner.name(),
            market = market_id,
            %quantity,
            %price,
            %id,
            "[DRY RUN] Simulated {} order, nothing sent",
            side
        );

        self.submitted().push(SimulatedOrder {
            id: id.clone(),
            market_id: market_id.to_string(),
            side,
            quantity,
            price,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::traits::MockTradingApi;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_submit_is_never_forwarded() {
        let mut inner = MockTradingApi::new();
        inner.expect_name().return_const("mock".to_string());
        inner.expect_submit_order().never();

        let api = DryRunTradingApi::new(inner);
        let first = api
            .submit_order("btcusd", OrderSide::Buy, dec!(0.5), dec!(42000))
            .await
            .unwrap();
        let second = api
            .submit_order("btcusd", OrderSide::Sell, dec!(0.5), dec!(43000))
            .await
            .unwrap();

        assert!(first.as_str().starts_with(DRY_RUN_ID_PREFIX));
        assert_ne!(first, second);
        assert_eq!(api.submitted_count(), 2);
    }

    #[test_log::test(tokio::test)]
    async fn test_simulated_order_keeps_price_and_quantity() {
        let mut inner = MockTradingApi::new();
        inner.expect_name().return_const("mock".to_string());
        inner.expect_submit_order().never();

        let api = DryRunTradingApi::new(inner);
        let id = api
            .submit_order("ltcbtc", OrderSide::Sell, dec!(20000.00000000), dec!(0.00496860))
            .await
            .unwrap();

        assert_eq!(
            api.submitted_orders(),
            vec![SimulatedOrder {
                id,
                market_id: "ltcbtc".to_string(),
                side: OrderSide::Sell,
                quantity: dec!(20000.00000000),
                price: dec!(0.00496860),
            }]
        );
    }

    #[tokio::test]
    async fn test_reads_are_delegated() {
        let mut inner = MockTradingApi::new();
        inner
            .expect_get_last_trade_price()
            .times(1)
            .returning(|_| Ok(dec!(42000)));
        inner
            .expect_get_open_orders()
            .times(1)
            .returning(|_| Ok(vec![]));

        let api = DryRunTradingApi::new(inner);
        assert_eq!(api.get_last_trade_price("btcusd").await.unwrap(), dec!(42000));
        assert!(api.get_open_orders("btcusd").await.unwrap().is_empty());
    }
}
