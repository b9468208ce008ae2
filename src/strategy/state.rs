use rust_decimal::Decimal;

use crate::common::types::{OrderId, OrderSide};

/// An order the strategy has successfully sent to the exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub id: OrderId,
    pub price: Decimal,
    pub quantity: Decimal,
}

impl PlacedOrder {
    pub fn new(id: OrderId, price: Decimal, quantity: Decimal) -> Self {
        Self {
            id,
            price,
            quantity,
        }
    }
}

/// The last order the strategy placed
///
/// Starts as `None` and moves between `Buy` and `Sell` for the lifetime of the
/// process. Transitions replace the whole value, so readers never observe a
/// half-updated order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrderState {
    /// Nothing placed yet
    #[default]
    None,
    /// Waiting for a buy order to fill
    Buy(PlacedOrder),
    /// Waiting for a sell order to fill
    Sell(PlacedOrder),
}

impl OrderState {
    /// Side of the remembered order, `None` before the first order
    pub fn side(&self) -> Option<OrderSide> {
        match self {
            OrderState::None => None,
            OrderState::Buy(_) => Some(OrderSide::Buy),
            OrderState::Sell(_) => Some(OrderSide::Sell),
        }
    }

    pub fn order(&self) -> Option<&PlacedOrder> {
        match self {
            OrderState::None => None,
            OrderState::Buy(order) | OrderState::Sell(order) => Some(order),
        }
    }

    pub fn id(&self) -> Option<&OrderId> {
        self.order().map(|o| &o.id)
    }

    pub fn price(&self) -> Decimal {
        self.order().map(|o| o.price).unwrap_or(Decimal::ZERO)
    }

    pub fn quantity(&self) -> Decimal {
        self.order().map(|o| o.quantity).unwrap_or(Decimal::ZERO)
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side = self
            .side()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "NONE".to_string());
        let id = self.id().map(OrderId::as_str).unwrap_or("-");
        write!(
            f,
            "OrderState [id={}, side={}, price={}, quantity={}]",
            id,
            side,
            self.price(),
            self.quantity()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_initial_state_has_no_order() {
        let state = OrderState::default();
        assert_eq!(state.side(), None);
        assert!(state.id().is_none());
        assert_eq!(state.price(), Decimal::ZERO);
        assert_eq!(state.quantity(), Decimal::ZERO);
        assert_eq!(
            state.to_string(),
            "OrderState [id=-, side=NONE, price=0, quantity=0]"
        );
    }

    #[test]
    fn test_placed_order_view() {
        let state = OrderState::Sell(PlacedOrder::new(
            OrderId::new("42"),
            dec!(0.00496860),
            dec!(20000),
        ));
        assert_eq!(state.side(), Some(OrderSide::Sell));
        assert_eq!(state.id().map(OrderId::as_str), Some("42"));
        assert_eq!(state.price(), dec!(0.00496860));
        assert_eq!(state.quantity(), dec!(20000));
    }
}
