//! Scalping strategy: buy at the bid, resell at a fee-adjusted profit, repeat.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::common::errors::{ErrorClass, ExchangeError, StrategyError};
use crate::common::traits::TradingApi;
use crate::common::types::{Market, OrderSide};
use crate::config::types::StrategyConfig;
use crate::strategy::fees::FeeSchedule;
use crate::strategy::pricing::{self, PROFIT_MARGIN};
use crate::strategy::state::{OrderState, PlacedOrder};
use crate::strategy::traits::TradingStrategy;
use crate::strategy::types::{AskPosition, CycleOutcome, HoldReason, SkipReason};

/// Strategy config item holding the counter-currency amount spent on each buy
pub const BUY_ORDER_AMOUNT_KEY: &str = "counter-currency-buy-order-amount";

/// Single-market scalper that keeps exactly one order on the book.
///
/// Each cycle looks at the order book and at the last order it placed:
///
/// - no order yet: buy at the best bid
/// - buy filled: sell the same quantity at the buy price plus fees plus 1%
/// - sell filled: buy again at the best bid
/// - otherwise: hold
///
/// Fills are detected by the remembered order disappearing from our open
/// orders. Transient exchange failures end the cycle with no state change;
/// anything else is returned as a [`StrategyError`] and should stop the bot.
pub struct ScalpingStrategy {
    api: Arc<dyn TradingApi>,
    market: Market,
    /// Counter currency committed to each buy order
    buy_order_amount: Decimal,
    state: OrderState,
}

impl ScalpingStrategy {
    /// Create the strategy for `market`, reading the buy amount from `config`
    ///
    /// Fails if [`BUY_ORDER_AMOUNT_KEY`] is missing, not a number or not positive.
    pub fn init(
        api: Arc<dyn TradingApi>,
        market: Market,
        config: &StrategyConfig,
    ) -> Result<Self, StrategyError> {
        info!(market = %market.name, "Initialising trading strategy...");

        let buy_order_amount = parse_buy_order_amount(config)?;
        info!(
            market = %market.name,
            %buy_order_amount,
            "Buy order amount is {} {}",
            buy_order_amount,
            market.counter_currency
        );

        info!(market = %market.name, "Trading strategy initialised successfully");
        Ok(Self {
            api,
            market,
            buy_order_amount,
            state: OrderState::default(),
        })
    }

    /// The order remembered from previous cycles
    pub fn state(&self) -> &OrderState {
        &self.state
    }

    pub fn buy_order_amount(&self) -> Decimal {
        self.buy_order_amount
    }

    async fn run_cycle(&mut self) -> Result<CycleOutcome, ExchangeError> {
        let order_book = self.api.get_order_book(&self.market.id).await?;

        let (best_bid, best_ask) = match (order_book.best_bid(), order_book.best_ask()) {
            (None, _) => {
                warn!(
                    market = %self.market.name,
                    "Exchange returned empty buy orders. Ignoring this trade window"
                );
                return Ok(CycleOutcome::Skipped(SkipReason::EmptyBids));
            }
            (_, None) => {
                warn!(
                    market = %self.market.name,
                    "Exchange returned empty sell orders. Ignoring this trade window"
                );
                return Ok(CycleOutcome::Skipped(SkipReason::EmptyAsks));
            }
            (Some(bid), Some(ask)) => (bid.price, ask.price),
        };

        info!(
            market = %self.market.name,
            %best_bid,
            %best_ask,
            spread = %order_book.spread().unwrap_or_default(),
            "Current BID and ASK prices"
        );
        info!(market = %self.market.name, "Last order was: {}", self.state);

        match self.state.clone() {
            OrderState::None => self.on_no_order(best_bid).await,
            OrderState::Buy(order) => self.on_buy_order(order).await,
            OrderState::Sell(order) => self.on_sell_order(order, best_bid, best_ask).await,
        }
    }

    /// First activation: open with a buy at the best bid.
    async fn on_no_order(&mut self, best_bid: Decimal) -> Result<CycleOutcome, ExchangeError> {
        info!(
            market = %self.market.name,
            %best_bid,
            "No order placed yet - placing initial BUY order"
        );
        self.place_buy(best_bid).await
    }

    async fn on_buy_order(&mut self, order: PlacedOrder) -> Result<CycleOutcome, ExchangeError> {
        if !self.is_filled(&order).await? {
            info!(
                market = %self.market.name,
                id = %order.id,
                price = %order.price,
                "Still have BUY order waiting to fill - holding"
            );
            return Ok(CycleOutcome::Holding(HoldReason::BuyNotFilled));
        }

        info!(market = %self.market.name, id = %order.id, price = %order.price, "BUY order filled");

        let fees = FeeSchedule::fetch(self.api.as_ref(), &self.market).await?;
        info!(
            market = %self.market.name,
            profit_margin = %PROFIT_MARGIN,
            total_markup = %fees.total_markup(PROFIT_MARGIN),
            "Calculating new ask price"
        );
        let ask_price = pricing::ask_from_buy(
            order.price,
            PROFIT_MARGIN,
            fees.buy_fee_rate,
            fees.sell_fee_rate,
        );

        info!(market = %self.market.name, %ask_price, "Sending new SELL order to exchange");
        let id = self
            .api
            .submit_order(&self.market.id, OrderSide::Sell, order.quantity, ask_price)
            .await?;
        info!(market = %self.market.name, %id, "New SELL order sent successfully");

        let placed = PlacedOrder::new(id, ask_price, order.quantity);
        self.state = OrderState::Sell(placed.clone());
        Ok(placed_outcome(OrderSide::Sell, placed))
    }

    async fn on_sell_order(
        &mut self,
        order: PlacedOrder,
        best_bid: Decimal,
        best_ask: Decimal,
    ) -> Result<CycleOutcome, ExchangeError> {
        if self.is_filled(&order).await? {
            info!(market = %self.market.name, id = %order.id, price = %order.price, "SELL order filled");
            return self.place_buy(best_bid).await;
        }

        let position = AskPosition::classify(best_ask, order.price);
        match position {
            AskPosition::BelowOurAsk => info!(
                market = %self.market.name,
                %best_ask,
                our_ask = %order.price,
                "Current ask is LOWER than our SELL price - holding"
            ),
            AskPosition::AtOurAsk => info!(
                market = %self.market.name,
                %best_ask,
                our_ask = %order.price,
                "Current ask is EQUAL to our SELL price - holding"
            ),
            AskPosition::AboveOurAsk => error!(
                market = %self.market.name,
                %best_ask,
                our_ask = %order.price,
                id = %order.id,
                "Current ask is HIGHER than our open SELL price - order book and open orders disagree, holding"
            ),
        }
        Ok(CycleOutcome::Holding(HoldReason::SellNotFilled(position)))
    }

    async fn place_buy(&mut self, best_bid: Decimal) -> Result<CycleOutcome, ExchangeError> {
        let quantity =
            pricing::quantity_for_budget(self.api.as_ref(), &self.market, self.buy_order_amount)
                .await?;

        info!(
            market = %self.market.name,
            %quantity,
            price = %best_bid,
            "Sending new BUY order to exchange"
        );
        let id = self
            .api
            .submit_order(&self.market.id, OrderSide::Buy, quantity, best_bid)
            .await?;
        info!(market = %self.market.name, %id, "New BUY order sent successfully");

        let placed = PlacedOrder::new(id, best_bid, quantity);
        self.state = OrderState::Buy(placed.clone());
        Ok(placed_outcome(OrderSide::Buy, placed))
    }

    /// An order is filled once it no longer shows up in our open orders
    async fn is_filled(&self, order: &PlacedOrder) -> Result<bool, ExchangeError> {
        let open_orders = self.api.get_open_orders(&self.market.id).await?;
        Ok(!open_orders.iter().any(|open| open.id == order.id))
    }

    fn on_exchange_error(&self, err: ExchangeError) -> Result<CycleOutcome, StrategyError> {
        match err.class() {
            ErrorClass::Transient => {
                error!(
                    market = %self.market.name,
                    error = %err,
                    "Exchange call failed with a network error. Waiting until next trade cycle. Last order: {}",
                    self.state
                );
                Ok(CycleOutcome::Deferred)
            }
            ErrorClass::NonRecoverable => {
                error!(
                    market = %self.market.name,
                    error = %err,
                    "Exchange call failed with an API error. Telling trading engine to shut down bot! Last order: {}",
                    self.state
                );
                Err(StrategyError::Exchange(err))
            }
        }
    }
}

#[async_trait]
impl TradingStrategy for ScalpingStrategy {
    fn name(&self) -> &str {
        "scalping"
    }

    async fn execute(&mut self) -> Result<CycleOutcome, StrategyError> {
        info!(market = %self.market.name, "Checking order status...");

        match self.run_cycle().await {
            Ok(outcome) => Ok(outcome),
            Err(err) => self.on_exchange_error(err),
        }
    }
}

fn placed_outcome(side: OrderSide, order: PlacedOrder) -> CycleOutcome {
    CycleOutcome::Placed {
        side,
        id: order.id,
        price: order.price,
        quantity: order.quantity,
    }
}

fn parse_buy_order_amount(config: &StrategyConfig) -> Result<Decimal, StrategyError> {
    let raw = config.get(BUY_ORDER_AMOUNT_KEY).ok_or_else(|| {
        StrategyError::Configuration(format!(
            "Mandatory {} value missing in strategy config",
            BUY_ORDER_AMOUNT_KEY
        ))
    })?;

    let amount = Decimal::from_str(raw.trim()).map_err(|e| {
        StrategyError::Configuration(format!(
            "{} value '{}' is not a number: {}",
            BUY_ORDER_AMOUNT_KEY, raw, e
        ))
    })?;

    if amount <= Decimal::ZERO {
        return Err(StrategyError::Configuration(format!(
            "{} must be positive, got {}",
            BUY_ORDER_AMOUNT_KEY, amount
        )));
    }

    Ok(amount)
}
