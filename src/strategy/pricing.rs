//! Order quantity and price arithmetic
//!
//! Exchanges quote to 8 decimal places. Quantities are rounded half-down so a
//! buy never commits noticeably more than the budget; ask prices are rounded
//! half-up so rounding never eats into the margin.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::info;

use crate::common::errors::{ExchangeError, Result};
use crate::common::traits::TradingApi;
use crate::common::types::Market;

/// Decimal places used for order prices and quantities
pub const PRICE_SCALE: u32 = 8;

/// Profit added on top of fees when reselling a filled buy (1%)
pub const PROFIT_MARGIN: Decimal = dec!(0.01);

/// Quantity of base currency that `budget` buys at `last_trade_price`
///
/// Fails with [`ExchangeError::InvalidResponse`] when the price is not
/// positive, since no sensible order can be sized from it.
pub fn quantity_at_price(budget: Decimal, last_trade_price: Decimal) -> Result<Decimal> {
    if last_trade_price <= Decimal::ZERO {
        return Err(ExchangeError::InvalidResponse(format!(
            "Last trade price must be positive, got {}",
            last_trade_price
        )));
    }

    let quantity = budget.checked_div(last_trade_price).ok_or_else(|| {
        ExchangeError::InvalidResponse(format!(
            "Cannot size order: {} / {} overflows",
            budget, last_trade_price
        ))
    })?;

    Ok(to_scale(quantity, RoundingStrategy::MidpointTowardZero))
}

/// Fetch the last trade price and size a buy order for `budget`
///
/// Exchange failures are returned unchanged; retrying is the caller's decision.
pub async fn quantity_for_budget<A>(api: &A, market: &Market, budget: Decimal) -> Result<Decimal>
where
    A: TradingApi + ?Sized,
{
    info!(market = %market.name, %budget, "Calculating amount of {} to buy", market.base_currency);

    let last_trade_price = api.get_last_trade_price(&market.id).await?;
    info!(
        market = %market.name,
        %last_trade_price,
        "Last trade price for 1 {} was {} {}",
        market.base_currency,
        last_trade_price,
        market.counter_currency
    );

    let quantity = quantity_at_price(budget, last_trade_price)?;
    info!(market = %market.name, %quantity, "Amount of {} to BUY", market.base_currency);

    Ok(quantity)
}

/// Ask price that covers both fees and the profit margin on top of `buy_price`
pub fn ask_from_buy(
    buy_price: Decimal,
    profit_margin: Decimal,
    buy_fee: Decimal,
    sell_fee: Decimal,
) -> Decimal {
    let markup = Decimal::ONE + profit_margin + buy_fee + sell_fee;
    to_scale(buy_price * markup, RoundingStrategy::MidpointAwayFromZero)
}

fn to_scale(value: Decimal, strategy: RoundingStrategy) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(PRICE_SCALE, strategy);
    rounded.rescale(PRICE_SCALE);
    rounded
}
