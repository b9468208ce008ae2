use rust_decimal::Decimal;
use tracing::info;

use crate::common::errors::Result;
use crate::common::traits::TradingApi;
use crate::common::types::Market;

/// Fee rates an exchange charges on a market, as fractions of order value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub buy_fee_rate: Decimal,
    pub sell_fee_rate: Decimal,
}

impl FeeSchedule {
    pub fn new(buy_fee_rate: Decimal, sell_fee_rate: Decimal) -> Self {
        Self {
            buy_fee_rate,
            sell_fee_rate,
        }
    }

    /// Look up both fee rates for `market`
    pub async fn fetch<A>(api: &A, market: &Market) -> Result<Self>
    where
        A: TradingApi + ?Sized,
    {
        let buy_fee_rate = api.get_buy_fee_rate(&market.id).await?;
        info!(market = %market.name, %buy_fee_rate, "Exchange fee for buy order");

        let sell_fee_rate = api.get_sell_fee_rate(&market.id).await?;
        info!(market = %market.name, %sell_fee_rate, "Exchange fee for sell order");

        Ok(Self::new(buy_fee_rate, sell_fee_rate))
    }

    /// Fraction to add to a buy price so a resale covers both fees and `profit_margin`
    pub fn total_markup(&self, profit_margin: Decimal) -> Decimal {
        profit_margin + self.buy_fee_rate + self.sell_fee_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::ExchangeError;
    use crate::common::traits::MockTradingApi;
    use rust_decimal_macros::dec;

    fn market() -> Market {
        Market::new("ltcbtc", "LTC/BTC", "LTC", "BTC")
    }

    #[tokio::test]
    async fn test_fetch_reads_both_rates() {
        let mut api = MockTradingApi::new();
        api.expect_get_buy_fee_rate()
            .withf(|m| m == "ltcbtc")
            .returning(|_| Ok(dec!(0.002)));
        api.expect_get_sell_fee_rate()
            .withf(|m| m == "ltcbtc")
            .returning(|_| Ok(dec!(0.0025)));

        let fees = FeeSchedule::fetch(&api, &market()).await.unwrap();
        assert_eq!(fees, FeeSchedule::new(dec!(0.002), dec!(0.0025)));
        assert_eq!(fees.total_markup(dec!(0.01)), dec!(0.0145));
    }

    #[tokio::test]
    async fn test_fetch_stops_at_first_failure() {
        let mut api = MockTradingApi::new();
        api.expect_get_buy_fee_rate()
            .returning(|_| Err(ExchangeError::Timeout("fees".into())));
        api.expect_get_sell_fee_rate().never();

        let err = FeeSchedule::fetch(&api, &market()).await.unwrap_err();
        assert!(err.is_transient());
    }
}
