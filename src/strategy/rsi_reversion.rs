use crate::data::{PriceSeries, SignalSeries};
use crate::strategy::{rsi, Strategy};

//rsi mean reversion strategy
//long when rsi drops below oversold threshold
//short when rsi rises above overbought threshold
#[derive(Debug, Clone)]
pub struct RsiReversionStrategy {
    lookback: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiReversionStrategy {
    pub fn new(lookback: usize, oversold: f64, overbought: f64) -> Self {
        RsiReversionStrategy {
            lookback,
            oversold,
            overbought,
        }
    }

    //default rsi strategy with standard parameters
    pub fn standard() -> Self {
        Self::new(14, 30.0, 70.0)
    }
}

impl Strategy for RsiReversionStrategy {
    fn generate_signals(&self, prices: &PriceSeries) -> SignalSeries {
        let closes = prices.closes();

        (0..closes.len())
            .map(|i| {
                //need lookback + 1 closes ending at i
                if i < self.lookback {
                    return 0.0;
                }
                match rsi(&closes[i - self.lookback..=i], self.lookback) {
                    Some(value) if value < self.oversold => 1.0,
                    Some(value) if value > self.overbought => -1.0,
                    _ => 0.0,
                }
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn name(&self) -> &str {
        "RSI Reversion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn prices(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<_> = start.iter_days().take(closes.len()).collect();
        PriceSeries::from_parts(&dates, closes).unwrap()
    }

    #[test]
    fn test_overbought_goes_short_and_oversold_goes_long() {
        let strategy = RsiReversionStrategy::new(2, 30.0, 70.0);
        let signals =
            strategy.generate_signals(&prices(&[10.0, 11.0, 12.0, 11.0, 10.0, 9.0, 10.0]));

        //index 2: two gains, rsi 100; index 5: two losses, rsi 0
        assert_eq!(signals.values()[..2], [0.0, 0.0]);
        assert_eq!(signals.values()[2], -1.0);
        assert_eq!(signals.values()[3], 0.0);
        assert_eq!(signals.values()[5], 1.0);
        assert_eq!(signals.len(), 7);
    }
}
