use crate::data::{PriceSeries, SignalSeries};
use crate::strategy::{rolling_sma, Strategy};

//sma crossover strategy
//long while the fast sma is above the slow sma, short while below
//flat when they are equal or before the slow window fills
#[derive(Debug, Clone)]
pub struct SmaCrossoverStrategy {
    fast_window: usize,
    slow_window: usize,
}

impl SmaCrossoverStrategy {
    pub fn new(fast_window: usize, slow_window: usize) -> Self {
        SmaCrossoverStrategy {
            fast_window,
            slow_window,
        }
    }

    //position implied by one pair of averages
    fn position(fast_sma: f64, slow_sma: f64) -> f64 {
        if fast_sma > slow_sma {
            1.0
        } else if fast_sma < slow_sma {
            -1.0
        } else {
            0.0
        }
    }
}

impl Strategy for SmaCrossoverStrategy {
    fn generate_signals(&self, prices: &PriceSeries) -> SignalSeries {
        let closes = prices.closes();
        let fast = rolling_sma(&closes, self.fast_window);
        let slow = rolling_sma(&closes, self.slow_window);

        fast.into_iter()
            .zip(slow)
            .map(|averages| match averages {
                (Some(fast_sma), Some(slow_sma)) => Self::position(fast_sma, slow_sma),
                _ => 0.0,
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn name(&self) -> &str {
        "SMA Crossover"
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
    fn test_signals_follow_trend() {
        let strategy = SmaCrossoverStrategy::new(1, 3);
        let signals = strategy.generate_signals(&prices(&[10.0, 11.0, 12.0, 13.0, 9.0, 8.0]));

        //warm-up for the first two bars, then long on the rise and short on the fall
        assert_eq!(signals.values(), &[0.0, 0.0, 1.0, 1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_flat_prices_give_flat_signal() {
        let strategy = SmaCrossoverStrategy::new(2, 3);
        let signals = strategy.generate_signals(&prices(&[5.0; 5]));
        assert!(signals.values().iter().all(|&s| s == 0.0));
        assert_eq!(signals.len(), 5);
    }
}
