pub mod constant;
pub mod rsi_reversion;
pub mod sma_crossover;

use crate::data::{PriceSeries, SignalSeries};

//strategy interface that all signal generators must implement
pub trait Strategy: Send {
    //maps a price series to one position signal per date
    fn generate_signals(&self, prices: &PriceSeries) -> SignalSeries;

    //returns the strategy name
    fn name(&self) -> &str;
}

//helper function to calculate simple moving average
pub fn sma(prices: &[f64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    Some(prices.iter().sum::<f64>() / prices.len() as f64)
}

//sma over the window ending at each index, None until the window fills
pub fn rolling_sma(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..prices.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                None
            } else {
                sma(&prices[i + 1 - window..=i])
            }
        })
        .collect()
}

//helper function to calculate relative strength index
pub fn rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }

    let mut gains = Vec::new();
    let mut losses = Vec::new();

    for i in 1..prices.len() {
        let change = prices[i] - prices[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    let avg_gain: f64 = gains.iter().rev().take(period).sum::<f64>() / period as f64;
    let avg_loss: f64 = losses.iter().rev().take(period).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}
