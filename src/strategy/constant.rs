use crate::data::{PriceSeries, SignalSeries};
use crate::strategy::Strategy;

//holds the same position every period
//weight 1.0 is buy and hold, -1.0 a permanent short
#[derive(Debug, Clone)]
pub struct ConstantPositionStrategy {
    weight: f64,
}

impl ConstantPositionStrategy {
    pub fn new(weight: f64) -> Self {
        ConstantPositionStrategy { weight }
    }

    pub fn buy_and_hold() -> Self {
        Self::new(1.0)
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl Strategy for ConstantPositionStrategy {
    fn generate_signals(&self, prices: &PriceSeries) -> SignalSeries {
        SignalSeries::constant(self.weight, prices.len())
    }

    fn name(&self) -> &str {
        if self.weight == 0.0 {
            "Flat"
        } else if self.weight > 0.0 {
            "Buy and Hold"
        } else {
            "Constant Short"
        }
    }
}
