use crate::data::{PriceSeries, SignalSeries};
use crate::metrics::{cumulative_curve, CumulativePoint, Metrics, ReturnSeries};
use crate::strategy::Strategy;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("At least two prices are required to realize a return, got {len}")]
    TooFewPrices { len: usize },
    #[error("Misaligned series: {prices} prices but {signals} signals")]
    MisalignedSeries { prices: usize, signals: usize },
}

//everything one evaluation produces
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub signals: SignalSeries,
    pub returns: ReturnSeries,
    pub metrics: Metrics,
}

//per-period strategy returns
//entry i realizes the move from close i to close i + 1 scaled by signal i,
//the final entry has no next close and is missing
//a signal series one shorter than the prices is accepted since the final
//signal never realizes a return
pub fn compute_returns(
    prices: &PriceSeries,
    signals: &SignalSeries,
) -> Result<ReturnSeries, EvalError> {
    let len = prices.len();
    if len < 2 {
        return Err(EvalError::TooFewPrices { len });
    }
    if signals.len() != len && signals.len() + 1 != len {
        return Err(EvalError::MisalignedSeries {
            prices: len,
            signals: signals.len(),
        });
    }

    let closes = prices.closes();
    let mut values: Vec<Option<f64>> = closes
        .windows(2)
        .zip(signals.values())
        .map(|(pair, &signal)| {
            let realized = (pair[1] / pair[0] - 1.0) * signal;
            //a NaN signal leaves the period unrealized
            Some(realized).filter(|r| !r.is_nan())
        })
        .collect();
    values.push(None);

    Ok(ReturnSeries::new(prices.dates(), values))
}

//evaluates a fixed signal series against prices
pub fn evaluate(prices: &PriceSeries, signals: SignalSeries) -> Result<Evaluation, EvalError> {
    let returns = compute_returns(prices, &signals)?;
    let metrics = Metrics::from_returns(&returns);

    Ok(Evaluation {
        signals,
        returns,
        metrics,
    })
}

//evaluates one strategy over one price series
pub struct Backtester {
    prices: PriceSeries,
    strategy: Box<dyn Strategy>,
    evaluation: Option<Evaluation>,
}

impl Backtester {
    pub fn new(prices: PriceSeries, strategy: Box<dyn Strategy>) -> Self {
        Backtester {
            prices,
            strategy,
            evaluation: None,
        }
    }

    //generates signals and recomputes returns and metrics
    //on error the previous evaluation is left in place
    pub fn run(&mut self) -> Result<&Metrics, EvalError> {
        debug!(
            strategy = self.strategy.name(),
            prices = self.prices.len(),
            "running backtest"
        );

        let signals = self.strategy.generate_signals(&self.prices);
        let evaluation = evaluate(&self.prices, signals)?;

        info!(
            strategy = self.strategy.name(),
            periods = evaluation.returns.observed_count(),
            total_return = evaluation.metrics.total_return,
            sharpe_ratio = evaluation.metrics.sharpe_ratio,
            "backtest complete"
        );

        let evaluation = self.evaluation.insert(evaluation);
        Ok(&evaluation.metrics)
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.evaluation.as_ref().map(|e| &e.metrics)
    }

    pub fn returns(&self) -> Option<&ReturnSeries> {
        self.evaluation.as_ref().map(|e| &e.returns)
    }

    pub fn signals(&self) -> Option<&SignalSeries> {
        self.evaluation.as_ref().map(|e| &e.signals)
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    //cumulative growth of one unit, rebuilt from the returns on each call
    pub fn cumulative_returns(&self) -> Option<Vec<CumulativePoint>> {
        self.returns().map(cumulative_curve)
    }

    pub fn prices(&self) -> &PriceSeries {
        &self.prices
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }
}
