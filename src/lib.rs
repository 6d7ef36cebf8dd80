//a Rust-based signal backtest evaluator for daily price series

pub mod config;
pub mod data;
pub mod engine;
pub mod metrics;
pub mod report;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        BacktestConfiguration, ConstantParams, RsiParams, SmaParams, StrategyParams, StrategyType,
    };
    pub use crate::data::{
        clean_prices, filter_by_symbol, load_csv, PricePoint, PriceRecord, PriceSeries,
        SignalSeries,
    };
    pub use crate::engine::{compute_returns, evaluate, Backtester, EvalError, Evaluation};
    pub use crate::metrics::{CumulativePoint, Metrics, MissingReturns, ReturnSeries};
    pub use crate::report::{save_metrics_csv, save_plot, ChartConfig, PlotLabels, ReportError};
    pub use crate::strategy::{
        constant::ConstantPositionStrategy, rsi_reversion::RsiReversionStrategy,
        sma_crossover::SmaCrossoverStrategy, Strategy,
    };
}
