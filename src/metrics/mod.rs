pub mod summary;
pub mod timeseries;

pub use summary::{Metrics, METRIC_COLUMNS, TRADING_DAYS_PER_YEAR};
pub use timeseries::{
    cumulative_curve, cumulative_returns, drawdowns, max_drawdown, running_max, CumulativePoint,
    MissingReturns, ReturnSeries,
};
