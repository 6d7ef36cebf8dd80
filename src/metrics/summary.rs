use crate::metrics::timeseries::{
    cumulative_returns, drawdowns, max_drawdown, MissingReturns, ReturnSeries,
};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//trading days used to annualize daily statistics
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

//column names of the exported metrics table, in order
pub const METRIC_COLUMNS: [&str; 4] = [
    "Total Return",
    "Annualized Return",
    "Max Drawdown",
    "Sharpe Ratio",
];

//summary metrics for a backtest
//undefined statistics are NaN rather than an error
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
}

impl Metrics {
    //calculate summary metrics from a return series
    pub fn from_returns(returns: &ReturnSeries) -> Self {
        let filled = returns.treated(MissingReturns::FillZero);
        let observed = returns.treated(MissingReturns::Exclude);

        let total_return = filled.iter().sum::<f64>();
        let annualized_return = annualized_return(&observed);
        let max_dd = max_drawdown(&drawdowns(&cumulative_returns(&filled)));
        let sharpe = calculate_sharpe_ratio(&observed);

        Metrics {
            total_return,
            annualized_return,
            max_drawdown: max_dd,
            sharpe_ratio: sharpe,
        }
    }

    //values in METRIC_COLUMNS order
    pub fn values(&self) -> [f64; 4] {
        [
            self.total_return,
            self.annualized_return,
            self.max_drawdown,
            self.sharpe_ratio,
        ]
    }

    //names of the metrics that are not finite numbers
    pub fn undefined(&self) -> Vec<&'static str> {
        METRIC_COLUMNS
            .iter()
            .zip(self.values())
            .filter(|(_, value)| !value.is_finite())
            .map(|(name, _)| *name)
            .collect()
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        table.add_row(Row::new(vec![
            Cell::new("Total Return"),
            Cell::new(&format_pct(self.total_return)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Annualized Return"),
            Cell::new(&format_pct(self.annualized_return)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Max Drawdown"),
            Cell::new(&format_pct(self.max_drawdown)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Sharpe Ratio"),
            Cell::new(&format!("{:.3}", self.sharpe_ratio)),
        ]));

        table.printstd();
    }
}

fn format_pct(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}%", value * 100.0)
    } else {
        format!("{}", value)
    }
}

fn annualized_return(returns: &[f64]) -> f64 {
    //mean of an empty slice is NaN
    returns.mean() * TRADING_DAYS_PER_YEAR
}

fn calculate_sharpe_ratio(returns: &[f64]) -> f64 {
    let mean = returns.mean();
    //sample standard deviation, NaN below two observations
    let std_dev = returns.std_dev();

    if std_dev == 0.0 || std_dev.is_nan() {
        return f64::NAN;
    }

    (mean / std_dev) * TRADING_DAYS_PER_YEAR.sqrt()
}
