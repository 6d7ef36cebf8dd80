//output sinks for a finished backtest: the cumulative return chart and the
//one-row metrics table

pub mod glyphs;
pub mod plot;
pub mod table;

pub use plot::{render_chart, save_plot, ChartConfig};
pub use table::{save_metrics_csv, write_metrics};

use crate::data::PriceSeries;
use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Backtest has not been run yet")]
    NotEvaluated,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

//labels identifying one backtest run on a chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotLabels {
    pub ticker: String,
    pub strategy_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PlotLabels {
    pub fn new(
        ticker: impl Into<String>,
        strategy_name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        PlotLabels {
            ticker: ticker.into(),
            strategy_name: strategy_name.into(),
            start_date,
            end_date,
        }
    }

    //labels spanning the first and last dates of a series
    pub fn for_series(
        ticker: impl Into<String>,
        strategy_name: impl Into<String>,
        prices: &PriceSeries,
    ) -> Option<Self> {
        Some(Self::new(
            ticker,
            strategy_name,
            prices.first_date()?,
            prices.last_date()?,
        ))
    }

    //plot_{ticker}_{strategy}_{startYear}-{endYear}.png
    pub fn file_name(&self) -> String {
        format!(
            "plot_{}_{}_{}-{}.png",
            file_component(&self.ticker),
            file_component(&self.strategy_name),
            self.start_date.year(),
            self.end_date.year()
        )
    }

    //{ticker} | {strategy} | {start} to {end}
    pub fn title(&self) -> String {
        format!(
            "{} | {} | {} to {}",
            self.ticker,
            self.strategy_name,
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }
}

//keeps a label usable as a single path component
fn file_component(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(strategy: &str) -> PlotLabels {
        PlotLabels::new(
            "AAPL",
            strategy,
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 29).unwrap(),
        )
    }

    #[test]
    fn test_file_name_uses_years() {
        assert_eq!(labels("sma").file_name(), "plot_AAPL_sma_2020-2023.png");
    }

    #[test]
    fn test_file_name_sanitizes_separators() {
        assert_eq!(
            labels("SMA Crossover/v2").file_name(),
            "plot_AAPL_SMA_Crossover_v2_2020-2023.png"
        );
    }

    #[test]
    fn test_title() {
        assert_eq!(
            labels("sma").title(),
            "AAPL | sma | 2020-01-02 to 2023-12-29"
        );
    }

    #[test]
    fn test_for_series_needs_dates() {
        let empty = PriceSeries::new(vec![]).unwrap();
        assert!(PlotLabels::for_series("X", "hold", &empty).is_none());
    }
}
