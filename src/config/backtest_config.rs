use crate::strategy::{
    constant::ConstantPositionStrategy, rsi_reversion::RsiReversionStrategy,
    sma_crossover::SmaCrossoverStrategy, Strategy,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

//strategy type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyType {
    SmaCrossover,
    RsiReversion,
    Constant,
}

impl StrategyType {
    //parse strategy type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sma" | "sma_crossover" => Some(StrategyType::SmaCrossover),
            "rsi" | "rsi_reversion" => Some(StrategyType::RsiReversion),
            "hold" | "constant" | "buy_and_hold" => Some(StrategyType::Constant),
            _ => None,
        }
    }

    //short key used on the command line and in output file names
    pub fn key(&self) -> &'static str {
        match self {
            StrategyType::SmaCrossover => "sma",
            StrategyType::RsiReversion => "rsi",
            StrategyType::Constant => "hold",
        }
    }
}

//sma crossover strategy parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmaParams {
    pub fast_window: usize,
    pub slow_window: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        SmaParams {
            fast_window: 20,
            slow_window: 50,
        }
    }
}

//rsi reversion strategy parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiParams {
    pub lookback: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        RsiParams {
            lookback: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

//constant position parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantParams {
    pub weight: f64,
}

impl Default for ConstantParams {
    fn default() -> Self {
        ConstantParams { weight: 1.0 }
    }
}

//strategy-specific parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StrategyParams {
    Sma(SmaParams),
    Rsi(RsiParams),
    Constant(ConstantParams),
}

impl StrategyParams {
    //default parameters for a strategy type
    pub fn defaults_for(strategy_type: StrategyType) -> Self {
        match strategy_type {
            StrategyType::SmaCrossover => StrategyParams::Sma(SmaParams::default()),
            StrategyType::RsiReversion => StrategyParams::Rsi(RsiParams::default()),
            StrategyType::Constant => StrategyParams::Constant(ConstantParams::default()),
        }
    }
}

//complete backtest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfiguration {
    //data
    pub data_path: PathBuf,
    pub ticker: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    //strategy
    pub strategy_type: StrategyType,
    pub strategy_params: StrategyParams,

    //outputs
    pub output_dir: PathBuf,
    #[serde(default)]
    pub metrics_path: Option<PathBuf>,
}

impl Default for BacktestConfiguration {
    fn default() -> Self {
        BacktestConfiguration {
            data_path: PathBuf::from("data.csv"),
            ticker: "SPY".to_string(),
            start_date: None,
            end_date: None,
            strategy_type: StrategyType::SmaCrossover,
            strategy_params: StrategyParams::Sma(SmaParams::default()),
            output_dir: PathBuf::from("output"),
            metrics_path: None,
        }
    }
}

impl BacktestConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file {:?}", path))?;
        let config: BacktestConfiguration = serde_json::from_str(&contents)
            .context(format!("Failed to parse config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).context(format!("Failed to write config file {:?}", path))?;
        Ok(())
    }

    //checks parameter consistency
    pub fn validate(&self) -> Result<()> {
        let matches = matches!(
            (self.strategy_type, &self.strategy_params),
            (StrategyType::SmaCrossover, StrategyParams::Sma(_))
                | (StrategyType::RsiReversion, StrategyParams::Rsi(_))
                | (StrategyType::Constant, StrategyParams::Constant(_))
        );
        if !matches {
            anyhow::bail!(
                "Strategy parameters do not match strategy type {:?}",
                self.strategy_type
            );
        }

        match &self.strategy_params {
            StrategyParams::Sma(p) => {
                if p.fast_window == 0 || p.slow_window == 0 {
                    anyhow::bail!("SMA windows must be positive");
                }
                if p.fast_window >= p.slow_window {
                    anyhow::bail!(
                        "Fast window ({}) must be shorter than slow window ({})",
                        p.fast_window,
                        p.slow_window
                    );
                }
            }
            StrategyParams::Rsi(p) => {
                if p.lookback == 0 {
                    anyhow::bail!("RSI lookback must be positive");
                }
                if p.oversold >= p.overbought {
                    anyhow::bail!(
                        "RSI oversold ({}) must be below overbought ({})",
                        p.oversold,
                        p.overbought
                    );
                }
            }
            StrategyParams::Constant(p) => {
                if !p.weight.is_finite() {
                    anyhow::bail!("Constant weight must be finite");
                }
            }
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                anyhow::bail!("Start date {} is after end date {}", start, end);
            }
        }

        Ok(())
    }

    //creates the configured strategy
    pub fn build_strategy(&self) -> Box<dyn Strategy> {
        match &self.strategy_params {
            StrategyParams::Sma(p) => {
                Box::new(SmaCrossoverStrategy::new(p.fast_window, p.slow_window))
            }
            StrategyParams::Rsi(p) => {
                Box::new(RsiReversionStrategy::new(p.lookback, p.oversold, p.overbought))
            }
            StrategyParams::Constant(p) => Box::new(ConstantPositionStrategy::new(p.weight)),
        }
    }

    //metrics csv path, defaulting to a file next to the plot
    pub fn resolved_metrics_path(&self) -> PathBuf {
        self.metrics_path.clone().unwrap_or_else(|| {
            self.output_dir.join(format!(
                "metrics_{}_{}.csv",
                self.ticker,
                self.strategy_type.key()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy_type() {
        assert_eq!(StrategyType::parse("SMA"), Some(StrategyType::SmaCrossover));
        assert_eq!(StrategyType::parse("rsi_reversion"), Some(StrategyType::RsiReversion));
        assert_eq!(StrategyType::parse("hold"), Some(StrategyType::Constant));
        assert_eq!(StrategyType::parse("macd"), None);
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = BacktestConfiguration {
            start_date: NaiveDate::from_ymd_opt(2021, 1, 4),
            strategy_type: StrategyType::RsiReversion,
            strategy_params: StrategyParams::Rsi(RsiParams::default()),
            ..Default::default()
        };
        config.to_json_file(&path).unwrap();

        let loaded = BacktestConfiguration::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validate_rejects_mismatched_params() {
        let config = BacktestConfiguration {
            strategy_type: StrategyType::Constant,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_windows() {
        let config = BacktestConfiguration {
            strategy_params: StrategyParams::Sma(SmaParams {
                fast_window: 50,
                slow_window: 20,
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(BacktestConfiguration::default().validate().is_ok());
    }

    #[test]
    fn test_default_metrics_path() {
        let config = BacktestConfiguration::default();
        assert_eq!(
            config.resolved_metrics_path(),
            PathBuf::from("output").join("metrics_SPY_sma.csv")
        );
    }
}
