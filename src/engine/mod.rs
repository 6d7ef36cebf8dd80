pub mod backtest;

pub use backtest::{compute_returns, evaluate, Backtester, EvalError, Evaluation};
