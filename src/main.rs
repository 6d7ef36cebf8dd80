use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use signal_backtest::prelude::*;
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser)]
#[command(name = "signal-backtest")]
#[command(about = "Evaluates a trading signal against a daily price series", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a backtest from command line flags
    Run {
        //path to csv data file with date and close columns
        #[arg(long)]
        data: PathBuf,

        //ticker to evaluate (also filters a symbol column if present)
        #[arg(long)]
        ticker: String,

        //strategy type (sma, rsi, hold)
        #[arg(long)]
        strategy: String,

        //first date to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        //last date to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        //sma strategy parameters
        //fast sma window (for sma strategy)
        #[arg(long)]
        fast: Option<usize>,

        //slow sma window (for sma strategy)
        #[arg(long)]
        slow: Option<usize>,

        //rsi strategy parameters
        //rsi lookback period (for rsi strategy)
        #[arg(long)]
        rsi_lookback: Option<usize>,

        //rsi lower threshold (for rsi strategy)
        #[arg(long)]
        rsi_lower: Option<f64>,

        //rsi upper threshold (for rsi strategy)
        #[arg(long)]
        rsi_upper: Option<f64>,

        //position weight (for hold strategy)
        #[arg(long)]
        weight: Option<f64>,

        //output options
        //directory for the plot (and the default metrics csv)
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        //output path for metrics csv
        #[arg(long)]
        metrics_csv: Option<PathBuf>,
    },

    //run a backtest described by a JSON configuration file
    RunConfig {
        //path to the configuration file
        path: PathBuf,
    },

    //write a default JSON configuration file
    InitConfig {
        //where to write the configuration
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("signal_backtest=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data,
            ticker,
            strategy,
            start,
            end,
            fast,
            slow,
            rsi_lookback,
            rsi_lower,
            rsi_upper,
            weight,
            output_dir,
            metrics_csv,
        } => {
            let strategy_type = StrategyType::parse(&strategy)
                .ok_or_else(|| anyhow::anyhow!("Unknown strategy: {}", strategy))?;

            let strategy_params = match StrategyParams::defaults_for(strategy_type) {
                StrategyParams::Sma(defaults) => StrategyParams::Sma(SmaParams {
                    fast_window: fast.unwrap_or(defaults.fast_window),
                    slow_window: slow.unwrap_or(defaults.slow_window),
                }),
                StrategyParams::Rsi(defaults) => StrategyParams::Rsi(RsiParams {
                    lookback: rsi_lookback.unwrap_or(defaults.lookback),
                    oversold: rsi_lower.unwrap_or(defaults.oversold),
                    overbought: rsi_upper.unwrap_or(defaults.overbought),
                }),
                StrategyParams::Constant(defaults) => StrategyParams::Constant(ConstantParams {
                    weight: weight.unwrap_or(defaults.weight),
                }),
            };

            let config = BacktestConfiguration {
                data_path: data,
                ticker,
                start_date: start,
                end_date: end,
                strategy_type,
                strategy_params,
                output_dir,
                metrics_path: metrics_csv,
            };
            config.validate()?;

            run_backtest(&config)?;
        }
        Commands::RunConfig { path } => {
            let config = BacktestConfiguration::from_json_file(&path)?;
            run_backtest(&config)?;
        }
        Commands::InitConfig { path } => {
            BacktestConfiguration::default().to_json_file(&path)?;
            println!("Default configuration written to {:?}", path);
        }
    }

    Ok(())
}

fn run_backtest(config: &BacktestConfiguration) -> Result<()> {
    println!("Signal Backtest Evaluator");
    println!("=========================\n");

    //load data
    println!("Loading data from {:?}...", config.data_path);
    let records = load_csv(&config.data_path)
        .context(format!("Failed to load data from {:?}", config.data_path))?;

    //filter by ticker, clean, and restrict to the requested window
    let records = filter_by_symbol(&records, &config.ticker);
    let prices = clean_prices(&records)?.between(config.start_date, config.end_date);

    let (first, last) = match (prices.first_date(), prices.last_date()) {
        (Some(first), Some(last)) if prices.len() >= 2 => (first, last),
        _ => anyhow::bail!(
            "Need at least two prices for {} in the requested window, found {}",
            config.ticker,
            prices.len()
        ),
    };

    println!("Loaded {} prices for {}", prices.len(), config.ticker);
    println!("Date range: {} to {}\n", first, last);

    //create strategy
    let strategy = config.build_strategy();
    println!("Strategy: {} ({:?})\n", strategy.name(), config.strategy_params);

    //run backtest
    let mut backtester = Backtester::new(prices, strategy);
    let metrics = *backtester.run()?;

    //display results
    println!("Backtest Results");
    println!("================\n");
    metrics.pretty_print_table();

    let undefined = metrics.undefined();
    if !undefined.is_empty() {
        warn!(metrics = ?undefined, "some metrics are undefined for this return series");
    }

    //save outputs
    std::fs::create_dir_all(&config.output_dir).context(format!(
        "Failed to create output directory {:?}",
        config.output_dir
    ))?;

    let labels = PlotLabels::new(&config.ticker, config.strategy_type.key(), first, last);
    let plot_path = save_plot(
        &backtester,
        &labels,
        &config.output_dir,
        &ChartConfig::default(),
    )?;
    println!("\nPlot saved to {:?}", plot_path);

    let metrics_path = config.resolved_metrics_path();
    save_metrics_csv(&metrics, &metrics_path)?;
    println!("Metrics saved to {:?}", metrics_path);

    Ok(())
}
