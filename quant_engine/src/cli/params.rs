use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use market_data_ingestor::providers::alpaca_rest::params::{Adjustment, Feed};

use crate::indicators::IndicatorKind;
use crate::strategy::StrategyKind;

#[derive(Parser, Debug)]
#[command(name = "quantcli", version, about = "QuantCLI: A CLI tool for Quantitative Finance.")]
pub struct Cli {
    /// Path to a TOML config file (defaults to $QUANTCLI_CONFIG, then built-in defaults)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch historical data for a given symbol
    Fetch(FetchArgs),

    /// Calculate technical indicators
    Indicator(IndicatorArgs),

    /// Backtest a trading strategy
    Backtest(BacktestArgs),

    /// Generate a performance report
    Report(ReportArgs),
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Stock symbol to fetch data for
    #[arg(long)]
    pub symbol: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// End date (YYYY-MM-DD), exclusive
    #[arg(long)]
    pub end: NaiveDate,

    /// Output CSV file path
    #[arg(long)]
    pub output: PathBuf,

    /// Market data feed
    #[arg(long, value_enum, ignore_case = true)]
    pub feed: Option<Feed>,

    /// Corporate action adjustment
    #[arg(long, value_enum, ignore_case = true)]
    pub adjustment: Option<Adjustment>,
}

#[derive(Args, Debug)]
pub struct IndicatorArgs {
    /// Type of indicator to calculate: SMA, EMA, RSI or MACD
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: IndicatorKind,

    /// Stock symbol
    #[arg(long)]
    pub symbol: String,

    /// Period for the indicator (defaults to indicator.default_period)
    #[arg(long)]
    pub period: Option<usize>,

    /// Path to the input CSV data file
    #[arg(long)]
    pub data: PathBuf,

    /// Output CSV file path
    #[arg(long)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct BacktestArgs {
    /// Trading strategy to backtest
    #[arg(long, value_enum, ignore_case = true)]
    pub strategy: StrategyKind,

    /// Stock symbol
    #[arg(long)]
    pub symbol: String,

    /// Path to the input CSV data file
    #[arg(long)]
    pub data: PathBuf,

    /// Output directory for backtest results (defaults to output.backtest_dir)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Starting cash, overrides backtest.initial_cash
    #[arg(long)]
    pub initial_cash: Option<f64>,

    /// Short moving-average period, overrides backtest.short_period
    #[arg(long)]
    pub short_period: Option<usize>,

    /// Long moving-average period, overrides backtest.long_period
    #[arg(long)]
    pub long_period: Option<usize>,

    /// Sharpe annualization factor, overrides backtest.annualization_factor
    #[arg(long)]
    pub annualization: Option<f64>,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Path to the backtest summary JSON file
    #[arg(long)]
    pub portfolio: PathBuf,

    /// Output report file path (Markdown)
    #[arg(long)]
    pub output: PathBuf,

    /// Report heading
    #[arg(long, default_value = "Backtest Report")]
    pub title: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn indicator_type_is_case_insensitive() {
        let cli = Cli::try_parse_from([
            "quantcli", "indicator", "--type", "rsi", "--symbol", "AAPL", "--data", "in.csv",
            "--output", "out.csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Indicator(args) => {
                assert_eq!(args.kind, IndicatorKind::Rsi);
                assert_eq!(args.period, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn backtest_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "quantcli", "backtest", "--strategy", "MA_CROSSOVER", "--symbol", "AAPL", "--data",
            "in.csv", "--short-period", "5", "--long-period", "20", "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Backtest(args) => {
                assert_eq!(args.strategy, StrategyKind::MaCrossover);
                assert_eq!((args.short_period, args.long_period), (Some(5), Some(20)));
                assert_eq!(args.output, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn fetch_parses_feed_and_adjustment() {
        let cli = Cli::try_parse_from([
            "quantcli", "fetch", "--symbol", "AAPL", "--start", "2021-01-01", "--end",
            "2021-02-01", "--output", "o.csv", "--feed", "IEX", "--adjustment", "split",
        ])
        .unwrap();
        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.feed, Some(Feed::Iex));
                assert_eq!(args.adjustment, Some(Adjustment::Split));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from([
            "quantcli", "fetch", "--symbol", "AAPL", "--start", "2021-01-01", "--end",
            "2021-02-01", "--output", "o.csv", "--feed", "delayed",
        ])
        .is_err());
    }

    #[test]
    fn rejects_unknown_indicator_and_bad_dates() {
        assert!(Cli::try_parse_from([
            "quantcli", "indicator", "--type", "VWAP", "--symbol", "A", "--data", "a", "--output",
            "b",
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "quantcli", "fetch", "--symbol", "A", "--start", "01/02/2021", "--end", "2021-02-01",
            "--output", "o.csv",
        ])
        .is_err());
    }
}
