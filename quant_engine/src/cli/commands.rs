use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use market_data_ingestor::{
    io::{CsvSink, CsvSource, DataSink, DataSource},
    models::{
        TimeSeries,
        request_params::{BarsRequestParams, ProviderParams},
    },
    providers::{
        DataProvider,
        alpaca_rest::{AlpacaProvider, params::AlpacaBarsParams},
    },
};
use shared_utils::config::AppConfig;
use tracing::{info, warn};

use crate::cli::params::{BacktestArgs, Cli, Commands, FetchArgs, IndicatorArgs, ReportArgs};
use crate::indicators::IndicatorFrame;
use crate::performance::PerformanceAnalyzer;
use crate::report::{
    SummaryRecord, describe_run, equity_curve_file_name, render_markdown, summary_file_name,
    write_equity_curve,
};
use crate::simulator::Simulator;

/// Execute a parsed command line. Only `fetch` touches the network.
pub async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Fetch(args) => {
            let provider = AlpacaProvider::new().context("failed to set up the Alpaca provider")?;
            fetch(&provider, &args).await
        }
        Commands::Indicator(args) => indicator(&args, &config),
        Commands::Backtest(args) => backtest(&args, &config),
        Commands::Report(args) => report(&args),
    }
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

fn read_series(path: &Path, symbol: &str) -> Result<TimeSeries> {
    let file = File::open(path)
        .with_context(|| format!("failed to open data file {}", path.display()))?;
    CsvSource::new(BufReader::new(file))
        .read_series(symbol)
        .with_context(|| format!("failed to read price data from {}", path.display()))
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    create_parent_dir(path)?;
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Download daily bars through `provider` and store them as CSV.
pub async fn fetch(provider: &dyn DataProvider, args: &FetchArgs) -> Result<()> {
    println!(
        "Fetching data for {} from {} to {}...",
        args.symbol, args.start, args.end
    );

    let provider_specific = if args.feed.is_some() || args.adjustment.is_some() {
        ProviderParams::Alpaca(AlpacaBarsParams {
            adjustment: args.adjustment,
            feed: args.feed,
            currency: None,
        })
    } else {
        ProviderParams::None
    };
    let params = BarsRequestParams {
        symbol: args.symbol.clone(),
        start: args.start,
        end: args.end,
        provider_specific,
    };

    let series = provider
        .fetch_bars(params)
        .await
        .with_context(|| format!("failed to fetch bars for {}", args.symbol))?;

    if series.is_empty() {
        warn!(symbol = %args.symbol, "provider returned no bars");
        println!("No data fetched. Please check the symbol and date range.");
        return Ok(());
    }

    let mut sink = CsvSink::new(create_file(&args.output)?);
    let rows = sink
        .write(&series.into())
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(rows, output = %args.output.display(), "saved bars");
    println!("Data saved to {}", args.output.display());
    Ok(())
}

/// Append one indicator to a stored series and write the complete rows.
pub fn indicator(args: &IndicatorArgs, config: &AppConfig) -> Result<()> {
    println!("Calculating {} for {}...", args.kind, args.symbol);

    let series = read_series(&args.data, &args.symbol)?;
    let period = args.period.unwrap_or(config.indicator.default_period);
    let columns = args
        .kind
        .compute(&series.closes(), period)
        .with_context(|| format!("failed to calculate {}", args.kind))?;

    let annotated = IndicatorFrame::new(&series)
        .with_columns(columns)?
        .complete_rows()?;
    if annotated.is_empty() {
        warn!(kind = %args.kind, period, "no rows have a defined value");
    }

    let mut sink = CsvSink::new(create_file(&args.output)?);
    let rows = sink
        .write(&annotated)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(rows, dropped = series.len() - rows, "indicator computed");
    println!("Indicator data saved to {}", args.output.display());
    Ok(())
}

/// Simulate the strategy over a stored series and persist the summary and equity curve.
pub fn backtest(args: &BacktestArgs, config: &AppConfig) -> Result<()> {
    let strategy = args.strategy.build(
        args.short_period.unwrap_or(config.backtest.short_period),
        args.long_period.unwrap_or(config.backtest.long_period),
    )?;
    println!(
        "Backtesting {} strategy for {}...",
        strategy.name(),
        args.symbol
    );

    let simulator = Simulator::new(args.initial_cash.unwrap_or(config.backtest.initial_cash))?;
    let analyzer = match args.annualization.or(config.backtest.annualization_factor) {
        Some(factor) => PerformanceAnalyzer::with_annualization(factor)?,
        None => PerformanceAnalyzer::new(),
    };

    let series = read_series(&args.data, &args.symbol)?;
    let run = simulator
        .run(strategy.as_ref(), &series)
        .with_context(|| format!("backtest failed for {}", args.symbol))?;
    let summary = analyzer.analyze(&run.curve)?;
    info!("{}", describe_run(&run));

    let dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.output.backtest_dir.clone());
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;

    let summary_path = dir.join(summary_file_name(&args.symbol));
    let mut out = create_file(&summary_path)?;
    SummaryRecord::from(&summary)
        .write_json(&mut out)
        .with_context(|| format!("failed to write {}", summary_path.display()))?;
    out.flush()?;

    let curve_path = dir.join(equity_curve_file_name(&args.symbol));
    write_equity_curve(&run.curve, create_file(&curve_path)?)
        .with_context(|| format!("failed to write {}", curve_path.display()))?;

    println!("Backtest results saved to {}", dir.display());
    Ok(())
}

/// Render a stored summary as Markdown.
pub fn report(args: &ReportArgs) -> Result<()> {
    println!("Generating report from {}...", args.portfolio.display());

    let file = File::open(&args.portfolio)
        .with_context(|| format!("failed to open {}", args.portfolio.display()))?;
    let summary = SummaryRecord::read_json(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", args.portfolio.display()))?;

    let mut out = create_file(&args.output)?;
    out.write_all(render_markdown(&args.title, &summary).as_bytes())?;
    out.flush()?;

    println!("Report generated at {}", args.output.display());
    Ok(())
}
