//! Persisted backtest artifacts and the human-readable report.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled, settings::Style};
use thiserror::Error;

use crate::performance::PerformanceSummary;
use crate::simulator::{BacktestRun, EquityCurve, Side};

/// Shown wherever a statistic has no value.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid summary JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write equity curve: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The backtest summary file. Key names are part of the file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(rename = "Sharpe Ratio")]
    pub sharpe_ratio: Option<f64>,
    #[serde(rename = "Max Drawdown")]
    pub max_drawdown: Option<f64>,
    #[serde(rename = "Drawdown Period")]
    pub drawdown_period: u64,
}

impl From<&PerformanceSummary> for SummaryRecord {
    fn from(summary: &PerformanceSummary) -> Self {
        Self {
            sharpe_ratio: summary.sharpe_ratio,
            max_drawdown: Some(summary.max_drawdown),
            drawdown_period: summary.drawdown_duration as u64,
        }
    }
}

impl SummaryRecord {
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn read_json<R: Read>(reader: R) -> Result<Self, ReportError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// File name of the summary for `symbol`.
pub fn summary_file_name(symbol: &str) -> String {
    format!("{symbol}_backtest_results.json")
}

/// File name of the equity curve for `symbol`.
pub fn equity_curve_file_name(symbol: &str) -> String {
    format!("{symbol}_equity_curve.csv")
}

/// `Date,Close,Position,Cash,Holdings,Equity`, one row per bar.
pub fn write_equity_curve<W: Write>(curve: &EquityCurve, writer: W) -> Result<usize, ReportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["Date", "Close", "Position", "Cash", "Holdings", "Equity"])?;
    for p in curve.points() {
        out.write_record([
            p.date.format("%Y-%m-%d").to_string(),
            p.close.to_string(),
            p.position.to_string(),
            p.cash.to_string(),
            p.holdings_value.to_string(),
            p.total_equity.to_string(),
        ])?;
    }
    out.flush()?;
    Ok(curve.len())
}

fn fmt_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn fmt_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[derive(Debug, Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn metric_rows(summary: &SummaryRecord) -> Vec<MetricRow> {
    vec![
        MetricRow {
            metric: "Sharpe Ratio",
            value: fmt_number(summary.sharpe_ratio, 4),
        },
        MetricRow {
            metric: "Max Drawdown",
            value: fmt_percent(summary.max_drawdown),
        },
        MetricRow {
            metric: "Drawdown Period",
            value: format!("{} bars", summary.drawdown_period),
        },
    ]
}

/// Render a summary as a Markdown document.
///
/// `title` heads the document; undefined statistics are written as `N/A`.
pub fn render_markdown(title: &str, summary: &SummaryRecord) -> String {
    let mut table = Table::new(metric_rows(summary));
    table.with(Style::markdown());
    format!("# {title}\n\n{table}\n")
}

/// One-line account of a finished run, for logs.
pub fn describe_run(run: &BacktestRun) -> String {
    let buys = run.fills.iter().filter(|f| f.side == Side::Buy).count();
    let sells = run.fills.len() - buys;
    format!(
        "{} on {}: {} buys, {} sells, final equity {}, total return {}",
        run.strategy,
        run.symbol,
        buys,
        sells,
        fmt_number(run.curve.final_equity(), 2),
        fmt_percent(Some(run.total_return())),
    )
}
