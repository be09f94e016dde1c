//! Reading bar series from row-oriented tables.
//!
//! The CSV layout is the one produced by common download tools: a header row
//! with a date column plus `open, high, low, close, volume`. Header matching
//! is case-insensitive and unrecognized columns (e.g. `Adj Close`) are
//! ignored. Any malformed row rejects the whole table, because skipping rows
//! would silently shift every rolling window computed afterwards.

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use tracing::debug;

use crate::models::{Bar, SeriesError, TimeSeries};

/// Accepted names for the date column, compared case-insensitively.
const DATE_COLUMNS: [&str; 3] = ["date", "datetime", "timestamp"];

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SourceError {
    /// The underlying reader or CSV framing failed.
    #[snafu(display("Failed to read CSV: {source}"))]
    Csv {
        source: csv::Error,
        backtrace: Backtrace,
    },

    /// A required column is absent from the header.
    #[snafu(display("Missing required column `{column}`"))]
    MissingColumn {
        column: String,
        backtrace: Backtrace,
    },

    /// A data row could not be parsed. `row` is 1-based, header excluded.
    #[snafu(display("Malformed row {row}: {message}"))]
    MalformedRow {
        row: usize,
        message: String,
        backtrace: Backtrace,
    },

    /// Rows parsed but violate series invariants (ordering, positivity).
    #[snafu(display("Invalid series: {source}"))]
    InvalidSeries {
        source: SeriesError,
        backtrace: Backtrace,
    },
}

/// Anything that can yield a complete [`TimeSeries`].
pub trait DataSource {
    /// Read the full series, labelling it with `symbol`.
    fn read_series(&mut self, symbol: &str) -> Result<TimeSeries, SourceError>;
}

/// CSV-backed [`DataSource`] over any reader.
pub struct CsvSource<R: Read> {
    reader: R,
}

impl<R: Read> CsvSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, SourceError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .context(MissingColumnSnafu { column: name })
        };
        let date = DATE_COLUMNS
            .iter()
            .find_map(|name| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name)))
            .context(MissingColumnSnafu { column: "date" })?;

        Ok(Self {
            date,
            open: find("open")?,
            high: find("high")?,
            low: find("low")?,
            close: find("close")?,
            volume: find("volume")?,
        })
    }
}

/// Parse `YYYY-MM-DD`, discarding any trailing time part (`T...` or ` ...`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.split(['T', ' ']).next().unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn field<'r>(record: &'r StringRecord, idx: usize, name: &str, row: usize) -> Result<&'r str, SourceError> {
    record.get(idx).context(MalformedRowSnafu {
        row,
        message: format!("missing `{name}` field"),
    })
}

fn number(record: &StringRecord, idx: usize, name: &str, row: usize) -> Result<f64, SourceError> {
    let raw = field(record, idx, name, row)?;
    raw.trim().parse::<f64>().ok().context(MalformedRowSnafu {
        row,
        message: format!("`{name}` is not a number: {raw:?}"),
    })
}

impl<R: Read> DataSource for CsvSource<R> {
    fn read_series(&mut self, symbol: &str) -> Result<TimeSeries, SourceError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(&mut self.reader);

        let headers = reader.headers().context(CsvSnafu)?.clone();
        let cols = Columns::locate(&headers)?;

        let mut bars = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let row = i + 1;
            let record = record.context(CsvSnafu)?;

            let raw_date = field(&record, cols.date, "date", row)?;
            let date = parse_date(raw_date).context(MalformedRowSnafu {
                row,
                message: format!("unrecognized date {raw_date:?}"),
            })?;

            bars.push(Bar::new(
                date,
                number(&record, cols.open, "open", row)?,
                number(&record, cols.high, "high", row)?,
                number(&record, cols.low, "low", row)?,
                number(&record, cols.close, "close", row)?,
                number(&record, cols.volume, "volume", row)?,
            ));
        }

        debug!(symbol, rows = bars.len(), "parsed CSV series");
        TimeSeries::new(symbol, bars).context(InvalidSeriesSnafu)
    }
}
