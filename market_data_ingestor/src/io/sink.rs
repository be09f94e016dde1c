use std::io::Write;

use csv::WriterBuilder;
use snafu::{Backtrace, ResultExt, Snafu};
use tracing::debug;

use crate::models::AnnotatedSeries;

/// Base columns every written table starts with.
pub const BAR_HEADER: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// An error occurred while encoding or writing a CSV record.
    #[snafu(display("Failed to write CSV: {source}"))]
    Csv {
        source: csv::Error,
        backtrace: Backtrace,
    },

    /// A generic I/O error (e.g. flushing the destination).
    #[snafu(display("I/O error: {source}"))]
    Io {
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

pub trait DataSink {
    /// The type of output returned after a successful write operation.
    ///
    /// A file sink returns the number of rows written; other sinks may return
    /// paths or identifiers.
    type Output;

    /// Writes the series and all of its derived columns to the destination.
    fn write(&mut self, data: &AnnotatedSeries) -> Result<Self::Output, SinkError>;
}

/// Writes `Date,Open,High,Low,Close,Volume` followed by each derived column,
/// one row per bar.
pub struct CsvSink<W: Write> {
    writer: W,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DataSink for CsvSink<W> {
    type Output = usize;

    fn write(&mut self, data: &AnnotatedSeries) -> Result<usize, SinkError> {
        let mut out = WriterBuilder::new().from_writer(&mut self.writer);

        let mut header: Vec<&str> = BAR_HEADER.to_vec();
        header.extend(data.columns().keys().map(String::as_str));
        out.write_record(&header).context(CsvSnafu)?;

        for (i, bar) in data.series().bars().iter().enumerate() {
            let mut record = vec![
                bar.date.format("%Y-%m-%d").to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ];
            record.extend(data.columns().values().map(|col| col[i].to_string()));
            out.write_record(&record).context(CsvSnafu)?;
        }
        out.flush().context(IoSnafu)?;

        debug!(
            symbol = data.series().symbol(),
            rows = data.len(),
            columns = data.columns().len(),
            "wrote CSV table"
        );
        Ok(data.len())
    }
}
