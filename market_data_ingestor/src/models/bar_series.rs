//! A validated, date-ordered collection of bars for one symbol.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::bar::Bar;

/// Reasons a set of bars cannot form a [`TimeSeries`].
///
/// `row` is always the 1-based position of the offending bar.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("row {row}: `{field}` must be a positive number, got {value}")]
    InvalidPrice {
        row: usize,
        field: &'static str,
        value: f64,
    },

    #[error("row {row}: `volume` must be a non-negative number, got {value}")]
    InvalidVolume { row: usize, value: f64 },

    #[error("row {row}: duplicate date {date}")]
    DuplicateDate { row: usize, date: NaiveDate },

    #[error("row {row}: date {date} is earlier than the previous row ({previous})")]
    NonMonotonicDate {
        row: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("column `{name}` has {actual} values but the series has {expected} bars")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Time-ordered bars for a single symbol.
///
/// Dates are strictly ascending with no duplicates and every bar passes
/// [`Bar::validate`]. The series is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl TimeSeries {
    /// Validate and wrap `bars`. The whole input is rejected on the first bad row.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let mut previous: Option<NaiveDate> = None;
        for (i, bar) in bars.iter().enumerate() {
            let row = i + 1;
            bar.validate(row)?;
            if let Some(prev) = previous {
                if bar.date == prev {
                    return Err(SeriesError::DuplicateDate {
                        row,
                        date: bar.date,
                    });
                }
                if bar.date < prev {
                    return Err(SeriesError::NonMonotonicDate {
                        row,
                        date: bar.date,
                        previous: prev,
                    });
                }
            }
            previous = Some(bar.date);
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|b| b.date)
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(y: i32, m: u32, d: u32, close: f64) -> Bar {
        Bar::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            close,
            close + 1.0,
            close - 1.0,
            close,
            1000.0,
        )
    }

    #[test]
    fn accepts_strictly_ascending_dates() {
        let series = TimeSeries::new(
            "AAPL",
            vec![bar(2021, 1, 1, 100.0), bar(2021, 1, 2, 102.0), bar(2021, 1, 4, 104.0)],
        )
        .unwrap();
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![100.0, 102.0, 104.0]);
    }

    #[test]
    fn empty_series_is_allowed() {
        let series = TimeSeries::new("AAPL", vec![]).unwrap();
        assert!(series.is_empty());
        assert!(series.first().is_none());
    }

    #[test]
    fn duplicate_dates_are_rejected_with_row() {
        let err = TimeSeries::new(
            "AAPL",
            vec![bar(2021, 1, 1, 100.0), bar(2021, 1, 2, 102.0), bar(2021, 1, 2, 103.0)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SeriesError::DuplicateDate {
                row: 3,
                date: NaiveDate::from_ymd_opt(2021, 1, 2).unwrap()
            }
        );
        assert_eq!(err.to_string(), "row 3: duplicate date 2021-01-02");
    }

    #[test]
    fn out_of_order_dates_are_rejected() {
        let err = TimeSeries::new("AAPL", vec![bar(2021, 1, 5, 100.0), bar(2021, 1, 4, 102.0)])
            .unwrap_err();
        assert!(matches!(err, SeriesError::NonMonotonicDate { row: 2, .. }));
    }

    #[test]
    fn invalid_bar_is_rejected() {
        let mut bad = bar(2021, 1, 2, 102.0);
        bad.close = -3.0;
        let err = TimeSeries::new("AAPL", vec![bar(2021, 1, 1, 100.0), bad]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::InvalidPrice {
                row: 2,
                field: "close",
                ..
            }
        ));
    }
}
