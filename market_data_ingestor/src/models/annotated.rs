//! A [`TimeSeries`] with extra named numeric columns appended to each bar.
//!
//! This is the persisted shape of computed indicators: the OHLCV columns
//! followed by one column per indicator, every value defined.

use indexmap::IndexMap;

use crate::models::bar_series::{SeriesError, TimeSeries};

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSeries {
    series: TimeSeries,
    columns: IndexMap<String, Vec<f64>>,
}

impl AnnotatedSeries {
    /// Attach `columns` to `series`. Every column must have one value per bar.
    pub fn new(
        series: TimeSeries,
        columns: IndexMap<String, Vec<f64>>,
    ) -> Result<Self, SeriesError> {
        for (name, values) in &columns {
            if values.len() != series.len() {
                return Err(SeriesError::ColumnLength {
                    name: name.clone(),
                    expected: series.len(),
                    actual: values.len(),
                });
            }
        }
        Ok(Self { series, columns })
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Appended columns in insertion order.
    pub fn columns(&self) -> &IndexMap<String, Vec<f64>> {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl From<TimeSeries> for AnnotatedSeries {
    fn from(series: TimeSeries) -> Self {
        Self {
            series,
            columns: IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::bar::Bar;

    fn series() -> TimeSeries {
        let bars = (1..=3)
            .map(|d| {
                Bar::new(
                    NaiveDate::from_ymd_opt(2021, 1, d).unwrap(),
                    10.0,
                    11.0,
                    9.0,
                    10.0,
                    5.0,
                )
            })
            .collect();
        TimeSeries::new("XYZ", bars).unwrap()
    }

    #[test]
    fn column_lengths_must_match() {
        let mut cols = IndexMap::new();
        cols.insert("SMA".to_string(), vec![1.0, 2.0]);
        let err = AnnotatedSeries::new(series(), cols).unwrap_err();
        assert_eq!(
            err,
            SeriesError::ColumnLength {
                name: "SMA".into(),
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn keeps_column_order() {
        let mut cols = IndexMap::new();
        cols.insert("MACD".to_string(), vec![0.1, 0.2, 0.3]);
        cols.insert("Signal".to_string(), vec![0.1, 0.15, 0.2]);
        let annotated = AnnotatedSeries::new(series(), cols).unwrap();
        let names: Vec<&str> = annotated.columns().keys().map(String::as_str).collect();
        assert_eq!(names, ["MACD", "Signal"]);
        assert_eq!(annotated.column("Signal"), Some(&[0.1, 0.15, 0.2][..]));
    }
}
