use indexmap::IndexMap;
use market_data_ingestor::models::{AnnotatedSeries, TimeSeries};

use crate::errors::EngineError;
use crate::indicators::IndicatorSeries;

/// Named indicator columns aligned with one [`TimeSeries`].
#[derive(Debug, Clone)]
pub struct IndicatorFrame<'a> {
    series: &'a TimeSeries,
    columns: IndexMap<String, IndicatorSeries>,
}

impl<'a> IndicatorFrame<'a> {
    pub fn new(series: &'a TimeSeries) -> Self {
        Self {
            series,
            columns: IndexMap::new(),
        }
    }

    /// Add or replace a column. It must have one entry per bar.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: IndicatorSeries,
    ) -> Result<(), EngineError> {
        let name = name.into();
        if values.len() != self.series.len() {
            return Err(EngineError::invalid(
                "column",
                &name,
                format!(
                    "has {} values but the series has {} bars",
                    values.len(),
                    self.series.len()
                ),
            ));
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_columns(
        mut self,
        columns: IndexMap<String, IndicatorSeries>,
    ) -> Result<Self, EngineError> {
        for (name, values) in columns {
            self.insert(name, values)?;
        }
        Ok(self)
    }

    pub fn series(&self) -> &'a TimeSeries {
        self.series
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Indicator values for bar `index`.
    ///
    /// # Panics
    /// If `index` is out of range.
    pub fn row(&self, index: usize) -> IndicatorRow<'_> {
        assert!(index < self.len(), "row {index} out of range");
        IndicatorRow {
            columns: &self.columns,
            index,
        }
    }

    /// Bars plus columns, keeping only rows where every column is defined.
    pub fn complete_rows(&self) -> Result<AnnotatedSeries, EngineError> {
        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| self.columns.values().all(|col| col[i].is_some()))
            .collect();

        let bars: Vec<_> = keep.iter().map(|&i| self.series.bars()[i].clone()).collect();
        let series = TimeSeries::new(self.series.symbol(), bars)?;

        let columns: IndexMap<String, Vec<f64>> = self
            .columns
            .iter()
            .map(|(name, col)| {
                let values: Vec<f64> = keep.iter().filter_map(|&i| col[i]).collect();
                (name.clone(), values)
            })
            .collect();
        Ok(AnnotatedSeries::new(series, columns)?)
    }
}

/// A borrowed view of one bar's indicator values.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorRow<'f> {
    columns: &'f IndexMap<String, IndicatorSeries>,
    index: usize,
}

impl IndicatorRow<'_> {
    /// The value of `name` at this bar; `None` if undefined or absent.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns.get(name).and_then(|col| col[self.index])
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use market_data_ingestor::models::Bar;

    use super::*;
    use crate::indicators::{IndicatorKind, sma};

    fn series(closes: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let date = start + chrono::Duration::days(i as i64);
                Bar::new(date, c, c + 1.0, c - 1.0, c, 1000.0)
            })
            .collect();
        TimeSeries::new("AAPL", bars).unwrap()
    }

    #[test]
    fn complete_rows_drop_warm_up() {
        let ts = series(&[100.0, 102.0, 104.0, 106.0, 108.0]);
        let columns = IndicatorKind::Sma.compute(&ts.closes(), 2).unwrap();
        let frame = IndicatorFrame::new(&ts).with_columns(columns).unwrap();

        let annotated = frame.complete_rows().unwrap();
        assert_eq!(annotated.len(), 4);
        assert_eq!(annotated.column("SMA").unwrap(), &[101.0, 103.0, 105.0, 107.0]);
        assert_eq!(
            annotated.series().first().unwrap().date,
            NaiveDate::from_ymd_opt(2021, 1, 2).unwrap()
        );
    }

    #[test]
    fn rows_expose_values_by_name() {
        let ts = series(&[1.0, 2.0, 3.0]);
        let mut frame = IndicatorFrame::new(&ts);
        frame.insert("fast", sma(&ts.closes(), 2).unwrap()).unwrap();

        assert_eq!(frame.row(0).get("fast"), None);
        assert_eq!(frame.row(2).get("fast"), Some(2.5));
        assert_eq!(frame.row(2).get("missing"), None);
    }

    #[test]
    fn rejects_misaligned_column() {
        let ts = series(&[1.0, 2.0, 3.0]);
        let mut frame = IndicatorFrame::new(&ts);
        assert!(frame.insert("short", vec![Some(1.0)]).is_err());
    }
}
