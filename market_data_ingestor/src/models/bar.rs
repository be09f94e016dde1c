//! Canonical in-memory representation of one daily price bar (OHLCV).
//!
//! Every [`DataProvider`](crate::providers::DataProvider) and
//! [`DataSource`](crate::io::source::DataSource) produces these, regardless of
//! where the data came from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::bar_series::SeriesError;

/// A single OHLCV observation for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// The trading date this bar covers.
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price during the session.
    pub high: f64,

    /// Lowest price during the session.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the session.
    pub volume: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check the numeric invariants of a single bar.
    ///
    /// Prices must be finite and strictly positive, volume finite and
    /// non-negative. `row` is the 1-based position used in error messages.
    pub fn validate(&self, row: usize) -> Result<(), SeriesError> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SeriesError::InvalidPrice { row, field, value });
            }
        }
        if !(self.volume.is_finite() && self.volume >= 0.0) {
            return Err(SeriesError::InvalidVolume {
                row,
                value: self.volume,
            });
        }
        Ok(())
    }
}
