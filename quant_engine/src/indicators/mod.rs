//! Rolling-window transforms over a close-price column.
//!
//! Every function takes the raw values and returns one entry per input,
//! `None` where the window is still warming up. Nothing here mutates or
//! reorders the input.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;

use crate::errors::EngineError;

pub mod ema;
pub mod frame;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::ema;
pub use frame::{IndicatorFrame, IndicatorRow};
pub use macd::{MacdSeries, macd};
pub use rsi::rsi;
pub use sma::sma;

/// Values aligned 1:1 with the bars they were computed from.
pub type IndicatorSeries = Vec<Option<f64>>;

/// Shared validation for fixed-length windows.
pub(crate) fn check_window(values: &[f64], period: usize) -> Result<(), EngineError> {
    if values.is_empty() {
        return Err(EngineError::EmptySeries);
    }
    if period == 0 {
        return Err(EngineError::invalid("period", period, "must be at least 1"));
    }
    if period > values.len() {
        return Err(EngineError::invalid(
            "period",
            period,
            format!("exceeds series length {}", values.len()),
        ));
    }
    Ok(())
}

/// The indicators the command line can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 4] = [
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
        }
    }

    /// Compute the output columns for this indicator, keyed by column name.
    ///
    /// `period` is ignored for MACD, whose spans are fixed.
    pub fn compute(
        self,
        closes: &[f64],
        period: usize,
    ) -> Result<IndexMap<String, IndicatorSeries>, EngineError> {
        let mut columns = IndexMap::new();
        match self {
            IndicatorKind::Sma => {
                columns.insert("SMA".to_string(), sma(closes, period)?);
            }
            IndicatorKind::Ema => {
                columns.insert("EMA".to_string(), ema(closes, period)?);
            }
            IndicatorKind::Rsi => {
                columns.insert("RSI".to_string(), rsi(closes, period)?);
            }
            IndicatorKind::Macd => {
                let MacdSeries { macd, signal } = macd(closes)?;
                columns.insert("MACD".to_string(), macd);
                columns.insert("Signal".to_string(), signal);
            }
        }
        Ok(columns)
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndicatorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::invalid("type", s, "expected one of SMA, EMA, RSI, MACD"))
    }
}
