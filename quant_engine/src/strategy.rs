//! Trading rules the simulator can drive.
//!
//! A strategy declares the indicator columns it needs and, given one bar's
//! row of those columns plus the current position, returns an [`Action`].
//! The simulator owns all state; strategies are pure.

use clap::ValueEnum;
use market_data_ingestor::models::{Bar, TimeSeries};

use crate::errors::EngineError;
use crate::indicators::{IndicatorFrame, IndicatorRow, sma};
use crate::signal::{crossover, directions};
use crate::simulator::{Action, Position};

pub trait Strategy {
    /// Stable identifier, used in logs and file names.
    fn name(&self) -> &'static str;

    /// Compute every indicator column `decide` reads.
    fn indicators<'a>(&self, series: &'a TimeSeries) -> Result<IndicatorFrame<'a>, EngineError>;

    /// Choose what to do on `bar`.
    fn decide(&self, bar: &Bar, row: &IndicatorRow<'_>, position: Position) -> Action;
}

/// Long when the short SMA crosses above the long SMA, flat when it crosses below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaCrossover {
    short_period: usize,
    long_period: usize,
}

impl MaCrossover {
    pub const SHORT_COLUMN: &'static str = "sma_short";
    pub const LONG_COLUMN: &'static str = "sma_long";
    pub const CROSSOVER_COLUMN: &'static str = "crossover";

    pub fn new(short_period: usize, long_period: usize) -> Result<Self, EngineError> {
        if short_period == 0 {
            return Err(EngineError::invalid(
                "short_period",
                short_period,
                "must be at least 1",
            ));
        }
        if long_period <= short_period {
            return Err(EngineError::invalid(
                "long_period",
                long_period,
                format!("must be greater than short_period {short_period}"),
            ));
        }
        Ok(Self {
            short_period,
            long_period,
        })
    }

    pub fn short_period(&self) -> usize {
        self.short_period
    }

    pub fn long_period(&self) -> usize {
        self.long_period
    }
}

impl Default for MaCrossover {
    fn default() -> Self {
        Self {
            short_period: 50,
            long_period: 200,
        }
    }
}

impl Strategy for MaCrossover {
    fn name(&self) -> &'static str {
        "ma_crossover"
    }

    fn indicators<'a>(&self, series: &'a TimeSeries) -> Result<IndicatorFrame<'a>, EngineError> {
        if series.is_empty() {
            return Err(EngineError::EmptySeries);
        }
        // A crossover compares two consecutive defined long averages.
        if self.long_period >= series.len() {
            return Err(EngineError::InsufficientHistory {
                required: self.long_period + 1,
                available: series.len(),
            });
        }

        let closes = series.closes();
        let short = sma(&closes, self.short_period)?;
        let long = sma(&closes, self.long_period)?;
        let signals = crossover(&short, &long)?;

        let mut frame = IndicatorFrame::new(series);
        frame.insert(Self::SHORT_COLUMN, short)?;
        frame.insert(Self::LONG_COLUMN, long)?;
        frame.insert(Self::CROSSOVER_COLUMN, directions(&signals))?;
        Ok(frame)
    }

    fn decide(&self, _bar: &Bar, row: &IndicatorRow<'_>, position: Position) -> Action {
        let cross = row.get(Self::CROSSOVER_COLUMN).unwrap_or(0.0);
        match position {
            Position::Flat if cross > 0.0 => Action::Buy,
            Position::Long if cross < 0.0 => Action::Sell,
            _ => Action::Hold,
        }
    }
}

/// Strategies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    #[value(name = "ma_crossover")]
    MaCrossover,
}

impl StrategyKind {
    pub fn build(
        self,
        short_period: usize,
        long_period: usize,
    ) -> Result<Box<dyn Strategy>, EngineError> {
        match self {
            StrategyKind::MaCrossover => Ok(Box::new(MaCrossover::new(short_period, long_period)?)),
        }
    }
}
