//! Single-position, all-in backtest loop.
//!
//! The simulator is a two-state machine (`Flat`, `Long`). On each bar the
//! strategy proposes an [`Action`]; a buy converts all cash into units at
//! the close, a sell converts all units back. Actions that do not match the
//! current state are ignored. There are no fees, slippage or partial fills,
//! and an open position is left open at the end of the data.

use std::fmt;

use chrono::NaiveDate;
use market_data_ingestor::models::TimeSeries;
use tracing::debug;

use crate::errors::EngineError;
use crate::strategy::Strategy;

pub const DEFAULT_INITIAL_CASH: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Flat,
    Long,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Position::Flat => "FLAT",
            Position::Long => "LONG",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

/// One executed trade.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub date: NaiveDate,
    pub side: Side,
    pub price: f64,
    pub units: f64,
    pub cash_after: f64,
}

/// Account state after a bar has been processed.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub position: Position,
    pub cash: f64,
    pub holdings_value: f64,
    pub total_equity: f64,
}

/// Equity points in bar order. Only the simulator appends to it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EquityCurve {
    points: Vec<EquityPoint>,
}

impl EquityCurve {
    pub fn points(&self) -> &[EquityPoint] {
        &self.points
    }

    pub fn equities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.total_equity).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn final_equity(&self) -> Option<f64> {
        self.points.last().map(|p| p.total_equity)
    }

    fn push(&mut self, point: EquityPoint) {
        self.points.push(point);
    }
}

impl FromIterator<EquityPoint> for EquityCurve {
    fn from_iter<I: IntoIterator<Item = EquityPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRun {
    pub strategy: &'static str,
    pub symbol: String,
    pub initial_cash: f64,
    pub curve: EquityCurve,
    pub fills: Vec<Fill>,
    pub final_position: Position,
}

impl BacktestRun {
    /// Final equity over initial cash, minus one.
    pub fn total_return(&self) -> f64 {
        self.curve
            .final_equity()
            .map_or(0.0, |e| e / self.initial_cash - 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulator {
    initial_cash: f64,
}

impl Default for Simulator {
    fn default() -> Self {
        Self {
            initial_cash: DEFAULT_INITIAL_CASH,
        }
    }
}

impl Simulator {
    pub fn new(initial_cash: f64) -> Result<Self, EngineError> {
        if !initial_cash.is_finite() || initial_cash <= 0.0 {
            return Err(EngineError::invalid(
                "initial_cash",
                initial_cash,
                "must be a positive, finite amount",
            ));
        }
        Ok(Self { initial_cash })
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    pub fn run(&self, strategy: &dyn Strategy, series: &TimeSeries) -> Result<BacktestRun, EngineError> {
        if series.is_empty() {
            return Err(EngineError::EmptySeries);
        }
        let frame = strategy.indicators(series)?;

        let mut position = Position::Flat;
        let mut cash = self.initial_cash;
        let mut units = 0.0;
        let mut curve = EquityCurve::default();
        let mut fills = Vec::new();

        for (i, bar) in series.bars().iter().enumerate() {
            let action = strategy.decide(bar, &frame.row(i), position);
            match (position, action) {
                (Position::Flat, Action::Buy) => {
                    units = cash / bar.close;
                    cash = 0.0;
                    position = Position::Long;
                    debug!(date = %bar.date, price = bar.close, units, "buy");
                    fills.push(Fill {
                        date: bar.date,
                        side: Side::Buy,
                        price: bar.close,
                        units,
                        cash_after: cash,
                    });
                }
                (Position::Long, Action::Sell) => {
                    cash = units * bar.close;
                    debug!(date = %bar.date, price = bar.close, units, cash, "sell");
                    fills.push(Fill {
                        date: bar.date,
                        side: Side::Sell,
                        price: bar.close,
                        units,
                        cash_after: cash,
                    });
                    units = 0.0;
                    position = Position::Flat;
                }
                _ => {}
            }

            let holdings_value = units * bar.close;
            curve.push(EquityPoint {
                date: bar.date,
                close: bar.close,
                position,
                cash,
                holdings_value,
                total_equity: cash + holdings_value,
            });
        }

        Ok(BacktestRun {
            strategy: strategy.name(),
            symbol: series.symbol().to_string(),
            initial_cash: self.initial_cash,
            curve,
            fills,
            final_position: position,
        })
    }
}
