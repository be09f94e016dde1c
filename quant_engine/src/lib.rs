//! Technical indicators, a moving-average crossover backtester and its
//! performance statistics, plus the `quantcli` command layer.
//!
//! Data flows one way: a [`TimeSeries`](market_data_ingestor::models::TimeSeries)
//! feeds the [`indicators`], a [`strategy`] turns indicator rows into
//! actions, the [`simulator`] applies them to an account, and
//! [`performance`] summarizes the resulting equity curve.

pub mod cli;
pub mod errors;
pub mod indicators;
pub mod performance;
pub mod report;
pub mod signal;
pub mod simulator;
pub mod strategy;

pub use errors::EngineError;
