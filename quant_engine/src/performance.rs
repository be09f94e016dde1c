//! Risk and return statistics over an equity curve.

use crate::errors::EngineError;
use crate::simulator::EquityCurve;

/// Standard deviations at or below this (relative to the mean return, or
/// absolute for tiny means) are treated as zero volatility.
const ZERO_VOLATILITY: f64 = 1e-12;

/// Results of analyzing one equity curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceSummary {
    /// `None` when volatility is zero or there are fewer than two points.
    pub sharpe_ratio: Option<f64>,
    /// Deepest peak-to-trough decline as a non-positive fraction.
    pub max_drawdown: f64,
    /// Bars in the longest run spent below the running peak.
    pub drawdown_duration: usize,
}

impl PerformanceSummary {
    /// The Sharpe ratio, or [`EngineError::UndefinedStatistic`] when there is none.
    pub fn sharpe(&self) -> Result<f64, EngineError> {
        self.sharpe_ratio
            .ok_or(EngineError::UndefinedStatistic("Sharpe ratio"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerformanceAnalyzer {
    annualization_factor: Option<f64>,
}

impl PerformanceAnalyzer {
    /// Analyzer reporting the raw per-bar Sharpe ratio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale the Sharpe ratio by `sqrt(factor)` (e.g. 252 for daily bars).
    pub fn with_annualization(factor: f64) -> Result<Self, EngineError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(EngineError::invalid(
                "annualization_factor",
                factor,
                "must be a positive, finite number",
            ));
        }
        Ok(Self {
            annualization_factor: Some(factor),
        })
    }

    pub fn annualization_factor(&self) -> Option<f64> {
        self.annualization_factor
    }

    pub fn analyze(&self, curve: &EquityCurve) -> Result<PerformanceSummary, EngineError> {
        self.analyze_equity(&curve.equities())
    }

    /// Same as [`analyze`](Self::analyze) over raw equity values.
    pub fn analyze_equity(&self, equity: &[f64]) -> Result<PerformanceSummary, EngineError> {
        if equity.is_empty() {
            return Err(EngineError::EmptySeries);
        }
        let (max_drawdown, drawdown_duration) = drawdown(equity);
        Ok(PerformanceSummary {
            sharpe_ratio: self.sharpe(&returns(equity)),
            max_drawdown,
            drawdown_duration,
        })
    }

    fn sharpe(&self, returns: &[f64]) -> Option<f64> {
        if returns.is_empty() {
            return None;
        }
        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();
        if !std.is_finite() || std <= ZERO_VOLATILITY * mean.abs().max(1.0) {
            return None;
        }

        let ratio = mean / std;
        Some(match self.annualization_factor {
            Some(factor) => ratio * factor.sqrt(),
            None => ratio,
        })
    }
}

/// Simple bar-over-bar returns; one fewer than the input.
pub fn returns(equity: &[f64]) -> Vec<f64> {
    equity.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Maximum drawdown fraction and longest underwater run.
fn drawdown(equity: &[f64]) -> (f64, usize) {
    let mut peak = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0_f64;
    let mut run = 0;
    let mut longest = 0;

    for &e in equity {
        peak = peak.max(e);
        if e < peak {
            max_drawdown = max_drawdown.min((e - peak) / peak);
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    (max_drawdown, longest)
}
