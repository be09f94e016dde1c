use crate::errors::EngineError;
use crate::indicators::{IndicatorSeries, check_window};

/// Simple moving average of `values` over `period` bars.
///
/// The first `period - 1` entries are `None`; entry `i` after that is the
/// mean of `values[i + 1 - period..=i]`.
pub fn sma(values: &[f64], period: usize) -> Result<IndicatorSeries, EngineError> {
    check_window(values, period)?;

    let mut out = vec![None; period - 1];
    out.extend(values.windows(period).map(|window| {
        // Offsets from the first value, so a flat window averages to exactly that value.
        let base = window[0];
        let offset = window.iter().map(|v| v - base).sum::<f64>() / period as f64;
        Some(base + offset)
    }));
    Ok(out)
}
