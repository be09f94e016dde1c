use ta::{Next, indicators::MovingAverageConvergenceDivergence};

use crate::errors::EngineError;
use crate::indicators::IndicatorSeries;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// MACD line and its signal line, aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: IndicatorSeries,
    pub signal: IndicatorSeries,
}

/// `EMA12 - EMA26` and the 9-span EMA of that difference.
///
/// Both lines are defined from the first bar. Early values are dominated by
/// the seed and are not corrected.
pub fn macd(values: &[f64]) -> Result<MacdSeries, EngineError> {
    if values.is_empty() {
        return Err(EngineError::EmptySeries);
    }

    let mut indicator = MovingAverageConvergenceDivergence::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL)
        .map_err(|e| EngineError::invalid("macd", MACD_FAST, format!("{e:?}")))?;

    let (macd, signal) = values
        .iter()
        .map(|&v| {
            let out = indicator.next(v);
            (Some(out.macd), Some(out.signal))
        })
        .unzip();
    Ok(MacdSeries { macd, signal })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::indicators::ema::ema_values;

    #[test]
    fn first_bar_is_zero() {
        let out = macd(&[42.0, 43.0]).unwrap();
        assert_eq!(out.macd[0], Some(0.0));
        assert_eq!(out.signal[0], Some(0.0));
    }

    #[test]
    fn empty_input() {
        assert_eq!(macd(&[]), Err(EngineError::EmptySeries));
    }

    proptest! {
        #[test]
        fn lines_match_ema_definitions(values in prop::collection::vec(1.0f64..500.0, 1..100)) {
            let out = macd(&values).unwrap();
            let fast = ema_values(&values, MACD_FAST).unwrap();
            let slow = ema_values(&values, MACD_SLOW).unwrap();
            let line: Vec<f64> = out.macd.iter().map(|v| v.unwrap()).collect();

            for i in 0..values.len() {
                assert_relative_eq!(line[i], fast[i] - slow[i], epsilon = 1e-9);
            }

            let signal = ema_values(&line, MACD_SIGNAL).unwrap();
            for i in 0..values.len() {
                assert_relative_eq!(out.signal[i].unwrap(), signal[i], epsilon = 1e-9);
            }
        }
    }
}
