use crate::errors::EngineError;
use crate::indicators::{IndicatorSeries, check_window};

/// RSI value used when a window has neither gains nor losses.
pub const RSI_NEUTRAL: f64 = 50.0;

/// Relative strength index over `period` bars, using plain rolling means
/// of gains and losses (not Wilder smoothing).
///
/// The first bar has no prior close and contributes zero gain and zero
/// loss, so the first defined value is at index `period - 1`. A window with
/// gains but no losses yields exactly 100; a window with neither yields
/// [`RSI_NEUTRAL`].
pub fn rsi(values: &[f64], period: usize) -> Result<IndicatorSeries, EngineError> {
    check_window(values, period)?;

    let mut gains = Vec::with_capacity(values.len());
    let mut losses = Vec::with_capacity(values.len());
    gains.push(0.0);
    losses.push(0.0);
    for pair in values.windows(2) {
        let delta = pair[1] - pair[0];
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let mut out = vec![None; period - 1];
    for end in period..=values.len() {
        // Summed per window so all-zero windows stay exactly zero.
        let avg_gain = gains[end - period..end].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[end - period..end].iter().sum::<f64>() / period as f64;
        out.push(Some(rsi_from_averages(avg_gain, avg_loss)));
    }
    Ok(out)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    match (avg_gain > 0.0, avg_loss > 0.0) {
        (false, false) => RSI_NEUTRAL,
        (true, false) => 100.0,
        _ => 100.0 - 100.0 / (1.0 + avg_gain / avg_loss),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn rising_prices_give_100() {
        let out = rsi(&[100.0, 102.0, 104.0, 106.0, 108.0], 2).unwrap();
        assert_eq!(out, vec![None, Some(100.0), Some(100.0), Some(100.0), Some(100.0)]);
    }

    #[test]
    fn flat_prices_give_neutral() {
        let out = rsi(&[5.0; 6], 3).unwrap();
        assert_eq!(out[2..], [Some(RSI_NEUTRAL); 4]);
    }

    #[test]
    fn falling_prices_give_zero() {
        let out = rsi(&[10.0, 9.0, 8.0, 7.0], 2).unwrap();
        assert_eq!(out[1..], [Some(0.0); 3]);
    }

    #[test]
    fn mixed_window() {
        // deltas: 0, +2, -1, +3 ; period 3 at index 3 -> gains 5/3, losses 1/3
        let out = rsi(&[10.0, 12.0, 11.0, 14.0], 3).unwrap();
        assert_eq!(out[..2], [None, None]);
        // index 2: gains 2/3, losses 1/3 -> RS 2
        assert_relative_eq!(out[2].unwrap(), 100.0 - 100.0 / 3.0, max_relative = 1e-12);
        // index 3: RS 5
        assert_relative_eq!(out[3].unwrap(), 100.0 - 100.0 / 6.0, max_relative = 1e-12);
    }

    #[test]
    fn rejects_bad_windows() {
        assert_eq!(rsi(&[], 14), Err(EngineError::EmptySeries));
        assert!(rsi(&[1.0, 2.0], 0).is_err());
        assert!(rsi(&[1.0, 2.0], 3).is_err());
    }

    proptest! {
        #[test]
        fn bounded_between_0_and_100(
            values in prop::collection::vec(1.0f64..1_000.0, 1..150),
            period in 1usize..30,
        ) {
            prop_assume!(period <= values.len());
            let out = rsi(&values, period).unwrap();
            prop_assert_eq!(out.len(), values.len());
            for v in out.iter().skip(period - 1) {
                let v = v.unwrap();
                prop_assert!((0.0..=100.0).contains(&v), "rsi out of range: {}", v);
            }
        }

        #[test]
        fn no_losses_means_100(
            start in 1.0f64..100.0,
            steps in prop::collection::vec(0.01f64..5.0, 2..40),
            period in 2usize..10,
        ) {
            let mut values = vec![start];
            for s in &steps {
                let last = values[values.len() - 1];
                values.push(last + s);
            }
            prop_assume!(period <= values.len());
            let out = rsi(&values, period).unwrap();
            for v in out.iter().skip(period - 1) {
                prop_assert_eq!(*v, Some(100.0));
            }
        }
    }
}
