use ta::{Next, indicators::ExponentialMovingAverage};

use crate::errors::EngineError;
use crate::indicators::IndicatorSeries;

/// Exponential moving average with smoothing `2 / (span + 1)`, seeded with
/// the first value. Defined from the first bar.
pub fn ema(values: &[f64], span: usize) -> Result<IndicatorSeries, EngineError> {
    Ok(ema_values(values, span)?.into_iter().map(Some).collect())
}

pub(crate) fn ema_values(values: &[f64], span: usize) -> Result<Vec<f64>, EngineError> {
    if values.is_empty() {
        return Err(EngineError::EmptySeries);
    }
    if span == 0 {
        return Err(EngineError::invalid("span", span, "must be at least 1"));
    }

    let mut ema = ExponentialMovingAverage::new(span)
        .map_err(|e| EngineError::invalid("span", span, format!("{e:?}")))?;
    Ok(values.iter().map(|&v| ema.next(v)).collect())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn seeds_with_first_close() {
        let out = ema(&[10.0, 11.0, 12.0], 3).unwrap();
        // alpha = 0.5
        assert_eq!(out, vec![Some(10.0), Some(10.5), Some(11.25)]);
    }

    #[test]
    fn span_one_tracks_input() {
        let values = [3.0, 7.0, 5.0];
        let out = ema(&values, 1).unwrap();
        assert_eq!(out, values.iter().copied().map(Some).collect::<Vec<_>>());
    }

    #[test]
    fn rejects_zero_span_and_empty_input() {
        assert_eq!(ema(&[], 5), Err(EngineError::EmptySeries));
        assert!(matches!(
            ema(&[1.0], 0),
            Err(EngineError::InvalidParameter { name: "span", .. })
        ));
    }

    proptest! {
        #[test]
        fn follows_recurrence(
            values in prop::collection::vec(1.0f64..500.0, 1..80),
            span in 1usize..40,
        ) {
            let out = ema_values(&values, span).unwrap();
            let alpha = 2.0 / (span as f64 + 1.0);

            prop_assert_eq!(out[0], values[0]);
            for i in 1..values.len() {
                let expected = alpha * values[i] + (1.0 - alpha) * out[i - 1];
                assert_relative_eq!(out[i], expected, max_relative = 1e-12);
            }
        }
    }
}
