//! Crossover detection between two aligned moving averages.

use crate::errors::EngineError;

/// Where the short average sits relative to the long one on a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Above,
    Below,
    Equal,
    Undefined,
}

/// Per-bar output of [`crossover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalPoint {
    pub relation: Relation,
    /// `+1` on an upward cross, `-1` on a downward cross, `0` otherwise.
    pub direction: i8,
}

impl SignalPoint {
    pub fn is_cross_up(&self) -> bool {
        self.direction > 0
    }

    pub fn is_cross_down(&self) -> bool {
        self.direction < 0
    }
}

fn spread(short: Option<f64>, long: Option<f64>) -> Option<f64> {
    Some(short? - long?)
}

fn relation(d: Option<f64>) -> Relation {
    match d {
        None => Relation::Undefined,
        Some(d) if d > 0.0 => Relation::Above,
        Some(d) if d < 0.0 => Relation::Below,
        Some(_) => Relation::Equal,
    }
}

/// Compare `short` against `long` bar by bar.
///
/// With `d = short - long`, bar `i` is an upward cross when `d[i-1] <= 0`
/// and `d[i] > 0`, and a downward cross when `d[i-1] >= 0` and `d[i] < 0`.
/// The first bar, and any bar where the current or previous value of either
/// input is undefined, has direction 0.
pub fn crossover(
    short: &[Option<f64>],
    long: &[Option<f64>],
) -> Result<Vec<SignalPoint>, EngineError> {
    if short.len() != long.len() {
        return Err(EngineError::invalid(
            "long",
            long.len(),
            format!("length must match short average length {}", short.len()),
        ));
    }

    let spreads: Vec<Option<f64>> = short
        .iter()
        .zip(long)
        .map(|(&s, &l)| spread(s, l))
        .collect();

    let mut out = Vec::with_capacity(spreads.len());
    for (i, &cur) in spreads.iter().enumerate() {
        let prev = if i == 0 { None } else { spreads[i - 1] };
        let direction = match (prev, cur) {
            (Some(p), Some(c)) if p <= 0.0 && c > 0.0 => 1,
            (Some(p), Some(c)) if p >= 0.0 && c < 0.0 => -1,
            _ => 0,
        };
        out.push(SignalPoint {
            relation: relation(cur),
            direction,
        });
    }
    Ok(out)
}

/// Directions only, as indicator values (always defined).
pub fn directions(points: &[SignalPoint]) -> Vec<Option<f64>> {
    points.iter().map(|p| Some(f64::from(p.direction))).collect()
}
