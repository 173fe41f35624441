//! Cluster weighing
//!
//! Every reversal point (horizontal) or ordered pair of same-type reversal
//! points (diagonal) is scored by how many reversal points agree with it
//! within the noise threshold. Distances are measured relative to the
//! reference, never symmetrically.

use crate::{PricePoint, Result, Tolerance};

use super::fit::LogLine;
use super::helpers::{within, DayAxis};

// ============================================================
// HORIZONTAL
// ============================================================

/// A reversal value and the number of values consistent with it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPoint {
    pub value: f64,
    /// Always >= 1, a value matches itself
    pub weight: usize,
}

/// Weigh every value against all values, itself included.
///
/// One entry per input value, in input order.
pub fn weigh_levels(values: &[f64], noise: Tolerance) -> Vec<WeightedPoint> {
    values
        .iter()
        .map(|&value| WeightedPoint {
            value,
            weight: values
                .iter()
                .filter(|&&other| within(value, other, noise.get()))
                .count(),
        })
        .collect()
}

/// All values consistent with `reference`, in input order
pub fn level_cluster(reference: f64, values: &[f64], noise: Tolerance) -> Vec<f64> {
    values
        .iter()
        .copied()
        .filter(|&other| within(reference, other, noise.get()))
        .collect()
}

// ============================================================
// DIAGONAL
// ============================================================

/// Line through two same-type reversal points, scored against its group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedLinePair {
    /// Number of group points within the noise threshold of the line
    pub weight: usize,
    /// Reference point
    pub a: PricePoint,
    /// Paired point
    pub b: PricePoint,
    pub slope: f64,
    pub intercept: f64,
    /// Sum of squared relative deviations of the included points
    pub fit_error: f64,
}

impl WeightedLinePair {
    #[inline]
    pub fn line(&self) -> LogLine {
        LogLine {
            slope: self.slope,
            intercept: self.intercept,
        }
    }

    /// Check if `other` has slope and intercept both within `tolerance` of this pair
    ///
    /// The slope comparison is relative to this pair's slope, so near-flat
    /// lines with opposite signs (e.g. +1e-5 and -1e-5) never agree.
    #[inline]
    pub fn agrees_with(&self, other: &WeightedLinePair, tolerance: f64) -> bool {
        within(self.slope, other.slope, tolerance)
            && within(self.intercept, other.intercept, tolerance)
    }
}

/// Weigh the line through every ordered pair `(i, j)`, `i != j`, of `group`.
///
/// Both `(i, j)` and `(j, i)` are emitted. Two points on the same day fail
/// with `DegenerateLine`.
pub fn weigh_pairs(
    group: &[PricePoint],
    axis: &DayAxis,
    noise: Tolerance,
) -> Result<Vec<WeightedLinePair>> {
    let days: Vec<i64> = group.iter().map(|p| axis.offset(p.date)).collect();
    let mut pairs = Vec::with_capacity(group.len() * group.len().saturating_sub(1));

    for (i, a) in group.iter().enumerate() {
        for (j, b) in group.iter().enumerate() {
            if i == j {
                continue;
            }

            let line = LogLine::through(days[i], a.value, days[j], b.value)?;
            let (weight, fit_error) = score_line(&line, group, &days, noise);

            pairs.push(WeightedLinePair {
                weight,
                a: *a,
                b: *b,
                slope: line.slope,
                intercept: line.intercept,
                fit_error,
            });
        }
    }

    Ok(pairs)
}

/// Count the points near `line` and sum their squared relative deviations
fn score_line(line: &LogLine, group: &[PricePoint], days: &[i64], noise: Tolerance) -> (usize, f64) {
    group
        .iter()
        .zip(days)
        .map(|(p, &day)| line.deviation(day as f64, p.value))
        .filter(|&deviation| deviation <= noise.get())
        .fold((0, 0.0), |(weight, error), deviation| {
            (weight + 1, error + deviation * deviation)
        })
}

/// All pairs whose slope and intercept are consistent with `reference`
pub fn pair_cluster<'a>(
    reference: &WeightedLinePair,
    pairs: &'a [WeightedLinePair],
    noise: Tolerance,
) -> Vec<&'a WeightedLinePair> {
    pairs
        .iter()
        .filter(|pair| reference.agrees_with(pair, noise.get()))
        .collect()
}
