//! Line fitting
//!
//! Horizontal clusters are represented by one of their own members, the one
//! with the smallest sum of squared differences to the rest. Diagonal lines
//! live in log-price space: `log10(price) = slope * day + intercept`.

use crate::{Result, TrendError};

use super::cluster::WeightedLinePair;

/// Representative level of a horizontal cluster.
///
/// Exhaustive O(n²) search over the members; ties go to the first member in
/// input order.
pub fn fit_level(cluster: &[f64]) -> Result<f64> {
    let mut best: Option<(f64, f64)> = None;

    for &candidate in cluster {
        let sum: f64 = cluster.iter().map(|&v| (candidate - v).powi(2)).sum();
        match best {
            Some((_, best_sum)) if sum >= best_sum => {}
            _ => best = Some((candidate, sum)),
        }
    }

    best.map(|(value, _)| value).ok_or(TrendError::EmptyCluster)
}

/// Pick the representative pair of a diagonal cluster: highest weight, then
/// lowest fit error, then first in input order.
pub fn fit_pair<'a>(cluster: &[&'a WeightedLinePair]) -> Result<&'a WeightedLinePair> {
    let mut best: Option<&'a WeightedLinePair> = None;

    for &pair in cluster {
        best = match best {
            Some(current)
                if pair.weight < current.weight
                    || (pair.weight == current.weight && pair.fit_error >= current.fit_error) =>
            {
                Some(current)
            }
            _ => Some(pair),
        };
    }

    best.ok_or(TrendError::EmptyCluster)
}

/// Straight line in log10-price versus day-offset space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLine {
    pub slope: f64,
    pub intercept: f64,
}

impl LogLine {
    /// Line through `(d1, v1)` and `(d2, v2)`.
    ///
    /// The slope uses the two-point form so a point on day 0 works as the
    /// reference. Both points on the same day is an error.
    pub fn through(d1: i64, v1: f64, d2: i64, v2: f64) -> Result<Self> {
        if d1 == d2 {
            return Err(TrendError::DegenerateLine { day: d1 });
        }

        let (l1, l2) = (v1.log10(), v2.log10());
        let (d1, d2) = (d1 as f64, d2 as f64);
        let run = d2 - d1;

        Ok(Self {
            slope: (l2 - l1) / run,
            intercept: (d2 * l1 - d1 * l2) / run,
        })
    }

    /// Price predicted at `day`
    #[inline]
    pub fn price_at(&self, day: f64) -> f64 {
        10f64.powf(self.slope * day + self.intercept)
    }

    /// Relative deviation of `value` from the line at `day`
    #[inline]
    pub fn deviation(&self, day: f64, value: f64) -> f64 {
        let predicted = self.price_at(day);
        (value - predicted).abs() / predicted
    }
}
