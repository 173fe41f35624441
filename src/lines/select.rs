//! Line selection
//!
//! Candidates are visited heaviest first. Each one is expanded to its
//! consistency cluster, the cluster is fitted, and the fitted line is kept
//! unless an accepted line already sits within the duplicate tolerance.
//! Selection stops at `lines_to_draw` lines or at the first candidate lighter
//! than `min_weight`.

use log::{debug, trace};

use crate::{LineConfig, PricePoint, Result, ReversalGroup, TrendLine};

use super::cluster::{level_cluster, pair_cluster, weigh_levels, weigh_pairs, WeightedLinePair};
use super::fit::{fit_level, fit_pair};
use super::helpers::{is_near_duplicate, DayAxis};
use super::reversal::Reversals;

// ============================================================
// HORIZONTAL
// ============================================================

/// Select horizontal price levels from reversal values (tops then bottoms).
pub fn select_levels(values: &[f64], config: &LineConfig) -> Result<Vec<f64>> {
    let mut accepted: Vec<f64> = Vec::new();
    if config.lines_to_draw == 0 {
        return Ok(accepted);
    }

    let mut candidates = weigh_levels(values, config.noise_threshold);
    // stable: equal weights keep input order
    candidates.sort_by(|a, b| b.weight.cmp(&a.weight));

    for candidate in &candidates {
        if candidate.weight < config.min_weight {
            debug!(
                "horizontal selection stopped at weight {} (min {})",
                candidate.weight, config.min_weight
            );
            break;
        }

        let cluster = level_cluster(candidate.value, values, config.noise_threshold);
        let level = fit_level(&cluster)?;

        let tolerance = config.duplicate_tolerance.get();
        if let Some(existing) = accepted
            .iter()
            .find(|&&existing| is_near_duplicate(existing, level, tolerance))
        {
            trace!("level {level} duplicates accepted level {existing}");
            continue;
        }

        accepted.push(level);
        if accepted.len() >= config.lines_to_draw {
            break;
        }
    }

    Ok(accepted)
}

// ============================================================
// DIAGONAL
// ============================================================

/// Slope and intercept both near-duplicate, measured from either side.
///
/// Relative slope distance never matches near-flat lines of opposite sign.
#[inline]
fn is_duplicate_line(a: &WeightedLinePair, b: &WeightedLinePair, tolerance: f64) -> bool {
    is_near_duplicate(a.slope, b.slope, tolerance)
        && is_near_duplicate(a.intercept, b.intercept, tolerance)
}

/// Select diagonal lines from already weighed pairs of one reversal group.
pub fn select_pairs(
    pairs: &[WeightedLinePair],
    config: &LineConfig,
) -> Result<Vec<WeightedLinePair>> {
    let mut accepted: Vec<WeightedLinePair> = Vec::new();
    if config.lines_to_draw == 0 {
        return Ok(accepted);
    }

    let mut order: Vec<&WeightedLinePair> = pairs.iter().collect();
    order.sort_by(|a, b| b.weight.cmp(&a.weight));

    for candidate in order {
        if candidate.weight < config.min_weight {
            debug!(
                "diagonal selection stopped at weight {} (min {})",
                candidate.weight, config.min_weight
            );
            break;
        }

        let cluster = pair_cluster(candidate, pairs, config.noise_threshold);
        let best = fit_pair(&cluster)?;

        let tolerance = config.duplicate_tolerance.get();
        if accepted
            .iter()
            .any(|existing| is_duplicate_line(existing, best, tolerance))
        {
            trace!(
                "line slope={} intercept={} duplicates an accepted line",
                best.slope,
                best.intercept
            );
            continue;
        }

        accepted.push(*best);
        if accepted.len() >= config.lines_to_draw {
            break;
        }
    }

    Ok(accepted)
}

/// Select diagonal trend lines through tops and through bottoms.
///
/// Each group is weighed and selected on its own; the survivors are merged
/// heaviest first (lower fit error on ties, tops before bottoms), duplicates
/// across groups dropped, and the total capped at `lines_to_draw`.
pub fn select_trend_lines(
    reversals: &Reversals,
    axis: &DayAxis,
    config: &LineConfig,
) -> Result<Vec<TrendLine>> {
    if config.lines_to_draw == 0 {
        return Ok(Vec::new());
    }

    let mut merged: Vec<(ReversalGroup, WeightedLinePair)> = Vec::new();
    for (group, points) in [
        (ReversalGroup::Tops, &reversals.tops),
        (ReversalGroup::Bottoms, &reversals.bottoms),
    ] {
        let selected = select_group(points, axis, config)?;
        debug!("{group:?}: {} diagonal candidates accepted", selected.len());
        merged.extend(selected.into_iter().map(|pair| (group, pair)));
    }

    merged.sort_by(|(_, a), (_, b)| {
        b.weight
            .cmp(&a.weight)
            .then_with(|| a.fit_error.total_cmp(&b.fit_error))
    });

    let tolerance = config.duplicate_tolerance.get();
    let mut lines: Vec<TrendLine> = Vec::new();
    let mut kept: Vec<WeightedLinePair> = Vec::new();
    for (group, pair) in merged {
        if lines.len() >= config.lines_to_draw {
            break;
        }
        if kept
            .iter()
            .any(|existing| is_duplicate_line(existing, &pair, tolerance))
        {
            trace!("{group:?} line duplicates a line from the other group");
            continue;
        }
        lines.push(TrendLine::new(group, &pair, axis));
        kept.push(pair);
    }

    Ok(lines)
}

fn select_group(
    points: &[PricePoint],
    axis: &DayAxis,
    config: &LineConfig,
) -> Result<Vec<WeightedLinePair>> {
    let pairs = weigh_pairs(points, axis, config.noise_threshold)?;
    select_pairs(&pairs, config)
}
