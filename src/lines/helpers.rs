//! Common constants and numeric helpers for the line-finding stages
//!
//! Default parameters and the relative-distance comparisons shared by the
//! weighers and selectors.

use chrono::NaiveDate;

// ============================================================
// DEFAULT PARAMETERS
// ============================================================

/// Bars in the reversal window (center bar plus two on each side)
pub const DEFAULT_REVERSAL_WINDOW: usize = 5;
/// Relative tolerance for two values/lines to be "the same"
pub const DEFAULT_NOISE_THRESHOLD: f64 = 0.05;
/// Horizontal duplicates use the noise threshold itself
pub const DEFAULT_HORIZONTAL_DUPLICATE: f64 = 0.05;
/// Diagonal duplicates use twice the noise threshold
pub const DEFAULT_DIAGONAL_DUPLICATE: f64 = 0.10;
pub const DEFAULT_HORIZONTAL_LINES: usize = 3;
pub const DEFAULT_DIAGONAL_LINES: usize = 2;

/// A horizontal candidate always matches itself
pub const HORIZONTAL_NOISE_WEIGHT: usize = 1;
/// Any two distinct points define a line
pub const DIAGONAL_NOISE_WEIGHT: usize = 2;

pub const DEFAULT_HORIZONTAL_MIN_WEIGHT: usize = HORIZONTAL_NOISE_WEIGHT + 1;
pub const DEFAULT_DIAGONAL_MIN_WEIGHT: usize = DIAGONAL_NOISE_WEIGHT + 1;

// ============================================================
// RELATIVE DISTANCE
// ============================================================

/// `|reference - other| / |reference|`
///
/// The reference value is the denominator, so the measure is not symmetric.
/// A zero reference is only close to another zero.
#[inline]
pub fn relative_distance(reference: f64, other: f64) -> f64 {
    if reference == 0.0 {
        if other == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        (reference - other).abs() / reference.abs()
    }
}

/// Check if `other` is within `tolerance` of `reference` (reference-relative)
#[inline]
pub fn within(reference: f64, other: f64, tolerance: f64) -> bool {
    relative_distance(reference, other) <= tolerance
}

/// Check if two accepted values are too close measured from either side
#[inline]
pub fn is_near_duplicate(a: f64, b: f64, tolerance: f64) -> bool {
    within(a, b, tolerance) || within(b, a, tolerance)
}

// ============================================================
// DAY AXIS
// ============================================================

/// Calendar day offsets measured from the first bar of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAxis {
    origin: NaiveDate,
    last: NaiveDate,
}

impl DayAxis {
    pub fn new(origin: NaiveDate, last: NaiveDate) -> Self {
        Self { origin, last }
    }

    #[inline]
    pub fn origin(&self) -> NaiveDate {
        self.origin
    }

    #[inline]
    pub fn last(&self) -> NaiveDate {
        self.last
    }

    /// Days from the origin to `date` (day 0 is the first bar)
    #[inline]
    pub fn offset(&self, date: NaiveDate) -> i64 {
        date.signed_duration_since(self.origin).num_days()
    }

    /// Days from the first bar to the last bar
    #[inline]
    pub fn span(&self) -> i64 {
        self.offset(self.last)
    }
}
