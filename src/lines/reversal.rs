//! Reversal point detection
//!
//! A bar is a topping point when no bar in the window centered on it closes
//! higher, and a bottoming point when none closes lower. Bars closer to the
//! series edges than half a window never qualify.

use crate::{PricePoint, Result, ReversalKind, ReversalPoint, Window};

/// Sliding-window extremum detector
#[derive(Debug, Clone, Copy)]
pub struct ReversalDetector {
    window: Window,
}

impl Default for ReversalDetector {
    fn default() -> Self {
        Self {
            window: Window::new_const(super::helpers::DEFAULT_REVERSAL_WINDOW),
        }
    }
}

impl ReversalDetector {
    /// Create a detector, rejecting even or too-small windows
    pub fn new(window: usize) -> Result<Self> {
        Ok(Self {
            window: Window::new(window)?,
        })
    }

    pub fn with_window(window: Window) -> Self {
        Self { window }
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    /// Lazily scan `points` in order.
    ///
    /// Yields nothing when the series is shorter than the window.
    pub fn detect<'a>(&self, points: &'a [PricePoint]) -> ReversalIter<'a> {
        ReversalIter {
            points,
            center: self.window.center(),
            current: self.window.center(),
        }
    }
}

/// Classify the center of a full window
#[inline]
pub fn classify(window: &[PricePoint], center: usize) -> Option<ReversalKind> {
    let value = window.get(center)?.value;
    let top = window.iter().all(|p| p.value <= value);
    let bottom = window.iter().all(|p| p.value >= value);

    match (top, bottom) {
        (true, true) => Some(ReversalKind::Both),
        (true, false) => Some(ReversalKind::Top),
        (false, true) => Some(ReversalKind::Bottom),
        (false, false) => None,
    }
}

/// Iterator over the reversal points of a series
pub struct ReversalIter<'a> {
    points: &'a [PricePoint],
    center: usize,
    current: usize,
}

impl<'a> Iterator for ReversalIter<'a> {
    type Item = ReversalPoint;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current + self.center < self.points.len() {
            let index = self.current;
            self.current += 1;

            let window = &self.points[index - self.center..=index + self.center];
            if let Some(kind) = classify(window, self.center) {
                return Some(ReversalPoint {
                    index,
                    point: self.points[index],
                    kind,
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .points
            .len()
            .saturating_sub(self.current + self.center);
        (0, Some(remaining))
    }
}

/// Reversal points split by type, in series order
///
/// A point detected on a flat window appears in both lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reversals {
    pub tops: Vec<PricePoint>,
    pub bottoms: Vec<PricePoint>,
}

impl Reversals {
    pub fn is_empty(&self) -> bool {
        self.tops.is_empty() && self.bottoms.is_empty()
    }

    /// Top values followed by bottom values
    pub fn values(&self) -> Vec<f64> {
        self.tops
            .iter()
            .chain(&self.bottoms)
            .map(|p| p.value)
            .collect()
    }
}

impl FromIterator<ReversalPoint> for Reversals {
    fn from_iter<I: IntoIterator<Item = ReversalPoint>>(iter: I) -> Self {
        let mut reversals = Reversals::default();
        for reversal in iter {
            if reversal.kind.is_top() {
                reversals.tops.push(reversal.point);
            }
            if reversal.kind.is_bottom() {
                reversals.bottoms.push(reversal.point);
            }
        }
        reversals
    }
}
