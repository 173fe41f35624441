//! # trendscope - trend line detection for price series
//!
//! Finds the dominant horizontal levels and sloped trend lines of a price series.
//! Local reversal points are detected with a sliding window, scored by how many
//! other reversal points agree with them, and the strongest non-redundant
//! clusters are turned into lines.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, NaiveDate};
//! use trendscope::prelude::*;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let closes = [10.0, 8.0, 6.0, 8.0, 10.0, 8.0, 6.0, 8.0, 10.0];
//! let bars: Vec<Candle> = closes
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &close)| Candle::flat(start + Duration::days(i as i64), close))
//!     .collect();
//!
//! let analyzer = AnalyzerBuilder::new().build().unwrap();
//! let lines = analyzer.analyze(&bars).unwrap();
//!
//! assert_eq!(lines.horizontal, vec![6.0]);
//! for line in lines.descriptors() {
//!     println!("{line:?}");
//! }
//! ```

use chrono::NaiveDate;
use log::debug;

pub mod lines;
pub mod params;
pub mod resample;

pub mod prelude {
    pub use crate::{
        // Stages
        lines::*,
        // Parameters
        params::{get_count, get_tolerance, get_window, ParamMeta, ParamType, Parameterized},
        // Bars
        resample::{clean, resample, Timeframe},
        // Engine
        AnalyzerBuilder,
        Candle,
        LineConfig,
        // Output
        LineDescriptor,
        LinePoint,
        OHLCVExt,
        PricePoint,
        // Errors
        Result,
        ReversalGroup,
        ReversalKind,
        ReversalPoint,
        Tolerance,
        TrendAnalyzer,
        TrendConfig,
        TrendError,
        TrendLine,
        TrendLines,
        Window,
        OHLCV,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, TrendError>;

/// Errors that can occur during trend line detection
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrendError {
    #[error("Invalid reversal window {window}: must be odd and >= 3")]
    InvalidWindow { window: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data: need {need} bars, got {got}")]
    InsufficientData { need: usize, got: usize },

    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: &'static str },

    #[error("Degenerate line: both points sit on day offset {day}")]
    DegenerateLine { day: i64 },

    #[error("Line fitter called with an empty cluster")]
    EmptyCluster,

    #[error("No valid data remaining after cleaning")]
    NoValidData,
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Relative tolerance in range (0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Create a new Tolerance, validating the value is in (0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(TrendError::InvalidValue(
                "Tolerance cannot be NaN or infinite",
            ));
        }
        if value <= 0.0 || value > 1.0 {
            return Err(TrendError::OutOfRange {
                field: "Tolerance",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a Tolerance from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Tolerance {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Tolerance {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Tolerance::new(value).map_err(serde::de::Error::custom)
    }
}

/// Reversal window length (odd, >= 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Window(usize);

impl Window {
    /// Create a new Window, validating the value is odd and at least 3
    pub fn new(value: usize) -> Result<Self> {
        if value < 3 || value % 2 == 0 {
            return Err(TrendError::InvalidWindow { window: value });
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }

    /// Offset of the center bar inside the window
    #[inline]
    pub fn center(self) -> usize {
        (self.0 - 1) / 2
    }
}

impl serde::Serialize for Window {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Window {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Window::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core OHLCV data trait
///
/// Only `date` and `close` feed the line detection; the other fields are
/// used by validation and timeframe aggregation.
pub trait OHLCV {
    fn date(&self) -> NaiveDate;
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;

    fn volume(&self) -> f64 {
        0.0
    }
}

/// Extension trait with computed properties for OHLCV data
pub trait OHLCVExt: OHLCV {
    /// The close price as a dated point
    #[inline]
    fn price_point(&self) -> PricePoint {
        PricePoint::new(self.date(), self.close())
    }

    #[inline]
    fn is_finite(&self) -> bool {
        self.open().is_finite()
            && self.high().is_finite()
            && self.low().is_finite()
            && self.close().is_finite()
    }

    /// Validate OHLCV data consistency
    fn validate(&self) -> Result<()> {
        if !self.is_finite() {
            return Err(TrendError::InvalidBar {
                index: 0,
                reason: "NaN or infinite value in OHLC",
            });
        }
        if self.high() < self.low() {
            return Err(TrendError::InvalidBar {
                index: 0,
                reason: "high < low",
            });
        }
        // log-space fitting needs a strictly positive close
        if self.close() <= 0.0 {
            return Err(TrendError::InvalidBar {
                index: 0,
                reason: "close must be positive",
            });
        }
        Ok(())
    }
}

impl<T: OHLCV> OHLCVExt for T {}

/// Plain daily (or aggregated) bar
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Bar whose open, high, low and close are all `price`
    pub fn flat(date: NaiveDate, price: f64) -> Self {
        Self::new(date, price, price, price, price, 0.0)
    }

    pub fn from_bar<T: OHLCV>(bar: &T) -> Self {
        Self::new(
            bar.date(),
            bar.open(),
            bar.high(),
            bar.low(),
            bar.close(),
            bar.volume(),
        )
    }
}

impl OHLCV for Candle {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}

// ============================================================
// DATA MODEL
// ============================================================

/// One dated price of the analyzed series
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl PricePoint {
    #[inline]
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Classification of a reversal point
///
/// `Both` only occurs when every value in the window is equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ReversalKind {
    Top,
    Bottom,
    Both,
}

impl ReversalKind {
    #[inline]
    pub fn is_top(self) -> bool {
        matches!(self, ReversalKind::Top | ReversalKind::Both)
    }

    #[inline]
    pub fn is_bottom(self) -> bool {
        matches!(self, ReversalKind::Bottom | ReversalKind::Both)
    }
}

/// A detected local extremum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReversalPoint {
    /// Position of the point in the analyzed series
    pub index: usize,
    pub point: PricePoint,
    pub kind: ReversalKind,
}

/// Which reversal points a diagonal line was fitted through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ReversalGroup {
    /// Topping points (resistance)
    Tops,
    /// Bottoming points (support)
    Bottoms,
}

/// Endpoint of a drawn line
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Final output handed to a renderer
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineDescriptor {
    /// Full-width horizontal line
    Horizontal { price_level: f64 },
    /// Sloped line from the first bar to the last bar
    Diagonal { start: LinePoint, end: LinePoint },
}

/// An accepted diagonal line with its fit statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub group: ReversalGroup,
    /// log10(price) change per day
    pub slope: f64,
    /// log10(price) at day 0
    pub intercept: f64,
    pub weight: usize,
    pub fit_error: f64,
    /// The two reversal points that defined the line
    pub anchors: (PricePoint, PricePoint),
    pub start: LinePoint,
    pub end: LinePoint,
}

impl TrendLine {
    /// Build the drawable line for a selected pair, spanning the whole axis
    pub fn new(group: ReversalGroup, pair: &lines::WeightedLinePair, axis: &lines::DayAxis) -> Self {
        let line = pair.line();
        Self {
            group,
            slope: pair.slope,
            intercept: pair.intercept,
            weight: pair.weight,
            fit_error: pair.fit_error,
            anchors: (pair.a, pair.b),
            start: LinePoint {
                date: axis.origin(),
                price: line.price_at(0.0),
            },
            end: LinePoint {
                date: axis.last(),
                price: line.price_at(axis.span() as f64),
            },
        }
    }

    #[inline]
    pub fn descriptor(&self) -> LineDescriptor {
        LineDescriptor::Diagonal {
            start: self.start,
            end: self.end,
        }
    }
}

/// Lines accepted by one analysis call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendLines {
    /// Horizontal price levels, strongest first
    pub horizontal: Vec<f64>,
    /// Diagonal lines, strongest first
    pub diagonal: Vec<TrendLine>,
}

impl TrendLines {
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.diagonal.is_empty()
    }

    pub fn len(&self) -> usize {
        self.horizontal.len() + self.diagonal.len()
    }

    /// All lines as renderer descriptors, horizontal first
    pub fn descriptors(&self) -> impl Iterator<Item = LineDescriptor> + '_ {
        self.horizontal
            .iter()
            .map(|&price_level| LineDescriptor::Horizontal { price_level })
            .chain(self.diagonal.iter().map(TrendLine::descriptor))
    }
}

// ============================================================
// CONFIGURATION
// ============================================================

use lines::helpers::{
    DEFAULT_DIAGONAL_DUPLICATE, DEFAULT_DIAGONAL_LINES, DEFAULT_DIAGONAL_MIN_WEIGHT,
    DEFAULT_HORIZONTAL_DUPLICATE, DEFAULT_HORIZONTAL_LINES, DEFAULT_HORIZONTAL_MIN_WEIGHT,
    DEFAULT_NOISE_THRESHOLD, DEFAULT_REVERSAL_WINDOW, DIAGONAL_NOISE_WEIGHT,
    HORIZONTAL_NOISE_WEIGHT,
};

/// Selection settings for one line type
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LineConfig {
    /// Relative tolerance for two points or lines to count as consistent
    pub noise_threshold: Tolerance,
    /// Relative tolerance under which a fitted line duplicates an accepted one
    pub duplicate_tolerance: Tolerance,
    /// Maximum number of lines to accept
    pub lines_to_draw: usize,
    /// Candidates lighter than this end the selection
    pub min_weight: usize,
}

impl LineConfig {
    pub const fn horizontal() -> Self {
        Self {
            noise_threshold: Tolerance::new_const(DEFAULT_NOISE_THRESHOLD),
            duplicate_tolerance: Tolerance::new_const(DEFAULT_HORIZONTAL_DUPLICATE),
            lines_to_draw: DEFAULT_HORIZONTAL_LINES,
            min_weight: DEFAULT_HORIZONTAL_MIN_WEIGHT,
        }
    }

    pub const fn diagonal() -> Self {
        Self {
            noise_threshold: Tolerance::new_const(DEFAULT_NOISE_THRESHOLD),
            duplicate_tolerance: Tolerance::new_const(DEFAULT_DIAGONAL_DUPLICATE),
            lines_to_draw: DEFAULT_DIAGONAL_LINES,
            min_weight: DEFAULT_DIAGONAL_MIN_WEIGHT,
        }
    }

    fn validate(&self, kind: &str, noise_weight: usize) -> Result<()> {
        if self.min_weight <= noise_weight {
            return Err(TrendError::InvalidConfig(format!(
                "{kind}.min_weight must exceed {noise_weight}, got {}",
                self.min_weight
            )));
        }
        Ok(())
    }
}

/// A line block as loaded; missing fields come from the preset
#[derive(Debug, serde::Deserialize)]
struct PartialLineConfig {
    noise_threshold: Option<Tolerance>,
    duplicate_tolerance: Option<Tolerance>,
    lines_to_draw: Option<usize>,
    min_weight: Option<usize>,
}

impl PartialLineConfig {
    fn over(self, preset: LineConfig) -> LineConfig {
        LineConfig {
            noise_threshold: self.noise_threshold.unwrap_or(preset.noise_threshold),
            duplicate_tolerance: self.duplicate_tolerance.unwrap_or(preset.duplicate_tolerance),
            lines_to_draw: self.lines_to_draw.unwrap_or(preset.lines_to_draw),
            min_weight: self.min_weight.unwrap_or(preset.min_weight),
        }
    }
}

fn deserialize_horizontal<'de, D: serde::Deserializer<'de>>(
    d: D,
) -> std::result::Result<LineConfig, D::Error> {
    let partial = <PartialLineConfig as serde::Deserialize>::deserialize(d)?;
    Ok(partial.over(LineConfig::horizontal()))
}

fn deserialize_diagonal<'de, D: serde::Deserializer<'de>>(
    d: D,
) -> std::result::Result<LineConfig, D::Error> {
    let partial = <PartialLineConfig as serde::Deserialize>::deserialize(d)?;
    Ok(partial.over(LineConfig::diagonal()))
}

/// Full analysis configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub reversal_window: Window,
    /// Bars are aggregated to this timeframe before detection
    pub timeframe: resample::Timeframe,
    /// Check every bar (and date ordering) before analysis
    pub validate_data: bool,
    #[serde(deserialize_with = "deserialize_horizontal")]
    pub horizontal: LineConfig,
    #[serde(deserialize_with = "deserialize_diagonal")]
    pub diagonal: LineConfig,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            reversal_window: Window::new_const(DEFAULT_REVERSAL_WINDOW),
            timeframe: resample::Timeframe::Daily,
            validate_data: true,
            horizontal: LineConfig::horizontal(),
            diagonal: LineConfig::diagonal(),
        }
    }
}

impl TrendConfig {
    pub fn validate(&self) -> Result<()> {
        self.horizontal
            .validate("horizontal", HORIZONTAL_NOISE_WEIGHT)?;
        self.diagonal.validate("diagonal", DIAGONAL_NOISE_WEIGHT)?;
        Ok(())
    }
}

// ============================================================
// TREND ANALYZER
// ============================================================

use lines::{select_levels, select_trend_lines, DayAxis, ReversalDetector, Reversals};

/// Main trend line detection engine
///
/// Immutable once built; every call owns its intermediate state.
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    config: TrendConfig,
    detector: ReversalDetector,
}

impl TrendAnalyzer {
    pub fn new(config: TrendConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            detector: ReversalDetector::with_window(config.reversal_window),
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// Detect reversal points of the (aggregated) series.
    ///
    /// A series shorter than the window yields no points.
    pub fn reversals<T: OHLCV>(&self, bars: &[T]) -> Result<Reversals> {
        let series = self.prepare(bars)?;
        Ok(self.detector.detect(&series).collect())
    }

    /// Find horizontal levels and diagonal trend lines.
    ///
    /// A series shorter than the reversal window is not an error: the
    /// result is simply empty.
    pub fn analyze<T: OHLCV>(&self, bars: &[T]) -> Result<TrendLines> {
        let series = self.prepare(bars)?;
        let need = self.detector.window().get();
        if series.len() < need {
            debug!(
                "{}",
                TrendError::InsufficientData {
                    need,
                    got: series.len()
                }
            );
            return Ok(TrendLines::default());
        }

        let reversals: Reversals = self.detector.detect(&series).collect();
        debug!(
            "detected {} tops and {} bottoms in {} {} bars",
            reversals.tops.len(),
            reversals.bottoms.len(),
            series.len(),
            self.config.timeframe.label()
        );

        let horizontal = select_levels(&reversals.values(), &self.config.horizontal)?;

        let axis = match (series.first(), series.last()) {
            (Some(first), Some(last)) => DayAxis::new(first.date, last.date),
            _ => return Ok(TrendLines::default()),
        };
        let diagonal = select_trend_lines(&reversals, &axis, &self.config.diagonal)?;

        debug!(
            "accepted {} horizontal and {} diagonal lines",
            horizontal.len(),
            diagonal.len()
        );

        Ok(TrendLines {
            horizontal,
            diagonal,
        })
    }

    // ===========================================
    // Internal helpers
    // ===========================================

    fn prepare<T: OHLCV>(&self, bars: &[T]) -> Result<Vec<PricePoint>> {
        if self.config.validate_data {
            validate_bars(bars)?;
        }

        let series = match self.config.timeframe {
            resample::Timeframe::Daily => bars.iter().map(|bar| bar.price_point()).collect(),
            timeframe => resample::resample(bars, timeframe)
                .iter()
                .map(|bar| bar.price_point())
                .collect(),
        };
        Ok(series)
    }
}

/// Validate every bar and require strictly increasing dates
pub fn validate_bars<T: OHLCV>(bars: &[T]) -> Result<()> {
    for (i, bar) in bars.iter().enumerate() {
        bar.validate().map_err(|e| match e {
            TrendError::InvalidBar { reason, .. } => TrendError::InvalidBar { index: i, reason },
            other => other,
        })?;
        if i > 0 && bar.date() <= bars[i - 1].date() {
            return Err(TrendError::InvalidBar {
                index: i,
                reason: "dates must be strictly increasing",
            });
        }
    }
    Ok(())
}

// ============================================================
// BUILDER
// ============================================================

/// Unvalidated settings for one line type
#[derive(Debug, Clone, Copy)]
struct RawLineConfig {
    noise_threshold: f64,
    duplicate_tolerance: f64,
    lines_to_draw: usize,
    min_weight: usize,
}

impl From<LineConfig> for RawLineConfig {
    fn from(config: LineConfig) -> Self {
        Self {
            noise_threshold: config.noise_threshold.get(),
            duplicate_tolerance: config.duplicate_tolerance.get(),
            lines_to_draw: config.lines_to_draw,
            min_weight: config.min_weight,
        }
    }
}

impl RawLineConfig {
    fn build(self) -> Result<LineConfig> {
        Ok(LineConfig {
            noise_threshold: Tolerance::new(self.noise_threshold)?,
            duplicate_tolerance: Tolerance::new(self.duplicate_tolerance)?,
            lines_to_draw: self.lines_to_draw,
            min_weight: self.min_weight,
        })
    }
}

/// Builder for creating TrendAnalyzer instances
///
/// Values are checked in [`AnalyzerBuilder::build`].
#[derive(Debug, Clone)]
pub struct AnalyzerBuilder {
    reversal_window: usize,
    timeframe: resample::Timeframe,
    validate_data: bool,
    horizontal: RawLineConfig,
    diagonal: RawLineConfig,
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self::from_config(TrendConfig::default())
    }

    /// Start from an existing configuration
    pub fn from_config(config: TrendConfig) -> Self {
        Self {
            reversal_window: config.reversal_window.get(),
            timeframe: config.timeframe,
            validate_data: config.validate_data,
            horizontal: config.horizontal.into(),
            diagonal: config.diagonal.into(),
        }
    }

    pub fn reversal_window(mut self, window: usize) -> Self {
        self.reversal_window = window;
        self
    }

    pub fn timeframe(mut self, timeframe: resample::Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    /// Enable/disable bar validation
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.validate_data = enable;
        self
    }

    /// Set the clustering tolerance for both line types
    pub fn noise_threshold(mut self, threshold: f64) -> Self {
        self.horizontal.noise_threshold = threshold;
        self.diagonal.noise_threshold = threshold;
        self
    }

    pub fn horizontal_noise(mut self, threshold: f64) -> Self {
        self.horizontal.noise_threshold = threshold;
        self
    }

    pub fn horizontal_duplicate_tolerance(mut self, tolerance: f64) -> Self {
        self.horizontal.duplicate_tolerance = tolerance;
        self
    }

    pub fn horizontal_lines(mut self, count: usize) -> Self {
        self.horizontal.lines_to_draw = count;
        self
    }

    pub fn horizontal_min_weight(mut self, weight: usize) -> Self {
        self.horizontal.min_weight = weight;
        self
    }

    pub fn diagonal_noise(mut self, threshold: f64) -> Self {
        self.diagonal.noise_threshold = threshold;
        self
    }

    pub fn diagonal_duplicate_tolerance(mut self, tolerance: f64) -> Self {
        self.diagonal.duplicate_tolerance = tolerance;
        self
    }

    pub fn diagonal_lines(mut self, count: usize) -> Self {
        self.diagonal.lines_to_draw = count;
        self
    }

    pub fn diagonal_min_weight(mut self, weight: usize) -> Self {
        self.diagonal.min_weight = weight;
        self
    }

    /// Validate the settings into a configuration
    pub fn config(&self) -> Result<TrendConfig> {
        Ok(TrendConfig {
            reversal_window: Window::new(self.reversal_window)?,
            timeframe: self.timeframe,
            validate_data: self.validate_data,
            horizontal: self.horizontal.build()?,
            diagonal: self.diagonal.build()?,
        })
    }

    /// Build the analyzer
    pub fn build(self) -> Result<TrendAnalyzer> {
        TrendAnalyzer::new(self.config()?)
    }
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n)
    }

    fn make_bars(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::flat(day(i as i64), c))
            .collect()
    }

    #[test]
    fn test_tolerance_validation() {
        assert!(Tolerance::new(0.05).is_ok());
        assert!(Tolerance::new(1.0).is_ok());
        assert!(Tolerance::new(0.0).is_err());
        assert!(Tolerance::new(-0.1).is_err());
        assert!(Tolerance::new(1.1).is_err());
        assert!(Tolerance::new(f64::NAN).is_err());
        assert!(Tolerance::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_window_validation() {
        assert_eq!(Window::new(5).unwrap().center(), 2);
        assert_eq!(Window::new(3).unwrap().center(), 1);
        assert_eq!(Window::new(4), Err(TrendError::InvalidWindow { window: 4 }));
        assert_eq!(Window::new(1), Err(TrendError::InvalidWindow { window: 1 }));
        assert!(Window::new(0).is_err());
    }

    #[test]
    fn test_bar_validation() {
        let good = Candle::new(day(0), 10.0, 11.0, 9.0, 10.5, 0.0);
        assert!(good.validate().is_ok());

        let inverted = Candle::new(day(0), 10.0, 9.0, 11.0, 10.5, 0.0);
        assert!(inverted.validate().is_err());

        let nan = Candle::new(day(0), f64::NAN, 11.0, 9.0, 10.5, 0.0);
        assert!(nan.validate().is_err());

        let zero = Candle::flat(day(0), 0.0);
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_validate_bars_reports_index() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars[2].close = -1.0;
        assert_eq!(
            validate_bars(&bars),
            Err(TrendError::InvalidBar {
                index: 2,
                reason: "close must be positive"
            })
        );
    }

    #[test]
    fn test_validate_bars_rejects_unordered_dates() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars[1].date = day(0);
        let err = validate_bars(&bars).unwrap_err();
        assert!(matches!(err, TrendError::InvalidBar { index: 1, .. }));
    }

    #[test]
    fn test_default_config() {
        let config = TrendConfig::default();
        assert_eq!(config.reversal_window.get(), 5);
        assert_eq!(config.horizontal.lines_to_draw, 3);
        assert_eq!(config.diagonal.lines_to_draw, 2);
        assert_eq!(
            config.diagonal.duplicate_tolerance.get(),
            2.0 * config.diagonal.noise_threshold.get()
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_noise_min_weight() {
        let mut config = TrendConfig::default();
        config.horizontal.min_weight = 1;
        assert!(matches!(
            config.validate(),
            Err(TrendError::InvalidConfig(_))
        ));

        let mut config = TrendConfig::default();
        config.diagonal.min_weight = 2;
        assert!(TrendAnalyzer::new(config).is_err());
    }

    #[test]
    fn test_builder() {
        let analyzer = AnalyzerBuilder::new()
            .reversal_window(7)
            .noise_threshold(0.08)
            .horizontal_lines(1)
            .diagonal_duplicate_tolerance(0.16)
            .build()
            .unwrap();

        let config = analyzer.config();
        assert_eq!(config.reversal_window.get(), 7);
        assert_eq!(config.horizontal.noise_threshold.get(), 0.08);
        assert_eq!(config.diagonal.noise_threshold.get(), 0.08);
        assert_eq!(config.horizontal.lines_to_draw, 1);
        assert_eq!(config.diagonal.duplicate_tolerance.get(), 0.16);
    }

    #[test]
    fn test_builder_rejects_even_window() {
        let result = AnalyzerBuilder::new().reversal_window(6).build();
        assert!(matches!(result, Err(TrendError::InvalidWindow { window: 6 })));
    }

    #[test]
    fn test_builder_rejects_bad_tolerance() {
        assert!(AnalyzerBuilder::new().horizontal_noise(0.0).build().is_err());
        assert!(AnalyzerBuilder::new()
            .diagonal_duplicate_tolerance(f64::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn test_empty_analyze() {
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        let bars: Vec<Candle> = vec![];
        let lines = analyzer.analyze(&bars).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_detector_follows_configured_window() {
        let analyzer = AnalyzerBuilder::new()
            .reversal_window(7)
            .timeframe(resample::Timeframe::Weekly)
            .build()
            .unwrap();
        assert_eq!(analyzer.detector.window(), analyzer.config().reversal_window);
        assert_eq!(analyzer.config().timeframe.label(), "1w");
    }

    #[test]
    fn test_short_series_is_empty_not_error() {
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        let lines = analyzer.analyze(&make_bars(&[10.0, 9.0, 8.0, 9.0])).unwrap();
        assert!(lines.is_empty());
        assert_eq!(lines.len(), 0);
    }

    #[test]
    fn test_invalid_bar_fails_whole_call() {
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        let mut bars = make_bars(&[10.0, 8.0, 6.0, 8.0, 10.0, 8.0, 6.0]);
        bars[3].close = f64::NAN;
        assert!(analyzer.analyze(&bars).is_err());
    }

    #[test]
    fn test_analyze_double_bottom() {
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        let bars = make_bars(&[10.0, 8.0, 6.0, 8.0, 10.0, 8.0, 6.0, 8.0, 10.0]);

        let lines = analyzer.analyze(&bars).unwrap();
        assert_eq!(lines.horizontal, vec![6.0]);
        // two bottoms only define a line, they do not confirm one
        assert!(lines.diagonal.is_empty());

        let descriptors: Vec<_> = lines.descriptors().collect();
        assert_eq!(
            descriptors,
            vec![LineDescriptor::Horizontal { price_level: 6.0 }]
        );
    }

    #[test]
    fn test_reversals() {
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        let bars = make_bars(&[10.0, 8.0, 6.0, 8.0, 10.0, 8.0, 6.0, 8.0, 10.0]);
        let reversals = analyzer.reversals(&bars).unwrap();
        assert_eq!(reversals.tops.len(), 1);
        assert_eq!(reversals.bottoms.len(), 2);
    }

    #[test]
    fn test_trend_line_spans_series() {
        let axis = DayAxis::new(day(0), day(100));
        let a = PricePoint::new(day(0), 100.0);
        let b = PricePoint::new(day(50), 200.0);
        let line = lines::LogLine::through(0, a.value, 50, b.value).unwrap();
        let pair = lines::WeightedLinePair {
            weight: 3,
            a,
            b,
            slope: line.slope,
            intercept: line.intercept,
            fit_error: 0.0,
        };

        let trend = TrendLine::new(ReversalGroup::Bottoms, &pair, &axis);
        assert_eq!(trend.start.date, day(0));
        assert_eq!(trend.end.date, day(100));
        assert!((trend.start.price - 100.0).abs() < 1e-9);
        assert!((trend.end.price - 400.0).abs() < 1e-9);
        assert!(matches!(trend.descriptor(), LineDescriptor::Diagonal { .. }));
    }
}
