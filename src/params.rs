//! Parameter metadata for the trend analysis
//!
//! This module describes every numeric setting of [`TrendConfig`], enabling:
//! - Parameter documentation
//! - Configuration from flat key/value sources (command lines, env, query strings)
//! - Automatic configuration UI generation
//!
//! Line settings are addressed as `horizontal.<field>` and `diagonal.<field>`.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use trendscope::params::Parameterized;
//! use trendscope::TrendConfig;
//!
//! for param in TrendConfig::param_meta() {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//!
//! let mut params = HashMap::new();
//! params.insert("reversal_window", 7.0);
//! params.insert("diagonal.lines_to_draw", 1.0);
//! let config = TrendConfig::with_params(&params).unwrap();
//! assert_eq!(config.reversal_window.get(), 7);
//! ```

use std::collections::HashMap;

use crate::lines::helpers::{
  DEFAULT_DIAGONAL_DUPLICATE, DEFAULT_DIAGONAL_LINES, DEFAULT_DIAGONAL_MIN_WEIGHT,
  DEFAULT_HORIZONTAL_DUPLICATE, DEFAULT_HORIZONTAL_LINES, DEFAULT_HORIZONTAL_MIN_WEIGHT,
  DEFAULT_NOISE_THRESHOLD, DEFAULT_REVERSAL_WINDOW,
};
use crate::{LineConfig, Result, Tolerance, TrendConfig, TrendError, Window};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Reversal window (odd integer >= 3)
  Window,
  /// Relative tolerance in (0.0, 1.0]
  Tolerance,
  /// Non-negative integer
  Count,
}

/// Metadata for a single parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter key (e.g., "horizontal.noise_threshold")
  pub name: &'static str,
  pub param_type: ParamType,
  pub default: f64,
  /// Accepted range: (min, max)
  pub range: (f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  pub const fn window(
    name: &'static str,
    default: f64,
    range: (f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Window, default, range, description }
  }

  pub const fn tolerance(
    name: &'static str,
    default: f64,
    range: (f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Tolerance, default, range, description }
  }

  pub const fn count(
    name: &'static str,
    default: f64,
    range: (f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Count, default, range, description }
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    if value.is_nan() {
      return Err(TrendError::InvalidValue("parameter cannot be NaN"));
    }
    let (min, max) = self.range;
    if value < min || value > max {
      return Err(TrendError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      // (0, 1] bounds are enforced by Tolerance::new
      ParamType::Tolerance => Ok(()),
      ParamType::Window => {
        if value.fract() != 0.0 {
          return Err(TrendError::InvalidValue("window must be an integer"));
        }
        Window::new(value as usize).map(|_| ())
      },
      ParamType::Count => {
        if value.fract() != 0.0 {
          return Err(TrendError::InvalidValue("count must be a non-negative integer"));
        }
        Ok(())
      },
    }
  }
}

const TREND_PARAMS: &[ParamMeta] = &[
  ParamMeta::window(
    "reversal_window",
    DEFAULT_REVERSAL_WINDOW as f64,
    (3.0, 101.0),
    "Bars in the sliding window used to detect reversal points",
  ),
  ParamMeta::tolerance(
    "horizontal.noise_threshold",
    DEFAULT_NOISE_THRESHOLD,
    (0.0, 1.0),
    "Relative distance under which two reversal values support the same level",
  ),
  ParamMeta::tolerance(
    "horizontal.duplicate_tolerance",
    DEFAULT_HORIZONTAL_DUPLICATE,
    (0.0, 1.0),
    "Relative distance under which a level duplicates an accepted one",
  ),
  ParamMeta::count(
    "horizontal.lines_to_draw",
    DEFAULT_HORIZONTAL_LINES as f64,
    (0.0, 50.0),
    "Maximum number of horizontal levels",
  ),
  ParamMeta::count(
    "horizontal.min_weight",
    DEFAULT_HORIZONTAL_MIN_WEIGHT as f64,
    (2.0, 10_000.0),
    "Lightest cluster that may still produce a level",
  ),
  ParamMeta::tolerance(
    "diagonal.noise_threshold",
    DEFAULT_NOISE_THRESHOLD,
    (0.0, 1.0),
    "Relative deviation under which a reversal point lies on a line",
  ),
  ParamMeta::tolerance(
    "diagonal.duplicate_tolerance",
    DEFAULT_DIAGONAL_DUPLICATE,
    (0.0, 1.0),
    "Relative slope and intercept distance under which a line duplicates an accepted one",
  ),
  ParamMeta::count(
    "diagonal.lines_to_draw",
    DEFAULT_DIAGONAL_LINES as f64,
    (0.0, 50.0),
    "Maximum number of diagonal lines",
  ),
  ParamMeta::count(
    "diagonal.min_weight",
    DEFAULT_DIAGONAL_MIN_WEIGHT as f64,
    (3.0, 10_000.0),
    "Fewest reversal points a line must pass near",
  ),
];

// ============================================================
// PARAMETERIZED TRAIT
// ============================================================

/// Trait for configurations built from flat numeric parameters
pub trait Parameterized: Sized {
  /// Returns metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Creates a configuration from a HashMap
  ///
  /// Missing parameters use their default values; unknown keys are rejected.
  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;
}

impl Parameterized for TrendConfig {
  fn param_meta() -> &'static [ParamMeta] {
    TREND_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    for (&key, &value) in params {
      let meta = TREND_PARAMS
        .iter()
        .find(|meta| meta.name == key)
        .ok_or_else(|| TrendError::InvalidConfig(format!("unknown parameter: {key}")))?;
      meta.validate(value)?;
    }

    let defaults = TrendConfig::default();
    let config = TrendConfig {
      reversal_window: get_window(params, "reversal_window", defaults.reversal_window.get())?,
      horizontal: line_params(params, "horizontal", &defaults.horizontal)?,
      diagonal: line_params(params, "diagonal", &defaults.diagonal)?,
      ..defaults
    };
    config.validate()?;
    Ok(config)
  }
}

fn line_params(params: &HashMap<&str, f64>, prefix: &str, defaults: &LineConfig) -> Result<LineConfig> {
  let key = |field: &str| format!("{prefix}.{field}");
  Ok(LineConfig {
    noise_threshold: get_tolerance(
      params,
      &key("noise_threshold"),
      defaults.noise_threshold.get(),
    )?,
    duplicate_tolerance: get_tolerance(
      params,
      &key("duplicate_tolerance"),
      defaults.duplicate_tolerance.get(),
    )?,
    lines_to_draw: get_count(params, &key("lines_to_draw"), defaults.lines_to_draw)?,
    min_weight: get_count(params, &key("min_weight"), defaults.min_weight)?,
  })
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a Tolerance from params with default fallback
pub fn get_tolerance(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Tolerance> {
  let value = params.get(key).copied().unwrap_or(default);
  Tolerance::new(value)
}

/// Helper to get a Window from params with default fallback
pub fn get_window(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Window> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  if value < 0.0 || value.fract() != 0.0 {
    return Err(TrendError::InvalidValue("window must be a positive integer"));
  }
  Window::new(value as usize)
}

/// Helper to get a non-negative integer from params with default fallback
pub fn get_count(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<usize> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  if value < 0.0 || value.fract() != 0.0 {
    return Err(TrendError::InvalidValue("count must be a non-negative integer"));
  }
  Ok(value as usize)
}

// ============================================================
// TESTS
// ============================================================
