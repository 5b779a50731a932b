//! Editor configuration parsed from environment variables.
//!
//! Every knob has a default, so `EditorConfig::default()` is a complete,
//! working configuration. `from_env` overlays whatever the host sets:
//!
//! - `TACTIC_MAX_HISTORY`: retained undo snapshots (default 50, minimum 1)
//! - `TACTIC_MIN_ARROW_LENGTH`: degenerate-arrow threshold (default 10)
//! - `TACTIC_ARROW_CLICKS`: `three` (default) or `two`
//! - `TACTIC_PITCH_ORIENTATION`: `horizontal` (default) or `vertical`
//! - `TACTIC_TWO_CLICK_CURVE_OFFSET`: bend used by two-click arrows (default 30)

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{CONTROL_OFFSET_RATIO, MAX_HISTORY_LENGTH, MIN_ARROW_LENGTH, TWO_CLICK_CURVE_OFFSET};
use crate::formation::Orientation;
use crate::input::ArrowClicks;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported value for {key}: '{value}'")]
    Parse { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    pub max_history: usize,
    pub min_arrow_length: f64,
    pub arrow_clicks: ArrowClicks,
    pub orientation: Orientation,
    /// Perpendicular bend as a fraction of chord length for three-click arrows.
    pub control_offset_ratio: f64,
    /// Fixed perpendicular bend for two-click arrows.
    pub two_click_curve_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: MAX_HISTORY_LENGTH,
            min_arrow_length: MIN_ARROW_LENGTH,
            arrow_clicks: ArrowClicks::Three,
            orientation: Orientation::Horizontal,
            control_offset_ratio: CONTROL_OFFSET_RATIO,
            two_click_curve_offset: TWO_CLICK_CURVE_OFFSET,
        }
    }
}

impl EditorConfig {
    /// Build config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if an enum-valued variable holds an
    /// unknown value. Unparseable numbers fall back to their defaults, as do
    /// non-finite or negative lengths.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(v) => Some(v),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup. Used by `from_env` and tests.
    ///
    /// # Errors
    ///
    /// See [`EditorConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let arrow_clicks = parse_arrow_clicks(lookup("TACTIC_ARROW_CLICKS").as_deref())?;
        let orientation = parse_orientation(lookup("TACTIC_PITCH_ORIENTATION").as_deref())?;
        Ok(Self {
            max_history: parse_or(&lookup, "TACTIC_MAX_HISTORY", defaults.max_history).max(1),
            min_arrow_length: parse_distance(&lookup, "TACTIC_MIN_ARROW_LENGTH", defaults.min_arrow_length),
            arrow_clicks,
            orientation,
            control_offset_ratio: defaults.control_offset_ratio,
            two_click_curve_offset: parse_distance(
                &lookup,
                "TACTIC_TWO_CLICK_CURVE_OFFSET",
                defaults.two_click_curve_offset,
            ),
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().parse::<T>()) {
        Some(Ok(v)) => v,
        _ => default,
    }
}

/// Like `parse_or`, but only finite, non-negative lengths are accepted.
fn parse_distance<F>(lookup: &F, key: &str, default: f64) -> f64
where
    F: Fn(&str) -> Option<String>,
{
    let v = parse_or(lookup, key, default);
    if v.is_finite() && v >= 0.0 { v } else { default }
}

fn parse_arrow_clicks(raw: Option<&str>) -> Result<ArrowClicks, ConfigError> {
    match raw.unwrap_or("three") {
        "three" | "3" => Ok(ArrowClicks::Three),
        "two" | "2" => Ok(ArrowClicks::Two),
        other => Err(ConfigError::Parse { key: "TACTIC_ARROW_CLICKS", value: other.to_string() }),
    }
}

fn parse_orientation(raw: Option<&str>) -> Result<Orientation, ConfigError> {
    match raw.unwrap_or("horizontal") {
        "horizontal" => Ok(Orientation::Horizontal),
        "vertical" => Ok(Orientation::Vertical),
        other => Err(ConfigError::Parse { key: "TACTIC_PITCH_ORIENTATION", value: other.to_string() }),
    }
}
