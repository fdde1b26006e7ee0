// trackline_core/src/error.rs

use thiserror::Error;

/// Rejected tuning parameters. Raised at construction time only; the
/// per-frame pipeline itself never fails.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{name}` must be finite and greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("`{name}` must be finite and not negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("`{name}` must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("`min_reverse_speed` ({0}) must not be positive")]
    PositiveReverseCap(f64),

    #[error("`turn_min` ({turn_min}) must not exceed `turn_rate` ({turn_rate})")]
    TurnRange { turn_min: f64, turn_rate: f64 },
}

/// A control name that does not map to any driver control.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown control name '{0}'")]
pub struct ControlParseError(pub String);

/// Shared checks used by every parameter struct's `validate`.
pub(crate) fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

pub(crate) fn in_range(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

/// Malformed track geometry handed to [`crate::terrain::TrackGeometry`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("triangle {triangle} references vertex {index}, but the part has {len} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        len: usize,
    },

    #[error("track geometry exceeds {max} vertices")]
    TooManyVertices { max: usize },
}
