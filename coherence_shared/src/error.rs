//! Interpolation errors.
//!
//! Only programmer errors are reported here. Late, duplicate or missing
//! samples are handled by buffering policy and never surface as errors.

use std::fmt;

/// Error type for binding interpolation.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// The configured interpolation strategy cannot blend the bound type.
    UnsupportedType {
        interpolator: &'static str,
        type_name: &'static str,
    },
    /// Elapsed time went negative; the host clock is not monotonic.
    NegativeDeltaTime { delta: f64 },
}

impl fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationError::UnsupportedType {
                interpolator,
                type_name,
            } => write!(f, "interpolator '{interpolator}' does not support type {type_name}"),
            InterpolationError::NegativeDeltaTime { delta } => {
                write!(f, "negative delta time {delta}, clock must be monotonic")
            }
        }
    }
}

impl std::error::Error for InterpolationError {}
