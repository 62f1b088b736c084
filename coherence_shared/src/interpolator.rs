//! Interpolation strategies.
//!
//! A strategy blends four consecutive samples `v0..v3` into one value between
//! `v1` and `v2`, and states how many samples it needs behind the playback
//! cursor. Strategies are picked from configuration via [`InterpolatorKind`]
//! or injected directly.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::{error::InterpolationError, value::BindingValue};

/// Blends buffered samples of type `T`.
pub trait Interpolator<T>: Send + Sync {
    fn name(&self) -> &'static str;

    /// Samples kept behind the playback cursor.
    fn number_of_samples_to_stay_behind(&self) -> usize;

    /// Whether this strategy can blend `T`.
    fn supports(&self) -> bool {
        true
    }

    /// Blends between `v1` (t = 0) and `v2` (t = 1); `t > 1` extrapolates.
    fn interpolate(&self, v0: T, v1: T, v2: T, v3: T, t: f64) -> T;
}

/// Built-in strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InterpolatorKind {
    /// Pass-through, the newest sample wins.
    None,
    #[default]
    Linear,
    /// Catmull-Rom spline through neighbouring samples.
    Spline,
}

impl InterpolatorKind {
    pub fn name(self) -> &'static str {
        match self {
            InterpolatorKind::None => "none",
            InterpolatorKind::Linear => "linear",
            InterpolatorKind::Spline => "spline",
        }
    }

    /// Instantiates the strategy for `T`, failing if it cannot blend `T`.
    pub fn build<T: BindingValue>(self) -> Result<Box<dyn Interpolator<T>>, InterpolationError> {
        let interpolator: Box<dyn Interpolator<T>> = match self {
            InterpolatorKind::None => Box::new(NoInterpolation::<T>::new()),
            InterpolatorKind::Linear => Box::new(LinearInterpolation::<T>::new()),
            InterpolatorKind::Spline => Box::new(SplineInterpolation::<T>::new()),
        };
        ensure_supported(interpolator.as_ref())?;
        Ok(interpolator)
    }
}

/// Fails with [`InterpolationError::UnsupportedType`] if `interpolator` cannot blend `T`.
pub fn ensure_supported<T: BindingValue>(
    interpolator: &dyn Interpolator<T>,
) -> Result<(), InterpolationError> {
    if interpolator.supports() {
        Ok(())
    } else {
        Err(InterpolationError::UnsupportedType {
            interpolator: interpolator.name(),
            type_name: T::TYPE_NAME,
        })
    }
}

/// Returns the newest bracket sample unchanged.
#[derive(Debug, Default)]
pub struct NoInterpolation<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> NoInterpolation<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: BindingValue> Interpolator<T> for NoInterpolation<T> {
    fn name(&self) -> &'static str {
        InterpolatorKind::None.name()
    }

    fn number_of_samples_to_stay_behind(&self) -> usize {
        0
    }

    fn interpolate(&self, _v0: T, _v1: T, v2: T, _v3: T, _t: f64) -> T {
        v2
    }
}

/// Straight blend between the two bracket samples.
#[derive(Debug, Default)]
pub struct LinearInterpolation<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> LinearInterpolation<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: BindingValue> Interpolator<T> for LinearInterpolation<T> {
    fn name(&self) -> &'static str {
        InterpolatorKind::Linear.name()
    }

    fn number_of_samples_to_stay_behind(&self) -> usize {
        1
    }

    fn interpolate(&self, _v0: T, v1: T, v2: T, _v3: T, t: f64) -> T {
        T::lerp(v1, v2, t)
    }
}

/// Catmull-Rom spline; needs one extra sample of history.
#[derive(Debug, Default)]
pub struct SplineInterpolation<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> SplineInterpolation<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: BindingValue> Interpolator<T> for SplineInterpolation<T> {
    fn name(&self) -> &'static str {
        InterpolatorKind::Spline.name()
    }

    fn number_of_samples_to_stay_behind(&self) -> usize {
        2
    }

    fn supports(&self) -> bool {
        T::SUPPORTS_SPLINE
    }

    fn interpolate(&self, v0: T, v1: T, v2: T, v3: T, t: f64) -> T {
        T::catmull_rom(v0, v1, v2, v3, t).unwrap_or_else(|| T::lerp(v1, v2, t))
    }
}
