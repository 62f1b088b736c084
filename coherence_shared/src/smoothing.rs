//! Critically damped smoothing.
//!
//! A spring-damper that follows a moving target without overshooting it.
//! Each scalar channel keeps its own velocity, owned by the caller and
//! carried across calls.

use crate::error::InterpolationError;

/// Lower bound for the smoothing time, avoids division by zero.
const MIN_SMOOTH_TIME: f64 = 0.0001;

/// Moves `current` towards `target`, updating `velocity` in place.
///
/// `max_speed` caps how fast the value can change per second. A non-finite
/// result snaps to `target` and zeroes the velocity.
pub fn smooth_damp_f64(
    current: f64,
    target: f64,
    velocity: &mut f64,
    smooth_time: f64,
    max_speed: f64,
    delta_time: f64,
) -> f64 {
    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * delta_time;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let original_target = target;
    let max_change = max_speed * smooth_time;
    let change = (current - target).clamp(-max_change, max_change);
    let target = current - change;

    let temp = (*velocity + omega * change) * delta_time;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Never overshoot the original target.
    if (original_target - current > 0.0) == (output > original_target) {
        output = original_target;
        *velocity = if delta_time > 0.0 {
            (output - original_target) / delta_time
        } else {
            0.0
        };
    }

    if !output.is_finite() || !velocity.is_finite() {
        *velocity = 0.0;
        return original_target;
    }

    output
}

/// Single precision [`smooth_damp_f64`].
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    delta_time: f32,
) -> f32 {
    let mut v = *velocity as f64;
    let output = smooth_damp_f64(
        current as f64,
        target as f64,
        &mut v,
        smooth_time as f64,
        max_speed as f64,
        delta_time as f64,
    );
    *velocity = v as f32;
    output as f32
}

/// Shortest signed difference between two angles in degrees, in `(-180, 180]`.
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// [`smooth_damp`] for angles in degrees, taking the shortest way around.
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    delta_time: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, max_speed, delta_time)
}

/// Rejects negative elapsed time before it reaches a filter.
pub fn check_delta_time(delta_time: f64) -> Result<f64, InterpolationError> {
    if delta_time < 0.0 {
        return Err(InterpolationError::NegativeDeltaTime { delta: delta_time });
    }
    Ok(delta_time)
}
