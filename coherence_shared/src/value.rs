//! Per-type capabilities of bindable values.
//!
//! Every type a binding can carry implements [`BindingValue`] once: how to
//! blend it, how far apart two values are for teleport detection, and how to
//! smooth it. Strategies and the interpolator stay generic over this trait.

use std::fmt;

use crate::{
    math::{Quat, Vec2, Vec3},
    smoothing::{smooth_damp, smooth_damp_angle, smooth_damp_f64},
};

/// Capabilities required from a value tracked by a binding interpolator.
pub trait BindingValue: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Name used in diagnostics and configuration errors.
    const TYPE_NAME: &'static str;

    /// Whether [`BindingValue::catmull_rom`] is available.
    const SUPPORTS_SPLINE: bool = false;

    /// Per-channel smoothing velocity.
    type Velocity: Copy + Default + fmt::Debug + Send + Sync;

    /// Linear blend. `t` outside `[0, 1]` extrapolates.
    fn lerp(from: Self, to: Self, t: f64) -> Self;

    /// Catmull-Rom blend between `p1` and `p2`.
    fn catmull_rom(_p0: Self, _p1: Self, _p2: Self, _p3: Self, _t: f64) -> Option<Self> {
        None
    }

    /// Whether `to` lies farther than `max_distance` from `from`.
    fn is_beyond_distance(from: &Self, to: &Self, max_distance: f32) -> bool;

    /// One smoothing step, or `None` when the type has no smoothing.
    fn smooth(
        _current: Self,
        _target: Self,
        _velocity: &mut Self::Velocity,
        _smooth_time: f32,
        _max_speed: f32,
        _delta_time: f32,
    ) -> Option<Self> {
        None
    }
}

fn catmull_rom_scalar(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

impl BindingValue for f32 {
    const TYPE_NAME: &'static str = "f32";
    const SUPPORTS_SPLINE: bool = true;
    type Velocity = f32;

    fn lerp(from: Self, to: Self, t: f64) -> Self {
        from + (to - from) * t as f32
    }

    fn catmull_rom(p0: Self, p1: Self, p2: Self, p3: Self, t: f64) -> Option<Self> {
        Some(catmull_rom_scalar(p0 as f64, p1 as f64, p2 as f64, p3 as f64, t) as f32)
    }

    fn is_beyond_distance(from: &Self, to: &Self, max_distance: f32) -> bool {
        (to - from).abs() > max_distance
    }

    fn smooth(
        current: Self,
        target: Self,
        velocity: &mut f32,
        smooth_time: f32,
        max_speed: f32,
        delta_time: f32,
    ) -> Option<Self> {
        Some(smooth_damp(current, target, velocity, smooth_time, max_speed, delta_time))
    }
}

impl BindingValue for f64 {
    const TYPE_NAME: &'static str = "f64";
    const SUPPORTS_SPLINE: bool = true;
    type Velocity = f64;

    fn lerp(from: Self, to: Self, t: f64) -> Self {
        from + (to - from) * t
    }

    fn catmull_rom(p0: Self, p1: Self, p2: Self, p3: Self, t: f64) -> Option<Self> {
        Some(catmull_rom_scalar(p0, p1, p2, p3, t))
    }

    fn is_beyond_distance(from: &Self, to: &Self, max_distance: f32) -> bool {
        (to - from).abs() > max_distance as f64
    }

    fn smooth(
        current: Self,
        target: Self,
        velocity: &mut f64,
        smooth_time: f32,
        max_speed: f32,
        delta_time: f32,
    ) -> Option<Self> {
        Some(smooth_damp_f64(
            current,
            target,
            velocity,
            smooth_time as f64,
            max_speed as f64,
            delta_time as f64,
        ))
    }
}

impl BindingValue for i32 {
    const TYPE_NAME: &'static str = "i32";
    type Velocity = ();

    fn lerp(from: Self, to: Self, t: f64) -> Self {
        (from as f64 + (to as f64 - from as f64) * t).round() as i32
    }

    fn is_beyond_distance(from: &Self, to: &Self, max_distance: f32) -> bool {
        (*to as f64 - *from as f64).abs() > max_distance as f64
    }
}

impl BindingValue for Vec2 {
    const TYPE_NAME: &'static str = "Vec2";
    const SUPPORTS_SPLINE: bool = true;
    type Velocity = Vec2;

    fn lerp(from: Self, to: Self, t: f64) -> Self {
        from.lerp_unclamped(to, t as f32)
    }

    fn catmull_rom(p0: Self, p1: Self, p2: Self, p3: Self, t: f64) -> Option<Self> {
        Some(Vec2::new(
            catmull_rom_scalar(p0.x as f64, p1.x as f64, p2.x as f64, p3.x as f64, t) as f32,
            catmull_rom_scalar(p0.y as f64, p1.y as f64, p2.y as f64, p3.y as f64, t) as f32,
        ))
    }

    fn is_beyond_distance(from: &Self, to: &Self, max_distance: f32) -> bool {
        from.distance_sq(*to) > max_distance * max_distance
    }

    fn smooth(
        current: Self,
        target: Self,
        velocity: &mut Vec2,
        smooth_time: f32,
        max_speed: f32,
        delta_time: f32,
    ) -> Option<Self> {
        Some(Vec2::new(
            smooth_damp(current.x, target.x, &mut velocity.x, smooth_time, max_speed, delta_time),
            smooth_damp(current.y, target.y, &mut velocity.y, smooth_time, max_speed, delta_time),
        ))
    }
}

impl BindingValue for Vec3 {
    const TYPE_NAME: &'static str = "Vec3";
    const SUPPORTS_SPLINE: bool = true;
    type Velocity = Vec3;

    fn lerp(from: Self, to: Self, t: f64) -> Self {
        from.lerp_unclamped(to, t as f32)
    }

    fn catmull_rom(p0: Self, p1: Self, p2: Self, p3: Self, t: f64) -> Option<Self> {
        let axis = |a: f32, b: f32, c: f32, d: f32| {
            catmull_rom_scalar(a as f64, b as f64, c as f64, d as f64, t) as f32
        };
        Some(Vec3::new(
            axis(p0.x, p1.x, p2.x, p3.x),
            axis(p0.y, p1.y, p2.y, p3.y),
            axis(p0.z, p1.z, p2.z, p3.z),
        ))
    }

    fn is_beyond_distance(from: &Self, to: &Self, max_distance: f32) -> bool {
        from.distance_sq(*to) > max_distance * max_distance
    }

    fn smooth(
        current: Self,
        target: Self,
        velocity: &mut Vec3,
        smooth_time: f32,
        max_speed: f32,
        delta_time: f32,
    ) -> Option<Self> {
        Some(Vec3::new(
            smooth_damp(current.x, target.x, &mut velocity.x, smooth_time, max_speed, delta_time),
            smooth_damp(current.y, target.y, &mut velocity.y, smooth_time, max_speed, delta_time),
            smooth_damp(current.z, target.z, &mut velocity.z, smooth_time, max_speed, delta_time),
        ))
    }
}

impl BindingValue for Quat {
    const TYPE_NAME: &'static str = "Quat";
    /// Euler angle velocity in degrees per second.
    type Velocity = Vec3;

    fn lerp(from: Self, to: Self, t: f64) -> Self {
        from.slerp_unclamped(to, t as f32)
    }

    /// `max_distance` is an angle in degrees.
    fn is_beyond_distance(from: &Self, to: &Self, max_distance: f32) -> bool {
        from.angle_deg(*to) > max_distance
    }

    fn smooth(
        current: Self,
        target: Self,
        velocity: &mut Vec3,
        smooth_time: f32,
        max_speed: f32,
        delta_time: f32,
    ) -> Option<Self> {
        let from = current.to_euler_deg();
        let to = target.to_euler_deg();
        let euler = Vec3::new(
            smooth_damp_angle(from.x, to.x, &mut velocity.x, smooth_time, max_speed, delta_time),
            smooth_damp_angle(from.y, to.y, &mut velocity.y, smooth_time, max_speed, delta_time),
            smooth_damp_angle(from.z, to.z, &mut velocity.z, smooth_time, max_speed, delta_time),
        );
        Some(Quat::from_euler_deg(euler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_lerp_extrapolates() {
        assert_eq!(<f32 as BindingValue>::lerp(0.0, 2.0, 0.5), 1.0);
        assert_eq!(<f64 as BindingValue>::lerp(0.0, 2.0, 1.5), 3.0);
        assert_eq!(<i32 as BindingValue>::lerp(0, 3, 0.5), 2);
    }

    #[test]
    fn catmull_rom_passes_through_control_points() {
        let at_start = f64::catmull_rom(0.0, 1.0, 2.0, 3.0, 0.0);
        let at_end = f64::catmull_rom(0.0, 1.0, 2.0, 3.0, 1.0);
        let mid = f64::catmull_rom(0.0, 1.0, 2.0, 3.0, 0.5);
        assert_eq!(at_start, Some(1.0));
        assert_eq!(at_end, Some(2.0));
        assert_eq!(mid, Some(1.5));
    }

    #[test]
    fn spline_support_per_type() {
        assert!(f32::SUPPORTS_SPLINE);
        assert!(Vec3::SUPPORTS_SPLINE);
        assert!(!i32::SUPPORTS_SPLINE);
        assert!(!Quat::SUPPORTS_SPLINE);
        assert_eq!(i32::catmull_rom(0, 1, 2, 3, 0.5), None);
    }

    #[test]
    fn teleport_distance_metrics() {
        assert!(f32::is_beyond_distance(&0.0, &2.5, 2.0));
        assert!(!f32::is_beyond_distance(&0.0, &-1.5, 2.0));
        assert!(i32::is_beyond_distance(&10, &7, 2.0));

        let a = Vec3::ZERO;
        assert!(Vec3::is_beyond_distance(&a, &Vec3::new(3.0, 4.0, 0.0), 4.9));
        assert!(!Vec3::is_beyond_distance(&a, &Vec3::new(3.0, 4.0, 0.0), 5.1));
        assert!(Vec2::is_beyond_distance(&Vec2::ZERO, &Vec2::new(0.0, 2.0), 1.0));

        let turned = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 120.0);
        assert!(Quat::is_beyond_distance(&Quat::IDENTITY, &turned, 90.0));
        assert!(!Quat::is_beyond_distance(&Quat::IDENTITY, &turned, 150.0));
    }

    #[test]
    fn smoothing_availability() {
        assert_eq!(i32::smooth(0, 5, &mut (), 0.1, f32::MAX, 0.1), None);

        let mut velocity = Vec3::ZERO;
        let out = Vec3::smooth(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            &mut velocity,
            0.1,
            f32::MAX,
            0.02,
        )
        .expect("vec3 smoothing");
        assert!(out.x > 0.0 && out.x < 1.0);
        assert!(velocity.x > 0.0);
    }

    #[test]
    fn quat_smoothing_moves_towards_target() {
        let target = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 60.0);
        let mut velocity = Vec3::ZERO;
        let out = Quat::smooth(Quat::IDENTITY, target, &mut velocity, 0.1, f32::MAX, 0.02)
            .expect("quat smoothing");
        let moved = Quat::IDENTITY.angle_deg(out);
        assert!(moved > 0.0 && moved < 60.0, "moved {moved}");
    }
}
