//! Math types.
//!
//! This module intentionally stays small and deterministic.
//! It avoids SIMD/unsafe and focuses on stable semantics.

use serde::{Deserialize, Serialize};

/// 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    pub fn len_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn distance_sq(self, other: Self) -> f32 {
        Self::new(other.x - self.x, other.y - self.y).len_sq()
    }

    /// Unclamped linear interpolation; `t > 1` extrapolates.
    pub fn lerp_unclamped(self, to: Self, t: f32) -> Self {
        Self::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }
}

/// 3D vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn len_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn distance_sq(self, other: Self) -> f32 {
        Self::new(other.x - self.x, other.y - self.y, other.z - self.z).len_sq()
    }

    pub fn lerp(self, to: Self, t: f32) -> Self {
        self.lerp_unclamped(to, t.clamp(0.0, 1.0))
    }

    /// Unclamped linear interpolation; `t > 1` extrapolates.
    pub fn lerp_unclamped(self, to: Self, t: f32) -> Self {
        Self::new(
            self.x + (to.x - self.x) * t,
            self.y + (to.y - self.y) * t,
            self.z + (to.z - self.z) * t,
        )
    }
}

/// Unit quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    pub fn normalize(self) -> Self {
        let len = self.dot(self).sqrt();
        if len <= f32::EPSILON || !len.is_finite() {
            return Self::IDENTITY;
        }
        Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
    }

    /// Rotation of `angle_deg` degrees around `axis`.
    pub fn from_axis_angle(axis: Vec3, angle_deg: f32) -> Self {
        let len = axis.len_sq().sqrt();
        if len <= f32::EPSILON {
            return Self::IDENTITY;
        }
        let half = angle_deg.to_radians() * 0.5;
        let s = half.sin() / len;
        Self::new(axis.x * s, axis.y * s, axis.z * s, half.cos())
    }

    /// Builds a rotation from Euler angles in degrees, applied Z, then X, then Y.
    pub fn from_euler_deg(euler: Vec3) -> Self {
        let (sx, cx) = (euler.x.to_radians() * 0.5).sin_cos();
        let (sy, cy) = (euler.y.to_radians() * 0.5).sin_cos();
        let (sz, cz) = (euler.z.to_radians() * 0.5).sin_cos();

        Self::new(
            cy * sx * cz + sy * cx * sz,
            sy * cx * cz - cy * sx * sz,
            cy * cx * sz - sy * sx * cz,
            cy * cx * cz + sy * sx * sz,
        )
    }

    /// Euler angles in degrees, inverse of [`Quat::from_euler_deg`].
    pub fn to_euler_deg(self) -> Vec3 {
        let q = self.normalize();
        let sin_x = (2.0 * (q.w * q.x - q.y * q.z)).clamp(-1.0, 1.0);
        let x = sin_x.asin();

        let (y, z) = if sin_x.abs() < 0.9999 {
            (
                (2.0 * (q.w * q.y + q.x * q.z)).atan2(1.0 - 2.0 * (q.x * q.x + q.y * q.y)),
                (2.0 * (q.w * q.z + q.x * q.y)).atan2(1.0 - 2.0 * (q.x * q.x + q.z * q.z)),
            )
        } else {
            // Gimbal lock: fold roll into yaw.
            (
                (2.0 * (q.w * q.y - q.x * q.z)).atan2(1.0 - 2.0 * (q.y * q.y + q.z * q.z)),
                0.0,
            )
        };

        Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
    }

    /// Angle between two rotations in degrees.
    pub fn angle_deg(self, other: Self) -> f32 {
        let dot = self.normalize().dot(other.normalize()).abs().min(1.0);
        (2.0 * dot.acos()).to_degrees()
    }

    /// Spherical interpolation along the shortest arc. `t` is not clamped.
    pub fn slerp_unclamped(self, to: Self, t: f32) -> Self {
        let a = self.normalize();
        let mut b = to.normalize();
        let mut cos = a.dot(b);
        if cos < 0.0 {
            b = Self::new(-b.x, -b.y, -b.z, -b.w);
            cos = -cos;
        }

        if cos > 0.9995 {
            return Self::new(
                a.x + (b.x - a.x) * t,
                a.y + (b.y - a.y) * t,
                a.z + (b.z - a.z) * t,
                a.w + (b.w - a.w) * t,
            )
            .normalize();
        }

        let theta = cos.acos();
        let sin = theta.sin();
        let wa = ((1.0 - t) * theta).sin() / sin;
        let wb = (t * theta).sin() / sin;
        Self::new(
            a.x * wa + b.x * wb,
            a.y * wa + b.y * wb,
            a.z * wa + b.z * wb,
            a.w * wa + b.w * wb,
        )
        .normalize()
    }
}
