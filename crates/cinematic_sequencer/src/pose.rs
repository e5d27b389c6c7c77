// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera pose and the interpolation functions used to blend between poses.
//!
//! All functions here are pure and delegate to glam. None of them clamp the
//! blend factor; callers keep `t` within `[0, 1]`.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A camera pose: world-space position plus orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World-space position
    pub position: Vec3,
    /// Orientation as a unit quaternion
    pub orientation: Quat,
}

impl Pose {
    /// Identity pose at the origin
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    /// Create a pose, normalizing the orientation
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation: normalize_or_identity(orientation),
        }
    }

    /// Create a pose from Euler angles (radians, XYZ order)
    pub fn from_euler_xyz(position: Vec3, x: f32, y: f32, z: f32) -> Self {
        Self::new(position, Quat::from_euler(EulerRot::XYZ, x, y, z))
    }

    /// Orientation as Euler angles (radians, XYZ order) for render adapters
    pub fn euler_xyz(&self) -> (f32, f32, f32) {
        self.orientation.to_euler(EulerRot::XYZ)
    }

    /// Blend this pose toward `other`
    pub fn blend(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            position: lerp(self.position, other.position, t),
            orientation: slerp_pose(self.orientation, other.orientation, t),
        }
    }

    /// Compare two poses within `max_abs_diff`, treating `q` and `-q` as equal
    pub fn abs_diff_eq(&self, other: &Pose, max_abs_diff: f32) -> bool {
        let q = if self.orientation.dot(other.orientation) < 0.0 {
            -other.orientation
        } else {
            other.orientation
        };
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && self.orientation.abs_diff_eq(q, max_abs_diff)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Linear per-axis interpolation of translation
#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a.lerp(b, t)
}

/// Shortest-arc spherical interpolation of unit quaternions
#[inline]
pub fn slerp_pose(qa: Quat, qb: Quat, t: f32) -> Quat {
    qa.slerp(qb, t)
}

/// Normalize a quaternion, falling back to identity for degenerate input
pub(crate) fn normalize_or_identity(q: Quat) -> Quat {
    let len = q.length();
    if len.is_finite() && len > f32::EPSILON {
        q / len
    } else {
        Quat::IDENTITY
    }
}
