// SPDX-License-Identifier: MIT OR Apache-2.0
//! One-shot blend from the live camera pose into the first waypoint.

use crate::pose::Pose;

/// Outcome of advancing the initial transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionStep {
    /// Still blending; carries the blended pose
    Blending(Pose),
    /// Arrived exactly at the target pose this tick
    Finished(Pose),
}

/// Blend state used only at the start of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialTransition {
    /// Camera pose captured at start
    pub start: Pose,
    /// Blend length in seconds
    pub duration: f32,
    /// Linear progress in `[0, 1]`
    pub progress: f32,
    /// Whether the blend is running
    pub active: bool,
}

impl InitialTransition {
    /// An inactive transition
    pub fn idle() -> Self {
        Self {
            start: Pose::IDENTITY,
            duration: 0.0,
            progress: 0.0,
            active: false,
        }
    }

    /// Snapshot `start` and begin blending
    pub fn begin(start: Pose, duration: f32) -> Self {
        Self {
            start,
            duration,
            progress: 0.0,
            active: true,
        }
    }

    /// Advance by `delta` seconds toward `target`.
    ///
    /// A non-positive duration completes on the first call. On completion the
    /// returned pose is `target` itself rather than a blend at `t = 1`.
    pub fn advance(&mut self, delta: f32, target: &Pose) -> TransitionStep {
        if self.duration > 0.0 {
            self.progress += delta / self.duration;
        } else {
            self.progress = 1.0;
        }

        if self.progress < 1.0 {
            return TransitionStep::Blending(self.start.blend(target, self.progress));
        }

        self.progress = 1.0;
        self.active = false;
        TransitionStep::Finished(*target)
    }

    /// Deactivate and zero progress
    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn target() -> Pose {
        Pose::new(Vec3::new(4.0, 0.0, 0.0), Quat::from_rotation_y(1.0))
    }

    #[test]
    fn test_blend_is_linear() {
        let mut transition = InitialTransition::begin(Pose::IDENTITY, 0.5);
        let step = transition.advance(0.125, &target());
        let TransitionStep::Blending(pose) = step else {
            panic!("expected blending, got {step:?}");
        };
        assert!((transition.progress - 0.25).abs() < 1e-6);
        assert!(pose.position.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5));
        assert!(pose
            .orientation
            .abs_diff_eq(Quat::from_rotation_y(0.25), 1e-5));
        assert!(transition.active);
    }

    #[test]
    fn test_finish_snaps_to_target() {
        let mut transition = InitialTransition::begin(Pose::IDENTITY, 0.5);
        transition.advance(0.3, &target());
        let step = transition.advance(0.3, &target());
        assert_eq!(step, TransitionStep::Finished(target()));
        assert!(!transition.active);
        assert_eq!(transition.progress, 1.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut transition = InitialTransition::begin(Pose::IDENTITY, 0.0);
        assert_eq!(
            transition.advance(0.0, &target()),
            TransitionStep::Finished(target())
        );
    }

    #[test]
    fn test_reset() {
        let mut transition = InitialTransition::begin(Pose::IDENTITY, 1.0);
        transition.advance(0.5, &target());
        transition.reset();
        assert!(!transition.active);
        assert_eq!(transition.progress, 0.0);
    }
}
