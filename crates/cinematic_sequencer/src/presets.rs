// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in camera tracks.

use crate::waypoint::{Track, Waypoint};
use glam::Vec3;

/// Eye height of the player camera
const EYE_HEIGHT: f32 = 1.6;

/// Index of each beat in [`endgame_track`]
pub mod endgame {
    /// Camera settles in front of the door
    pub const APPROACH: usize = 0;
    /// Slow turn toward the end of the corridor
    pub const REVEAL: usize = 1;
    /// Fast lunge toward the monster
    pub const PUNCH: usize = 2;
    /// Hold while the screen fades out
    pub const FADE: usize = 3;
    /// Pull back to the starting room
    pub const RESET: usize = 4;
}

/// The scripted end-game path: approach, reveal, punch, fade, reset.
///
/// Orientations are authored as XYZ Euler angles in radians and converted
/// once here.
pub fn endgame_track() -> Track {
    Track::new("Endgame")
        .with_waypoint(Waypoint::from_euler(
            "approach",
            Vec3::new(0.0, EYE_HEIGHT, 2.0),
            [0.0, 0.0, 0.0],
            1.0,
        ))
        .with_waypoint(Waypoint::from_euler(
            "reveal",
            Vec3::new(0.0, EYE_HEIGHT, -1.5),
            [-0.08, 0.35, 0.0],
            2.2,
        ))
        .with_waypoint(Waypoint::from_euler(
            "punch",
            Vec3::new(0.4, EYE_HEIGHT - 0.1, -4.2),
            [-0.15, 0.1, 0.05],
            0.18,
        ))
        .with_waypoint(Waypoint::from_euler(
            "fade",
            Vec3::new(0.45, EYE_HEIGHT - 0.12, -4.35),
            [-0.18, 0.08, 0.09],
            1.4,
        ))
        .with_waypoint(Waypoint::from_euler(
            "reset",
            Vec3::new(0.0, EYE_HEIGHT, 2.0),
            [0.0, 0.0, 0.0],
            0.0,
        ))
}
