// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframed camera cinematic sequencer.
//!
//! This crate drives a scripted camera along an ordered track of waypoints:
//! - Linear position blend and shortest-arc rotation blend per segment
//! - One-shot catch-up blend from the live camera pose
//! - Fixed pre-roll delay at the first waypoint
//! - Per-waypoint arrival callbacks
//! - Start, stop, pause and resume
//!
//! ## Architecture
//!
//! [`CameraSequencer`] is an explicit instance owned by the game loop. The
//! loop calls [`CameraSequencer::update`] once per frame with an already
//! clamped delta and applies the returned [`Pose`] to its camera. Nothing
//! here renders, plays audio or spawns work.

pub mod callback;
pub mod config;
pub mod pose;
pub mod presets;
pub mod sequencer;
pub mod transition;
pub mod waypoint;

pub use callback::{CallbackRegistry, WaypointCallback, WaypointReached};
pub use config::{ConfigError, SequencerConfig};
pub use pose::{lerp, slerp_pose, Pose};
pub use sequencer::{CameraSequencer, Phase, PlaybackState, SequencerError};
pub use transition::{InitialTransition, TransitionStep};
pub use waypoint::{AuthoredOrientation, AuthoredWaypoint, Track, TrackError, TrackId, Waypoint};
