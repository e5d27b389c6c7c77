// SPDX-License-Identifier: MIT OR Apache-2.0
//! The camera sequencer: timing, segment advancement and the driver API.
//!
//! A run moves through these phases:
//!
//! ```text
//! Idle -> InitialBlend -> Delayed -> Traveling(0) -> ... -> Traveling(last) -> Idle
//! ```
//!
//! Each call to [`CameraSequencer::update`] handles exactly one phase step.
//! Time left over after a segment completes is dropped rather than applied
//! to the next segment.

use crate::callback::{CallbackRegistry, WaypointReached};
use crate::config::{ConfigError, SequencerConfig};
use crate::pose::Pose;
use crate::presets;
use crate::transition::{InitialTransition, TransitionStep};
use crate::waypoint::{Track, TrackError};
use glam::Vec3;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Not running
    #[default]
    Stopped,
    /// Advancing on every update
    Playing,
    /// Run frozen in place until resumed
    Paused,
}

/// Phase of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No run in progress
    #[default]
    Idle,
    /// Blending from the start pose into waypoint 0
    InitialBlend,
    /// Holding at waypoint 0 for the initial delay
    Delayed,
    /// Traveling from `current_index` toward the next waypoint
    Traveling,
}

/// Error returned by the sequencer's replace operations
#[derive(Debug, thiserror::Error)]
pub enum SequencerError {
    /// Track or config replaced while a run is active
    #[error("Cannot replace track or config while a run is active")]
    TrackLocked,

    /// Track failed validation
    #[error("Invalid track: {0}")]
    InvalidTrack(#[from] TrackError),

    /// Config failed validation
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Keyframed camera sequencer driven by per-frame time deltas
#[derive(Debug)]
pub struct CameraSequencer {
    track: Track,
    callbacks: CallbackRegistry,
    config: SequencerConfig,
    state: PlaybackState,
    phase: Phase,
    current_index: usize,
    progress: f32,
    delay_elapsed: f32,
    transition: InitialTransition,
    current_pose: Pose,
}

impl CameraSequencer {
    /// Create a sequencer for `track`.
    ///
    /// An empty track is accepted; [`CameraSequencer::start`] is a no-op for it.
    pub fn new(track: Track, config: SequencerConfig) -> Result<Self, SequencerError> {
        track.validate()?;
        config.validate()?;
        Ok(Self::from_parts(track, config))
    }

    fn from_parts(track: Track, config: SequencerConfig) -> Self {
        let current_pose = track.get(0).map_or(Pose::IDENTITY, |w| w.pose);
        Self {
            track,
            callbacks: CallbackRegistry::new(),
            config,
            state: PlaybackState::Stopped,
            phase: Phase::Idle,
            current_index: 0,
            progress: 0.0,
            delay_elapsed: 0.0,
            transition: InitialTransition::idle(),
            current_pose,
        }
    }

    /// Begin a run from the live camera pose.
    ///
    /// Restarts from scratch if a run is already active. Returns `false`
    /// without leaving `Idle` when the track is empty.
    pub fn start(&mut self, pose: Pose) -> bool {
        if self.track.is_empty() {
            tracing::warn!("Ignoring start: track '{}' has no waypoints", self.track.name);
            return false;
        }
        if self.is_active() {
            tracing::debug!("Restarting active run of '{}'", self.track.name);
        }

        self.reset_run();
        let start = Pose::new(pose.position, pose.orientation);
        self.transition = InitialTransition::begin(start, self.config.transition_duration);
        self.current_pose = start;
        self.state = PlaybackState::Playing;
        self.phase = Phase::InitialBlend;

        tracing::info!(
            "Started cinematic '{}' ({} waypoints)",
            self.track.name,
            self.track.len()
        );
        true
    }

    /// End the run immediately. No callback fires; the pose stays where it was.
    pub fn stop(&mut self) {
        if self.state != PlaybackState::Stopped {
            tracing::info!("Stopped cinematic '{}'", self.track.name);
        }
        self.state = PlaybackState::Stopped;
        self.phase = Phase::Idle;
        self.reset_run();
    }

    /// Freeze a playing run
    pub fn pause(&mut self) -> bool {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
            tracing::debug!("Paused cinematic at waypoint {}", self.current_index);
            true
        } else {
            false
        }
    }

    /// Continue a paused run
    pub fn resume(&mut self) -> bool {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
            tracing::debug!("Resumed cinematic at waypoint {}", self.current_index);
            true
        } else {
            false
        }
    }

    /// Advance by `delta` seconds and return the pose to apply to the camera.
    ///
    /// No-op unless playing. Negative or non-finite deltas count as zero.
    pub fn update(&mut self, delta: f32) -> Pose {
        if self.state != PlaybackState::Playing {
            return self.current_pose;
        }

        let delta = if delta.is_finite() && delta >= 0.0 {
            delta
        } else {
            tracing::warn!("Treating invalid frame delta {delta} as zero");
            0.0
        };

        tracing::trace!(
            "update delta={delta} phase={:?} index={} progress={}",
            self.phase,
            self.current_index,
            self.progress
        );

        match self.phase {
            Phase::InitialBlend => self.update_transition(delta),
            Phase::Delayed => self.update_delay(delta),
            Phase::Traveling => self.update_travel(delta),
            Phase::Idle => {}
        }

        self.current_pose
    }

    fn update_transition(&mut self, delta: f32) {
        let Some(target) = self.track.get(0).map(|w| w.pose) else {
            self.finish();
            return;
        };

        match self.transition.advance(delta, &target) {
            TransitionStep::Blending(pose) => self.current_pose = pose,
            TransitionStep::Finished(pose) => {
                self.current_pose = pose;
                self.phase = Phase::Delayed;
                tracing::debug!("Initial transition complete");
                self.reach(0);
            }
        }
    }

    fn update_delay(&mut self, delta: f32) {
        if self.current_index == 0 && self.delay_elapsed < self.config.initial_delay {
            self.delay_elapsed += delta;
            if let Some(first) = self.track.get(0) {
                self.current_pose = first.pose;
            }
            return;
        }

        self.phase = Phase::Traveling;
        tracing::debug!("Initial delay elapsed, traveling");
        self.update_travel(delta);
    }

    fn update_travel(&mut self, delta: f32) {
        let next = self.current_index + 1;
        let Some((duration, target)) = self.track.get(next).map(|w| (w.duration, w.pose)) else {
            self.finish();
            return;
        };

        // Zero-duration waypoints are reached on the tick that targets them
        self.progress = if duration > 0.0 {
            (self.progress + delta / duration).min(1.0)
        } else {
            1.0
        };

        if self.progress >= 1.0 {
            self.current_index = next;
            self.progress = 0.0;
            self.current_pose = target;
            self.reach(next);
        } else {
            self.current_pose = self.segment_pose(self.current_index, self.progress);
        }
    }

    /// Blend between waypoint `index` and its successor; the last waypoint
    /// blends with itself.
    fn segment_pose(&self, index: usize, t: f32) -> Pose {
        let Some(from) = self.track.get(index) else {
            return self.current_pose;
        };
        let to = self.track.get(index + 1).unwrap_or(from);
        from.pose.blend(&to.pose, t)
    }

    fn reach(&mut self, index: usize) {
        let event = WaypointReached {
            index,
            pose: self.current_pose,
            is_last: index + 1 == self.track.len(),
        };
        if let Some(waypoint) = self.track.get(index) {
            tracing::debug!("Reached waypoint {index} '{}'", waypoint.name);
        }
        self.callbacks.dispatch(&event);
    }

    fn finish(&mut self) {
        tracing::info!("Cinematic '{}' finished", self.track.name);
        self.state = PlaybackState::Stopped;
        self.phase = Phase::Idle;
        self.reset_run();
    }

    fn reset_run(&mut self) {
        self.current_index = 0;
        self.progress = 0.0;
        self.delay_elapsed = 0.0;
        self.transition.reset();
    }

    /// Attach or replace the arrival callback for waypoint `index`.
    ///
    /// Out-of-range indices are ignored and return `false`. Replacing a
    /// callback mid-run affects the next arrival.
    pub fn set_waypoint_callback<F>(&mut self, index: usize, callback: F) -> bool
    where
        F: FnMut(&WaypointReached) + 'static,
    {
        if index >= self.track.len() {
            tracing::warn!(
                "Ignoring callback for waypoint {index}: track has {} waypoints",
                self.track.len()
            );
            return false;
        }
        self.callbacks.set(index, Box::new(callback));
        true
    }

    /// Remove the arrival callback for waypoint `index`
    pub fn clear_waypoint_callback(&mut self, index: usize) -> bool {
        self.callbacks.remove(index)
    }

    /// Whether waypoint `index` has a callback bound
    pub fn has_waypoint_callback(&self, index: usize) -> bool {
        self.callbacks.contains(index)
    }

    /// Copy of waypoint `index`'s position, or the origin when out of range
    pub fn get_waypoint_position(&self, index: usize) -> Vec3 {
        if index >= self.track.len() {
            tracing::debug!("Waypoint {index} out of range, returning origin");
        }
        self.track.position_or_zero(index)
    }

    /// The pose consumers should apply to the camera
    pub fn get_current_pose(&self) -> Pose {
        self.current_pose
    }

    /// Replace the track. Only allowed while stopped.
    ///
    /// Callback bindings whose index exists in the new track are kept.
    pub fn set_track(&mut self, track: Track) -> Result<(), SequencerError> {
        if self.is_active() {
            return Err(SequencerError::TrackLocked);
        }
        track.validate()?;
        self.callbacks.retain_below(track.len());
        tracing::info!(
            "Replaced track '{}' with '{}'",
            self.track.name,
            track.name
        );
        self.track = track;
        Ok(())
    }

    /// Replace the timing config. Only allowed while stopped.
    pub fn set_config(&mut self, config: SequencerConfig) -> Result<(), SequencerError> {
        if self.is_active() {
            return Err(SequencerError::TrackLocked);
        }
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Current playback state
    pub fn playback_state(&self) -> PlaybackState {
        self.state
    }

    /// Current run phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a run is advancing (not paused)
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Whether a run is in progress, playing or paused
    pub fn is_active(&self) -> bool {
        matches!(self.state, PlaybackState::Playing | PlaybackState::Paused)
    }

    /// Index of the waypoint the current segment starts from
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Progress through the current segment, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Time spent in the initial delay so far
    pub fn delay_elapsed(&self) -> f32 {
        self.delay_elapsed
    }

    /// Progress of the initial transition, in `[0, 1]`
    pub fn transition_progress(&self) -> f32 {
        self.transition.progress
    }

    /// Whether the blend from the start pose is still running
    pub fn is_transitioning(&self) -> bool {
        self.transition.active
    }

    /// The waypoint track
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Number of waypoints
    pub fn waypoint_count(&self) -> usize {
        self.track.len()
    }

    /// Timing config
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }
}

impl Default for CameraSequencer {
    fn default() -> Self {
        Self::from_parts(presets::endgame_track(), SequencerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waypoint::Waypoint;
    use glam::Quat;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn scenario_track() -> Track {
        Track::new("Scenario")
            .with_waypoint(Waypoint::new("a", Vec3::ZERO, Quat::IDENTITY, 1.0))
            .with_waypoint(Waypoint::new("b", Vec3::new(10.0, 0.0, 0.0), Quat::IDENTITY, 2.0))
    }

    fn long_track() -> Track {
        let durations = [0.0, 0.5, 0.0, 3.0, 0.2];
        let waypoints = durations
            .iter()
            .enumerate()
            .map(|(i, &duration)| {
                Waypoint::from_euler(
                    format!("w{i}"),
                    Vec3::new(i as f32 * 2.0, 1.0, -(i as f32)),
                    [0.0, i as f32 * 0.4, 0.0],
                    duration,
                )
            })
            .collect();
        Track::from_waypoints("Long", waypoints)
    }

    fn sequencer(track: Track, config: SequencerConfig) -> CameraSequencer {
        CameraSequencer::new(track, config).unwrap()
    }

    fn record_all(seq: &mut CameraSequencer) -> Rc<RefCell<Vec<usize>>> {
        let hits = Rc::new(RefCell::new(Vec::new()));
        for index in 0..seq.waypoint_count() {
            let sink = Rc::clone(&hits);
            seq.set_waypoint_callback(index, move |e| sink.borrow_mut().push(e.index));
        }
        hits
    }

    fn run_to_idle(seq: &mut CameraSequencer, delta: f32) -> usize {
        let mut ticks = 0;
        while seq.is_active() {
            seq.update(delta);
            ticks += 1;
            assert!(ticks < 100_000, "run did not terminate");
        }
        ticks
    }

    #[test]
    fn test_example_scenario() {
        let mut seq = sequencer(scenario_track(), SequencerConfig::immediate(0.5));
        let hits = record_all(&mut seq);

        assert!(seq.start(Pose::IDENTITY));
        assert_eq!(seq.phase(), Phase::InitialBlend);

        let pose = seq.update(0.5);
        assert_eq!(pose.position, Vec3::ZERO);
        assert_eq!(*hits.borrow(), vec![0]);

        let pose = seq.update(1.0);
        assert_eq!(seq.current_index(), 0);
        assert!((seq.progress() - 0.5).abs() < 1e-6);
        assert!(pose.position.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-5));

        let pose = seq.update(1.0);
        assert_eq!(seq.current_index(), 1);
        assert_eq!(pose.position, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(*hits.borrow(), vec![0, 1]);
        assert!(seq.is_playing());

        seq.update(0.016);
        assert!(!seq.is_playing());
        assert_eq!(seq.phase(), Phase::Idle);
        assert_eq!(seq.get_current_pose().position, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_update_returns_current_pose() {
        let mut seq = sequencer(scenario_track(), SequencerConfig::immediate(0.5));
        seq.start(Pose::new(Vec3::new(0.0, 4.0, 0.0), Quat::IDENTITY));
        let pose = seq.update(0.1);
        assert_eq!(pose, seq.get_current_pose());
    }

    #[test]
    fn test_callbacks_fire_once_in_order() {
        let mut seq = sequencer(long_track(), SequencerConfig::default());
        let hits = record_all(&mut seq);

        seq.start(Pose::IDENTITY);
        run_to_idle(&mut seq, 1.0 / 60.0);
        assert_eq!(*hits.borrow(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_runs_terminate_for_any_fixed_delta() {
        for delta in [0.001, 0.016, 0.1, 1.0, 10.0] {
            let mut seq = sequencer(long_track(), SequencerConfig::default());
            let hits = record_all(&mut seq);
            seq.start(Pose::IDENTITY);
            run_to_idle(&mut seq, delta);
            assert_eq!(hits.borrow().len(), 5, "delta {delta}");
        }
    }

    #[test]
    fn test_index_monotonic_and_progress_bounded() {
        let mut seq = sequencer(long_track(), SequencerConfig::default());
        seq.start(Pose::IDENTITY);

        let mut last_index = 0;
        while seq.is_active() {
            seq.update(0.07);
            if !seq.is_active() {
                break;
            }
            assert!(seq.current_index() >= last_index);
            assert!((0.0..=1.0).contains(&seq.progress()));
            assert!((0.0..=1.0).contains(&seq.transition_progress()));
            last_index = seq.current_index();
        }
        assert_eq!(last_index, 4);
    }

    #[test]
    fn test_initial_transition_has_no_jump() {
        let track = long_track();
        let target = track.waypoints()[0].pose;
        let mut seq = sequencer(track, SequencerConfig::default());
        seq.start(Pose::new(Vec3::new(100.0, 50.0, 0.0), Quat::from_rotation_y(2.0)));

        let mut last_distance = f32::MAX;
        let mut ticks = 0;
        while seq.phase() == Phase::InitialBlend {
            let pose = seq.update(0.1);
            let distance = pose.position.distance(target.position);
            assert!(distance < last_distance);
            last_distance = distance;
            ticks += 1;
            assert!(ticks < 100);
        }

        assert_eq!(seq.phase(), Phase::Delayed);
        assert!(seq.get_current_pose().abs_diff_eq(&target, 1e-6));
    }

    #[test]
    fn test_initial_delay_holds_first_pose() {
        let track = scenario_track();
        let first = track.waypoints()[0].pose;
        let config = SequencerConfig::immediate(0.5).with_initial_delay(0.3);
        let mut seq = sequencer(track, config);
        seq.start(Pose::IDENTITY);
        seq.update(0.5);

        // Two ticks accumulate the delay, the third starts traveling
        for _ in 0..2 {
            let pose = seq.update(0.2);
            assert_eq!(pose, first);
            assert_eq!(seq.phase(), Phase::Delayed);
            assert_eq!(seq.progress(), 0.0);
        }
        seq.update(0.2);
        assert_eq!(seq.phase(), Phase::Traveling);
        assert!((seq.progress() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_waypoints_advance_one_per_tick() {
        let track = Track::new("Cuts")
            .with_waypoint(Waypoint::new("a", Vec3::ZERO, Quat::IDENTITY, 0.0))
            .with_waypoint(Waypoint::new("b", Vec3::new(10.0, 0.0, 0.0), Quat::IDENTITY, 0.0))
            .with_waypoint(Waypoint::new("c", Vec3::new(20.0, 0.0, 0.0), Quat::IDENTITY, 0.0));
        let mut seq = sequencer(track, SequencerConfig::immediate(0.0));
        let hits = record_all(&mut seq);

        seq.start(Pose::IDENTITY);
        seq.update(0.016);
        assert_eq!(*hits.borrow(), vec![0]);

        let pose = seq.update(0.016);
        assert_eq!(*hits.borrow(), vec![0, 1]);
        assert_eq!(pose.position, Vec3::new(10.0, 0.0, 0.0));

        seq.update(0.016);
        assert_eq!(*hits.borrow(), vec![0, 1, 2]);
        assert!(seq.is_playing());

        seq.update(0.016);
        assert!(!seq.is_playing());
    }

    #[test]
    fn test_leftover_delta_is_not_carried_into_next_segment() {
        // Overshoot past a segment end is discarded, which can under-advance
        // the run at low frame rates.
        let track = Track::new("Carry")
            .with_waypoint(Waypoint::new("a", Vec3::ZERO, Quat::IDENTITY, 0.0))
            .with_waypoint(Waypoint::new("b", Vec3::X, Quat::IDENTITY, 1.0))
            .with_waypoint(Waypoint::new("c", Vec3::X * 2.0, Quat::IDENTITY, 1.0));
        let mut seq = sequencer(track, SequencerConfig::immediate(0.0));
        seq.start(Pose::IDENTITY);
        seq.update(0.1);

        seq.update(1.5);
        assert_eq!(seq.current_index(), 1);
        assert_eq!(seq.progress(), 0.0);

        seq.update(0.5);
        assert_eq!(seq.current_index(), 1);
        assert!((seq.progress() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_stop_is_idempotent_and_silent() {
        let mut seq = sequencer(scenario_track(), SequencerConfig::immediate(0.5));
        let hits = record_all(&mut seq);
        seq.start(Pose::IDENTITY);
        seq.update(0.5);
        seq.update(1.0);
        let frozen = seq.get_current_pose();

        seq.stop();
        seq.stop();
        assert_eq!(*hits.borrow(), vec![0]);
        assert_eq!(seq.playback_state(), PlaybackState::Stopped);
        assert_eq!(seq.phase(), Phase::Idle);
        assert_eq!(seq.current_index(), 0);
        assert_eq!(seq.progress(), 0.0);
        assert_eq!(seq.delay_elapsed(), 0.0);
        assert_eq!(seq.transition_progress(), 0.0);
        assert_eq!(seq.get_current_pose(), frozen);

        // Bindings survive stop and fire again on the next run
        assert!(seq.has_waypoint_callback(1));
        seq.start(Pose::IDENTITY);
        run_to_idle(&mut seq, 0.25);
        assert_eq!(*hits.borrow(), vec![0, 0, 1]);
    }

    #[test]
    fn test_update_while_idle_is_noop() {
        let mut seq = sequencer(scenario_track(), SequencerConfig::default());
        let before = seq.get_current_pose();
        assert_eq!(seq.update(1.0), before);
        assert_eq!(seq.phase(), Phase::Idle);
    }

    #[test]
    fn test_empty_track_never_starts() {
        let mut seq = sequencer(Track::default(), SequencerConfig::default());
        assert!(!seq.start(Pose::IDENTITY));
        assert!(!seq.is_playing());
        assert_eq!(seq.phase(), Phase::Idle);
        assert_eq!(seq.update(0.1), Pose::IDENTITY);
    }

    #[test]
    fn test_out_of_range_accessors() {
        let mut seq = sequencer(scenario_track(), SequencerConfig::default());
        assert!(!seq.set_waypoint_callback(2, |_| {}));
        assert!(!seq.has_waypoint_callback(2));
        assert_eq!(seq.get_waypoint_position(2), Vec3::ZERO);
        assert_eq!(seq.get_waypoint_position(1), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_restart_while_playing() {
        let mut seq = sequencer(scenario_track(), SequencerConfig::immediate(0.5));
        let hits = record_all(&mut seq);
        seq.start(Pose::IDENTITY);
        seq.update(0.5);
        seq.update(1.0);

        let restart_pose = Pose::new(Vec3::new(0.0, 3.0, 0.0), Quat::IDENTITY);
        assert!(seq.start(restart_pose));
        assert_eq!(seq.phase(), Phase::InitialBlend);
        assert_eq!(seq.current_index(), 0);
        assert_eq!(seq.progress(), 0.0);
        assert_eq!(seq.transition_progress(), 0.0);
        assert_eq!(seq.get_current_pose(), restart_pose);

        run_to_idle(&mut seq, 0.25);
        assert_eq!(*hits.borrow(), vec![0, 0, 1]);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut seq = sequencer(scenario_track(), SequencerConfig::immediate(0.5));
        assert!(!seq.pause());

        seq.start(Pose::IDENTITY);
        seq.update(0.5);
        seq.update(1.0);
        assert!(seq.pause());
        assert!(!seq.is_playing());
        assert!(seq.is_active());

        let frozen = seq.get_current_pose();
        assert_eq!(seq.update(1.0), frozen);
        assert!((seq.progress() - 0.5).abs() < 1e-6);

        assert!(seq.resume());
        assert!(!seq.resume());
        seq.update(0.5);
        assert!((seq.progress() - 0.75).abs() < 1e-6);

        seq.pause();
        seq.stop();
        assert_eq!(seq.playback_state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_pause_during_blend_and_delay() {
        let config = SequencerConfig::immediate(0.5).with_initial_delay(0.3);
        let mut seq = sequencer(scenario_track(), config);
        seq.start(Pose::new(Vec3::new(0.0, 2.0, 0.0), Quat::IDENTITY));

        seq.update(0.25);
        assert!(seq.is_transitioning());
        assert!(seq.pause());
        let frozen = seq.get_current_pose();
        seq.update(1.0);
        assert_eq!(seq.phase(), Phase::InitialBlend);
        assert_eq!(seq.transition_progress(), 0.5);
        assert_eq!(seq.get_current_pose(), frozen);

        seq.resume();
        seq.update(0.25);
        assert_eq!(seq.phase(), Phase::Delayed);
        assert!(!seq.is_transitioning());

        seq.update(0.2);
        assert!(seq.pause());
        seq.update(1.0);
        assert_eq!(seq.phase(), Phase::Delayed);
        assert!((seq.delay_elapsed() - 0.2).abs() < 1e-6);

        seq.resume();
        seq.update(0.2);
        assert_eq!(seq.phase(), Phase::Delayed);
        assert!((seq.delay_elapsed() - 0.4).abs() < 1e-6);
        seq.update(0.2);
        assert_eq!(seq.phase(), Phase::Traveling);
    }

    #[test]
    fn test_callback_sees_post_advance_state() {
        let track = scenario_track();
        let expected = track.waypoints()[1].pose;
        let mut seq = sequencer(track, SequencerConfig::immediate(0.5));
        let events = Rc::new(RefCell::new(Vec::new()));
        for index in 0..2 {
            let sink = Rc::clone(&events);
            seq.set_waypoint_callback(index, move |e: &WaypointReached| sink.borrow_mut().push(*e));
        }

        seq.start(Pose::IDENTITY);
        run_to_idle(&mut seq, 0.5);

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert!(!events[0].is_last);
        assert_eq!(events[1].index, 1);
        assert!(events[1].is_last);
        assert_eq!(events[1].pose, expected);
    }

    #[test]
    fn test_rebinding_during_playback() {
        let mut seq = sequencer(scenario_track(), SequencerConfig::immediate(0.5));
        let hits = Rc::new(RefCell::new(Vec::new()));
        let old = Rc::clone(&hits);
        seq.set_waypoint_callback(1, move |_| old.borrow_mut().push("old"));

        seq.start(Pose::IDENTITY);
        seq.update(0.5);
        let new = Rc::clone(&hits);
        assert!(seq.set_waypoint_callback(1, move |_| new.borrow_mut().push("new")));
        run_to_idle(&mut seq, 0.5);

        assert_eq!(*hits.borrow(), vec!["new"]);
    }

    #[test]
    fn test_missing_callback_is_skipped() {
        let mut seq = sequencer(scenario_track(), SequencerConfig::immediate(0.5));
        let hits = record_all(&mut seq);
        assert!(seq.clear_waypoint_callback(0));
        seq.start(Pose::IDENTITY);
        run_to_idle(&mut seq, 0.5);
        assert_eq!(*hits.borrow(), vec![1]);
    }

    #[test]
    fn test_invalid_delta_is_ignored() {
        let mut seq = sequencer(scenario_track(), SequencerConfig::immediate(0.5));
        seq.start(Pose::IDENTITY);
        seq.update(0.5);
        seq.update(1.0);

        seq.update(f32::NAN);
        seq.update(-3.0);
        assert_eq!(seq.current_index(), 0);
        assert!((seq.progress() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_set_track_only_while_stopped() {
        let mut seq = sequencer(long_track(), SequencerConfig::default());
        record_all(&mut seq);
        seq.start(Pose::IDENTITY);
        assert!(matches!(
            seq.set_track(scenario_track()),
            Err(SequencerError::TrackLocked)
        ));
        assert!(matches!(
            seq.set_config(SequencerConfig::default()),
            Err(SequencerError::TrackLocked)
        ));

        seq.stop();
        seq.set_track(scenario_track()).unwrap();
        assert_eq!(seq.waypoint_count(), 2);
        assert!(seq.has_waypoint_callback(1));
        assert!(!seq.has_waypoint_callback(2));
    }

    #[test]
    fn test_set_track_rejects_invalid() {
        let mut seq = sequencer(scenario_track(), SequencerConfig::default());
        let bad = Track::new("Bad")
            .with_waypoint(Waypoint::new("a", Vec3::ZERO, Quat::IDENTITY, -1.0));
        assert!(matches!(
            seq.set_track(bad),
            Err(SequencerError::InvalidTrack(TrackError::NegativeDuration { .. }))
        ));
        assert_eq!(seq.track().name, "Scenario");

        let bad_config = SequencerConfig::default().with_initial_delay(f32::INFINITY);
        assert!(matches!(
            seq.set_config(bad_config),
            Err(SequencerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_plays_endgame_track() {
        let mut seq = CameraSequencer::default();
        assert_eq!(seq.waypoint_count(), presets::endgame_track().len());
        assert_eq!(*seq.config(), SequencerConfig::default());

        let hits = record_all(&mut seq);
        seq.start(Pose::IDENTITY);
        run_to_idle(&mut seq, 1.0 / 30.0);
        assert_eq!(hits.borrow().len(), seq.waypoint_count());
    }
}
