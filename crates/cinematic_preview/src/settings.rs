// SPDX-License-Identifier: MIT OR Apache-2.0
//! Preview settings loaded from a RON file.

use cinematic_sequencer::{Pose, SequencerConfig};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for a preview run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Sequencer timing
    pub sequencer: SequencerConfig,
    /// Track file to play; the built-in end-game track when unset
    pub track: Option<PathBuf>,
    /// Simulated render frame rate
    pub frame_rate: f32,
    /// Upper bound on a single frame delta
    pub max_delta: f32,
    /// Give up after this many frames
    pub max_frames: u32,
    /// Log the camera pose every N frames (0 disables)
    pub log_every: u32,
    /// Frames that simulate a stall (e.g. a hidden tab) with a long raw delta
    pub stall_frames: Vec<u32>,
    /// Raw delta reported on stall frames, before clamping
    pub stall_delta: f32,
    /// Camera position when the cinematic is triggered
    pub start_position: (f32, f32, f32),
    /// Camera orientation when triggered, XYZ Euler radians
    pub start_euler: (f32, f32, f32),
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            sequencer: SequencerConfig::default(),
            track: None,
            frame_rate: 60.0,
            max_delta: 0.1,
            max_frames: 10_000,
            log_every: 30,
            stall_frames: Vec::new(),
            stall_delta: 0.5,
            start_position: (1.5, 1.6, 4.0),
            start_euler: (0.0, -0.6, 0.0),
        }
    }
}

/// Error raised when loading preview settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Frame rate, delta clamp or stall delta out of range
    #[error("Invalid preview setting {field}: {value}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// Sequencer timing out of range
    #[error(transparent)]
    Sequencer(#[from] cinematic_sequencer::ConfigError),

    /// RON parse failure
    #[error("Failed to parse preview settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Filesystem failure
    #[error("Preview settings I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PreviewSettings {
    /// Check every timing value
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.sequencer.validate()?;
        for (field, value) in [
            ("frame_rate", self.frame_rate),
            ("max_delta", self.max_delta),
            ("stall_delta", self.stall_delta),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::InvalidValue { field, value });
            }
        }
        Ok(())
    }

    /// Deserialize from RON and validate
    pub fn from_ron(s: &str) -> Result<Self, SettingsError> {
        let settings: Self = ron::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        Self::from_ron(&std::fs::read_to_string(path)?)
    }

    /// Camera pose at trigger time
    pub fn start_pose(&self) -> Pose {
        let (x, y, z) = self.start_position;
        let (rx, ry, rz) = self.start_euler;
        Pose::from_euler_xyz(Vec3::new(x, y, z), rx, ry, rz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(PreviewSettings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_settings() {
        let settings = PreviewSettings::from_ron(
            "(frame_rate: 30.0, sequencer: (initial_delay: 0.0), stall_frames: [10, 20])",
        )
        .unwrap();
        assert_eq!(settings.frame_rate, 30.0);
        assert_eq!(settings.sequencer.initial_delay, 0.0);
        assert_eq!(settings.sequencer.transition_duration, 0.5);
        assert_eq!(settings.stall_frames, vec![10, 20]);
        assert!(settings.track.is_none());
    }

    #[test]
    fn test_rejects_zero_frame_rate() {
        assert!(matches!(
            PreviewSettings::from_ron("(frame_rate: 0.0)"),
            Err(SettingsError::InvalidValue { field: "frame_rate", .. })
        ));
    }
}
