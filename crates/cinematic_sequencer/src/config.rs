// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequencer timing configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default pre-roll hold at the first waypoint, in seconds
pub const DEFAULT_INITIAL_DELAY: f32 = 0.65;

/// Default length of the blend into the first waypoint, in seconds
pub const DEFAULT_TRANSITION_DURATION: f32 = 0.5;

/// Timing constants for a sequencer run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Hold at waypoint 0 before traveling begins
    pub initial_delay: f32,
    /// Duration of the initial transition blend
    pub transition_duration: f32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            transition_duration: DEFAULT_TRANSITION_DURATION,
        }
    }
}

/// Error raised when loading or validating a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A timing constant is negative, NaN or infinite
    #[error("Invalid {field}: {value}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// RON parse failure
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialize failure
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    /// Filesystem failure
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SequencerConfig {
    /// Config with no delay and the given transition length
    pub fn immediate(transition_duration: f32) -> Self {
        Self {
            initial_delay: 0.0,
            transition_duration,
        }
    }

    /// Set the initial delay
    pub fn with_initial_delay(mut self, initial_delay: f32) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Set the transition duration
    pub fn with_transition_duration(mut self, transition_duration: f32) -> Self {
        self.transition_duration = transition_duration;
        self
    }

    /// Reject negative or non-finite timings
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("initial_delay", self.initial_delay),
            ("transition_duration", self.transition_duration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Deserialize from RON and validate
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_ron(&std::fs::read_to_string(path)?)
    }
}
