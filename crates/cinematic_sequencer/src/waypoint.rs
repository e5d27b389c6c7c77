// SPDX-License-Identifier: MIT OR Apache-2.0
//! Waypoints and the ordered track the sequencer walks.
//!
//! A track is plain data: poses and durations. Arrival callbacks live in a
//! separate registry (see [`crate::callback`]) so a track can be saved,
//! loaded and compared on its own.

use crate::pose::{normalize_or_identity, Pose};
use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Create a new random track ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// One scripted camera target
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    /// Display name, used in logs
    pub name: String,
    /// Target pose
    pub pose: Pose,
    /// Seconds to travel from the previous waypoint to this one
    pub duration: f32,
}

impl Waypoint {
    /// Create a waypoint from a position and quaternion
    pub fn new(name: impl Into<String>, position: Vec3, orientation: Quat, duration: f32) -> Self {
        Self {
            name: name.into(),
            pose: Pose::new(position, orientation),
            duration,
        }
    }

    /// Create a waypoint from Euler angles (radians, XYZ order)
    pub fn from_euler(
        name: impl Into<String>,
        position: Vec3,
        euler: [f32; 3],
        duration: f32,
    ) -> Self {
        Self {
            name: name.into(),
            pose: Pose::from_euler_xyz(position, euler[0], euler[1], euler[2]),
            duration,
        }
    }

    /// World-space position
    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    /// Orientation quaternion
    pub fn orientation(&self) -> Quat {
        self.pose.orientation
    }
}

/// Orientation as written in a track file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AuthoredOrientation {
    /// Euler angles in radians, XYZ order
    Euler((f32, f32, f32)),
    /// Quaternion as (x, y, z, w), normalized at load
    Quat((f32, f32, f32, f32)),
}

impl AuthoredOrientation {
    fn to_quat(self) -> Quat {
        match self {
            Self::Euler((x, y, z)) => Quat::from_euler(EulerRot::XYZ, x, y, z),
            Self::Quat((x, y, z, w)) => normalize_or_identity(Quat::from_xyzw(x, y, z, w)),
        }
    }
}

/// Waypoint as written in a track file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthoredWaypoint {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Position as (x, y, z)
    pub position: (f32, f32, f32),
    /// Orientation
    pub orientation: AuthoredOrientation,
    /// Travel duration in seconds
    pub duration: f32,
}

impl From<&AuthoredWaypoint> for Waypoint {
    fn from(authored: &AuthoredWaypoint) -> Self {
        let (x, y, z) = authored.position;
        Waypoint {
            name: authored.name.clone(),
            pose: Pose {
                position: Vec3::new(x, y, z),
                orientation: authored.orientation.to_quat(),
            },
            duration: authored.duration,
        }
    }
}

impl From<&Waypoint> for AuthoredWaypoint {
    fn from(waypoint: &Waypoint) -> Self {
        let p = waypoint.pose.position;
        let q = waypoint.pose.orientation;
        AuthoredWaypoint {
            name: waypoint.name.clone(),
            position: (p.x, p.y, p.z),
            orientation: AuthoredOrientation::Quat((q.x, q.y, q.z, q.w)),
            duration: waypoint.duration,
        }
    }
}

/// On-disk track layout
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrackFile {
    #[serde(default)]
    id: TrackId,
    #[serde(default)]
    name: String,
    waypoints: Vec<AuthoredWaypoint>,
}

/// Error raised when building or loading a track
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    /// Track has no waypoints
    #[error("Track has no waypoints")]
    Empty,

    /// Duration is negative
    #[error("Waypoint {index} has negative duration {duration}")]
    NegativeDuration {
        /// Waypoint index
        index: usize,
        /// Offending duration
        duration: f32,
    },

    /// Duration or pose component is NaN or infinite
    #[error("Waypoint {0} has a non-finite value")]
    NonFinite(usize),

    /// RON parse failure
    #[error("Failed to parse track: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialize failure
    #[error("Failed to serialize track: {0}")]
    Serialize(#[from] ron::Error),

    /// Filesystem failure
    #[error("Track I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An ordered sequence of waypoints
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Unique track ID
    pub id: TrackId,
    /// Track name
    pub name: String,
    waypoints: Vec<Waypoint>,
}

impl Track {
    /// Create an empty track
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TrackId::new(),
            name: name.into(),
            waypoints: Vec::new(),
        }
    }

    /// Create a track from waypoints
    pub fn from_waypoints(name: impl Into<String>, waypoints: Vec<Waypoint>) -> Self {
        Self {
            id: TrackId::new(),
            name: name.into(),
            waypoints,
        }
    }

    /// Append a waypoint
    pub fn push(&mut self, waypoint: Waypoint) {
        self.waypoints.push(waypoint);
    }

    /// Builder-style append
    pub fn with_waypoint(mut self, waypoint: Waypoint) -> Self {
        self.push(waypoint);
        self
    }

    /// Get a waypoint
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Get all waypoints
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Get waypoint count
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the track has no waypoints
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Copy of a waypoint position, or the origin when out of range
    pub fn position_or_zero(&self, index: usize) -> Vec3 {
        self.waypoints
            .get(index)
            .map_or(Vec3::ZERO, Waypoint::position)
    }

    /// Sum of all waypoint durations
    pub fn total_duration(&self) -> f32 {
        self.waypoints.iter().map(|w| w.duration).sum()
    }

    /// Check that every duration is finite and non-negative.
    ///
    /// An empty track passes; the sequencer refuses to start it instead.
    pub fn validate(&self) -> Result<(), TrackError> {
        for (index, waypoint) in self.waypoints.iter().enumerate() {
            let pose = &waypoint.pose;
            if !waypoint.duration.is_finite()
                || !pose.position.is_finite()
                || !pose.orientation.is_finite()
            {
                return Err(TrackError::NonFinite(index));
            }
            if waypoint.duration < 0.0 {
                return Err(TrackError::NegativeDuration {
                    index,
                    duration: waypoint.duration,
                });
            }
        }
        Ok(())
    }

    /// Like [`Track::validate`], but also rejects an empty track
    pub fn validate_playable(&self) -> Result<(), TrackError> {
        if self.is_empty() {
            return Err(TrackError::Empty);
        }
        self.validate()
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String, TrackError> {
        let file = TrackFile {
            id: self.id,
            name: self.name.clone(),
            waypoints: self.waypoints.iter().map(AuthoredWaypoint::from).collect(),
        };
        Ok(ron::ser::to_string_pretty(
            &file,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Deserialize from RON and validate
    pub fn from_ron(s: &str) -> Result<Self, TrackError> {
        let file: TrackFile = ron::from_str(s)?;
        let track = Self {
            id: file.id,
            name: file.name,
            waypoints: file.waypoints.iter().map(Waypoint::from).collect(),
        };
        track.validate_playable()?;
        Ok(track)
    }

    /// Save track to file
    pub fn save(&self, path: &Path) -> Result<(), TrackError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Load track from file
    pub fn load(path: &Path) -> Result<Self, TrackError> {
        let contents = std::fs::read_to_string(path)?;
        let track = Self::from_ron(&contents)?;
        tracing::debug!(
            "Loaded track '{}' with {} waypoints from {}",
            track.name,
            track.len(),
            path.display()
        );
        Ok(track)
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::new("Untitled Track")
    }
}
