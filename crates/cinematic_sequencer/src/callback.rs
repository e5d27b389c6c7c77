// SPDX-License-Identifier: MIT OR Apache-2.0
//! Arrival callbacks, keyed by waypoint index.

use crate::pose::Pose;
use indexmap::IndexMap;
use std::fmt;

/// Snapshot handed to a callback when its waypoint is reached.
///
/// Built after the sequencer has advanced, so `index` and `pose` describe the
/// post-arrival state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointReached {
    /// Index of the waypoint just reached
    pub index: usize,
    /// Camera pose at arrival (the waypoint's own pose)
    pub pose: Pose,
    /// Whether this is the final waypoint of the track
    pub is_last: bool,
}

/// Side effect attached to a waypoint
pub type WaypointCallback = Box<dyn FnMut(&WaypointReached)>;

/// Index-keyed store of arrival callbacks
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: IndexMap<usize, WaypointCallback>,
}

impl CallbackRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach or replace the callback for `index`
    pub fn set(&mut self, index: usize, callback: WaypointCallback) {
        self.callbacks.insert(index, callback);
    }

    /// Remove the callback for `index`, returning whether one was bound
    pub fn remove(&mut self, index: usize) -> bool {
        self.callbacks.shift_remove(&index).is_some()
    }

    /// Whether a callback is bound to `index`
    pub fn contains(&self, index: usize) -> bool {
        self.callbacks.contains_key(&index)
    }

    /// Drop bindings at or beyond `len`
    pub fn retain_below(&mut self, len: usize) {
        self.callbacks.retain(|index, _| *index < len);
    }

    /// Invoke the callback for `event.index`, if any. Returns whether one ran.
    pub fn dispatch(&mut self, event: &WaypointReached) -> bool {
        match self.callbacks.get_mut(&event.index) {
            Some(callback) => {
                callback(event);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("indices", &self.callbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}
