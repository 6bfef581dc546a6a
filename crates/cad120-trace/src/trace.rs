//! Timestamp-indexed world trace.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::state::{ObjectState, WorldState};

/// Sequence of world states keyed by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldTrace {
    /// Flattened video key the trace was built from
    pub description: String,
    pub trace: BTreeMap<u32, WorldState>,
}

impl WorldTrace {
    /// Create an empty trace.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            trace: BTreeMap::new(),
        }
    }

    /// Append an entity state at its timestamp.
    pub fn add_object_state(&mut self, state: ObjectState) {
        self.trace
            .entry(state.timestamp)
            .or_insert_with(|| WorldState::new(state.timestamp))
            .insert(state);
    }

    /// Append several states in order.
    pub fn add_object_states(&mut self, states: impl IntoIterator<Item = ObjectState>) {
        for state in states {
            self.add_object_state(state);
        }
    }

    /// Timestamps in ascending order.
    pub fn sorted_timestamps(&self) -> Vec<u32> {
        self.trace.keys().copied().collect()
    }

    /// All states recorded at `timestamp`.
    pub fn world_state(&self, timestamp: u32) -> Option<&WorldState> {
        self.trace.get(&timestamp)
    }

    /// State of `name` at `timestamp`, if recorded.
    pub fn object_state(&self, timestamp: u32, name: &str) -> Option<&ObjectState> {
        self.trace.get(&timestamp).and_then(|ws| ws.get(name))
    }

    /// Number of timestamps.
    pub fn len(&self) -> usize {
        self.trace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }
}
