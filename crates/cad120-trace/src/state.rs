//! Entity states at a single timestamp.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of entity a state describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Tracked object (bounding box)
    Object,
    /// Skeleton joint (point)
    Joint,
}

impl Category {
    /// Get the serialized tag for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Object => "object",
            Category::Joint => "joint",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one named entity at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    /// Entity name, e.g. `bowl_1` or `LH`
    pub name: String,
    /// Frame number
    pub timestamp: u32,
    /// Center x in pixels
    pub x: f64,
    /// Center y in pixels
    pub y: f64,
    /// Extent along x, if the entity has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Extent along y, if the entity has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    pub category: Category,
}

impl ObjectState {
    /// Create a point-like state with no extent.
    ///
    /// # Arguments
    /// * `name` - Entity name (`{type}_{id}` for objects, joint code for joints)
    /// * `timestamp` - Frame number
    /// * `x`, `y` - Center in image pixels
    /// * `category` - Whether the entity is an object or a joint
    pub fn point(name: impl Into<String>, timestamp: u32, x: f64, y: f64, category: Category) -> Self {
        Self {
            name: name.into(),
            timestamp,
            x,
            y,
            width: None,
            length: None,
            category,
        }
    }

    /// Attach an extent.
    pub fn with_size(mut self, width: f64, length: f64) -> Self {
        self.width = Some(width);
        self.length = Some(length);
        self
    }
}

/// All entity states recorded at one timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Frame number shared by every state below
    pub timestamp: u32,
    /// Entity name → state, in name order
    pub objects: BTreeMap<String, ObjectState>,
}

impl WorldState {
    /// Create an empty world state for `timestamp`.
    pub fn new(timestamp: u32) -> Self {
        Self {
            timestamp,
            objects: BTreeMap::new(),
        }
    }

    /// Look up an entity by name.
    pub fn get(&self, name: &str) -> Option<&ObjectState> {
        self.objects.get(name)
    }

    /// Insert a state, replacing any previous state of the same entity.
    pub fn insert(&mut self, state: ObjectState) {
        self.objects.insert(state.name.clone(), state);
    }
}
