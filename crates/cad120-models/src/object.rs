//! Object detection models.

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;

/// Type name used when `activityLabel.txt` has no entry for an object id.
pub const UNKNOWN_OBJECT_TYPE: &str = "unknown";

/// Resolved state of one object at one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectFrameState {
    pub frame: u32,
    pub object_id: u32,
    /// Object type name, `unknown` if untyped
    pub object_type: String,
    pub bbox: BoundingBox,
}

impl ObjectFrameState {
    /// Entity name used in traces: `{type}_{object_id}`.
    pub fn key(&self) -> String {
        object_key(&self.object_type, self.object_id)
    }
}

/// Build the `{type}_{object_id}` entity name.
pub fn object_key(object_type: &str, object_id: u32) -> String {
    format!("{}_{}", object_type, object_id)
}
