//! Shared data models for the CAD120 trace reader.
//!
//! This crate provides Serde-serializable types for:
//! - Video keys and their flattened string form
//! - Sub-activity time segments and per-frame label sequences
//! - Object bounding boxes and resolved object states
//! - Skeleton joints, fixed-field joint records and pass filters
//! - The dataset's subject/activity vocabulary

pub mod bbox;
pub mod error;
pub mod joint;
pub mod object;
pub mod segment;
pub mod video_key;
pub mod vocabulary;

// Re-export common types
pub use bbox::{BoundingBox, CenterExtent};
pub use error::{ModelError, ModelResult};
pub use joint::{Joint, JointFilter, Pixel, Point3, Skeleton, ORIENTED_JOINTS, TOTAL_JOINTS};
pub use object::{object_key, ObjectFrameState, UNKNOWN_OBJECT_TYPE};
pub use segment::{SubActivitySequence, TimeSegment, VideoSegmentation};
pub use video_key::{break_key, make_key, VideoKey, KEY_DELIMITER};
