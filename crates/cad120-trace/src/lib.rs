//! Timestamp-indexed world traces.
//!
//! A `WorldTrace` holds, for every timestamp, the state of each named entity
//! (objects and skeleton joints). Downstream spatial-relation analysis reads
//! traces through the sorted-timestamp and per-entity lookup API.

pub mod collection;
pub mod state;
pub mod trace;

pub use collection::TraceCollection;
pub use state::{Category, ObjectState, WorldState};
pub use trace::WorldTrace;
