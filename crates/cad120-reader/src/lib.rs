//! CAD120 dataset reader.
//!
//! This crate provides:
//! - Parsers for label, object and skeleton annotation files
//! - Expansion of time segments into per-frame sub-activity labels
//! - Assembly of per-video world traces
//! - Gzip JSON cache artifacts with explicit load/build selection

pub mod assembler;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod objects;
pub mod reader;
pub mod segmentation;
pub mod sequence;
pub mod skeleton;
pub mod tokenize;

pub use cache::{CacheArtifacts, CacheStrategy};
pub use config::ReaderConfig;
pub use error::{ReaderError, ReaderResult};
pub use logging::RunLogger;
pub use reader::{Cad120Reader, Trajectories};
pub use skeleton::{project, SkeletonTrack};
