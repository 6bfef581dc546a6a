//! Reader error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

use cad120_models::VideoKey;

pub type ReaderResult<T> = Result<T, ReaderError>;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Non-contiguous segments in {key}: segment ending at frame {previous_end} followed by segment starting at frame {next_start}")]
    NonContiguousSegments {
        key: VideoKey,
        previous_end: u32,
        next_start: u32,
    },

    #[error("Malformed label line {line} in {}: {reason}", path.display())]
    MalformedLabelLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Malformed skeleton line {line} in {}: {reason}", path.display())]
    MalformedSkeletonLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Cache artifact not found: {}", .0.display())]
    CacheMiss(PathBuf),

    #[error("Cache artifact {} is unusable: {reason}", path.display())]
    CacheCorrupt { path: PathBuf, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReaderError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn malformed_label(path: &Path, line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLabelLine {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    pub fn malformed_skeleton(path: &Path, line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedSkeletonLine {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    pub fn cache_corrupt(path: &Path, reason: impl Into<String>) -> Self {
        Self::CacheCorrupt {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Wrap an IO error with the path being read. `NotFound` becomes
    /// [`ReaderError::MissingFile`].
    pub fn read(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingFile(path.to_path_buf())
        } else {
            Self::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Whether the error only reports a missing input file.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, ReaderError::MissingFile(_))
    }

    /// Whether the caller may fall back to rebuilding from raw files.
    pub fn is_cache_miss(&self) -> bool {
        matches!(
            self,
            ReaderError::CacheMiss(_) | ReaderError::CacheCorrupt { .. }
        )
    }
}
