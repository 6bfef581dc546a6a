//! Model error types.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while constructing or parsing model values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Invalid video key: {0}")]
    InvalidKey(String),

    #[error("Unknown joint code: {0}")]
    UnknownJoint(String),

    #[error("Invalid segment {label} (frames {start_frame}..={end_frame}): {reason}")]
    InvalidSegment {
        label: String,
        start_frame: u32,
        end_frame: u32,
        reason: String,
    },
}

impl ModelError {
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey(key.into())
    }

    pub fn unknown_joint(code: impl Into<String>) -> Self {
        Self::UnknownJoint(code.into())
    }

    pub fn invalid_segment(
        label: impl Into<String>,
        start_frame: u32,
        end_frame: u32,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidSegment {
            label: label.into(),
            start_frame,
            end_frame,
            reason: reason.into(),
        }
    }
}
