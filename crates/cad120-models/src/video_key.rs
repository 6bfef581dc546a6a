//! Video key identifying one recording.
//!
//! A key is the `(subject, activity, video)` triple. It is flattened to a
//! single string by joining with `_`, e.g. `Subject1_making_cereal_0510`.
//! Activity names may contain `_`; subject and video ids may not.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Delimiter used when flattening a key.
pub const KEY_DELIMITER: char = '_';

/// Unique `(subject, activity, video)` triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VideoKey {
    /// Subject directory name, e.g. `Subject1`
    pub subject: String,
    /// Super-activity name, e.g. `making_cereal`
    pub activity: String,
    /// Video id as it appears in the annotation files
    pub video: String,
}

impl VideoKey {
    /// Create a new key.
    pub fn new(
        subject: impl Into<String>,
        activity: impl Into<String>,
        video: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            activity: activity.into(),
            video: video.into(),
        }
    }

    /// Flatten to `subject_activity_video`.
    pub fn flatten(&self) -> String {
        make_key(&self.subject, &self.activity, &self.video)
    }

    /// Parse a flattened key.
    pub fn parse(key: &str) -> ModelResult<Self> {
        let (subject, activity, video) = break_key(key)?;
        Ok(Self::new(subject, activity, video))
    }
}

impl fmt::Display for VideoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{d}{}{d}{}",
            self.subject,
            self.activity,
            self.video,
            d = KEY_DELIMITER
        )
    }
}

impl FromStr for VideoKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Join the three key parts with the key delimiter.
pub fn make_key(subject: &str, activity: &str, video: &str) -> String {
    format!(
        "{subject}{d}{activity}{d}{video}",
        d = KEY_DELIMITER
    )
}

/// Split a flattened key back into `(subject, activity, video)`.
///
/// The first token is the subject, the last token the video id, and
/// everything between (re-joined) the activity name.
pub fn break_key(key: &str) -> ModelResult<(String, String, String)> {
    let tokens: Vec<&str> = key.split(KEY_DELIMITER).collect();
    if tokens.len() < 3 {
        return Err(ModelError::invalid_key(key));
    }

    let subject = tokens[0];
    let video = tokens[tokens.len() - 1];
    let activity = tokens[1..tokens.len() - 1].join(&KEY_DELIMITER.to_string());

    if subject.is_empty() || video.is_empty() || activity.is_empty() {
        return Err(ModelError::invalid_key(key));
    }

    Ok((subject.to_string(), activity, video.to_string()))
}
