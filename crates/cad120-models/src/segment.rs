//! Sub-activity time segmentation models.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::video_key::VideoKey;

/// One labelled run of frames inside a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSegment {
    /// Sub-activity label, e.g. `reaching`
    pub activity_label: String,
    /// First frame (inclusive)
    pub start_frame: u32,
    /// Last frame (inclusive)
    pub end_frame: u32,
    /// `end_frame - start_frame + 1`
    pub duration_frames: u32,
}

impl TimeSegment {
    /// Create a segment, computing its duration.
    pub fn new(label: impl Into<String>, start_frame: u32, end_frame: u32) -> ModelResult<Self> {
        let activity_label = label.into();
        let span = end_frame.checked_sub(start_frame).ok_or_else(|| {
            ModelError::invalid_segment(
                activity_label.as_str(),
                start_frame,
                end_frame,
                "end frame precedes start frame",
            )
        })?;
        // A segment covering every u32 frame has no representable duration.
        let duration_frames = span.checked_add(1).ok_or_else(|| {
            ModelError::invalid_segment(
                activity_label.as_str(),
                start_frame,
                end_frame,
                "duration exceeds the frame counter range",
            )
        })?;
        Ok(Self {
            activity_label,
            start_frame,
            end_frame,
            duration_frames,
        })
    }

    /// Whether `next` starts on the frame right after this segment ends.
    pub fn is_followed_by(&self, next: &TimeSegment) -> bool {
        self.end_frame.checked_add(1) == Some(next.start_frame)
    }
}

/// All time segments of one video, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSegmentation {
    pub key: VideoKey,
    pub segments: Vec<TimeSegment>,
}

impl VideoSegmentation {
    pub fn new(key: VideoKey) -> Self {
        Self {
            key,
            segments: Vec::new(),
        }
    }

    /// Total number of frames covered by the segments.
    pub fn total_frames(&self) -> u64 {
        self.segments.iter().map(|s| s.duration_frames as u64).sum()
    }
}

/// Per-frame sub-activity labels of one video.
///
/// `frame_labels[0]` belongs to the first frame of the first segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubActivitySequence {
    pub key: VideoKey,
    pub frame_labels: Vec<String>,
}

impl SubActivitySequence {
    pub fn len(&self) -> usize {
        self.frame_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_duration() {
        let seg = TimeSegment::new("reaching", 1, 5).unwrap();
        assert_eq!(seg.duration_frames, 5);

        let single = TimeSegment::new("null", 7, 7).unwrap();
        assert_eq!(single.duration_frames, 1);
    }

    #[test]
    fn test_segment_rejects_reversed_frames() {
        let result = TimeSegment::new("moving", 10, 4);
        assert!(matches!(result, Err(ModelError::InvalidSegment { .. })));
    }

    #[test]
    fn test_segment_rejects_unrepresentable_duration() {
        let result = TimeSegment::new("reaching", 0, u32::MAX);
        match result {
            Err(ModelError::InvalidSegment { reason, .. }) => assert!(reason.contains("duration")),
            other => panic!("expected InvalidSegment, got {:?}", other),
        }

        let widest = TimeSegment::new("reaching", 1, u32::MAX).unwrap();
        assert_eq!(widest.duration_frames, u32::MAX);
    }

    #[test]
    fn test_is_followed_by() {
        let a = TimeSegment::new("reaching", 1, 5).unwrap();
        let b = TimeSegment::new("moving", 6, 8).unwrap();
        let c = TimeSegment::new("moving", 7, 8).unwrap();
        assert!(a.is_followed_by(&b));
        assert!(!a.is_followed_by(&c));
    }

    #[test]
    fn test_total_frames() {
        let mut seg = VideoSegmentation::new(VideoKey::new("Subject1", "having_meal", "1"));
        seg.segments.push(TimeSegment::new("reaching", 1, 5).unwrap());
        seg.segments.push(TimeSegment::new("moving", 6, 8).unwrap());
        assert_eq!(seg.total_frames(), 8);
    }
}
