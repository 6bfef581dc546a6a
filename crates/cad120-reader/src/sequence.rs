//! Expansion of time segments into per-frame label sequences.

use std::collections::BTreeMap;

use cad120_models::{SubActivitySequence, TimeSegment, VideoSegmentation};

use crate::error::{ReaderError, ReaderResult};

/// Expand one video's segments into a per-frame label sequence.
///
/// The first segment may start anywhere. Every following segment must start
/// on the frame after its predecessor ends.
pub fn expand_segments(segmentation: &VideoSegmentation) -> ReaderResult<SubActivitySequence> {
    let capacity = segmentation.total_frames() as usize;
    let mut frame_labels = Vec::with_capacity(capacity);
    let mut previous: Option<&TimeSegment> = None;

    for segment in &segmentation.segments {
        if let Some(prev) = previous {
            if !prev.is_followed_by(segment) {
                return Err(ReaderError::NonContiguousSegments {
                    key: segmentation.key.clone(),
                    previous_end: prev.end_frame,
                    next_start: segment.start_frame,
                });
            }
        }
        frame_labels.extend(
            std::iter::repeat(segment.activity_label.clone()).take(segment.duration_frames as usize),
        );
        previous = Some(segment);
    }

    Ok(SubActivitySequence {
        key: segmentation.key.clone(),
        frame_labels,
    })
}

/// Expand every segmentation, aborting on the first inconsistent video.
pub fn expand_all(segmentations: &[VideoSegmentation]) -> ReaderResult<Vec<SubActivitySequence>> {
    segmentations.iter().map(expand_segments).collect()
}

/// Index sequences by flattened key.
pub fn sequences_by_key(sequences: &[SubActivitySequence]) -> BTreeMap<String, Vec<String>> {
    sequences
        .iter()
        .map(|s| (s.key.flatten(), s.frame_labels.clone()))
        .collect()
}
