//! Sub-activity time segmentation builder.
//!
//! Reads each `(subject, activity)` pair's `labeling.txt` and groups its
//! lines into per-video segment lists, keeping file order.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use cad120_models::{TimeSegment, VideoKey, VideoSegmentation};

use crate::config::ReaderConfig;
use crate::error::{ReaderError, ReaderResult};
use crate::tokenize::{parse_frame, read_lines, split_compact};

/// Build time segmentations for every active subject and activity.
///
/// A missing label file is logged and skipped.
pub fn build_segmentations(config: &ReaderConfig) -> ReaderResult<Vec<VideoSegmentation>> {
    let video_filter = config.active_video();
    let mut all = Vec::new();

    for subject in config.active_subjects() {
        for activity in config.active_activities() {
            let path = config.labeling_file(&subject, &activity);
            match read_label_file(&path, &subject, &activity, video_filter) {
                Ok(mut segmentations) => {
                    debug!(
                        subject = %subject,
                        activity = %activity,
                        videos = segmentations.len(),
                        "Read label file"
                    );
                    all.append(&mut segmentations);
                }
                Err(ReaderError::MissingFile(missing)) => {
                    warn!(
                        subject = %subject,
                        activity = %activity,
                        path = %missing.display(),
                        "Label file not found, skipping"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    info!(videos = all.len(), "Built sub-activity time segmentations");
    Ok(all)
}

/// Parse one label file into per-video segment lists.
///
/// With `video_filter` set, lines of other videos are ignored and reading
/// stops once the filtered video's lines have ended.
pub fn read_label_file(
    path: &Path,
    subject: &str,
    activity: &str,
    video_filter: Option<&str>,
) -> ReaderResult<Vec<VideoSegmentation>> {
    let mut segmentations: Vec<VideoSegmentation> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut seen_filtered = false;

    for (line_no, line) in read_lines(path)?.enumerate() {
        let line = line.map_err(|e| ReaderError::read(path, e))?;
        let line_no = line_no + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_compact(&line);
        if fields.len() < 4 {
            return Err(ReaderError::malformed_label(
                path,
                line_no,
                format!("expected at least 4 fields, found {}", fields.len()),
            ));
        }

        let video = fields[0].as_str();
        if let Some(wanted) = video_filter {
            if video != wanted {
                if seen_filtered {
                    break;
                }
                continue;
            }
            seen_filtered = true;
        }

        let start = parse_frame(&fields[1]).ok_or_else(|| {
            ReaderError::malformed_label(path, line_no, format!("bad start frame '{}'", fields[1]))
        })?;
        let end = parse_frame(&fields[2]).ok_or_else(|| {
            ReaderError::malformed_label(path, line_no, format!("bad end frame '{}'", fields[2]))
        })?;
        let segment = TimeSegment::new(fields[3].as_str(), start, end)
            .map_err(|e| ReaderError::malformed_label(path, line_no, e.to_string()))?;

        let slot = *index.entry(video.to_string()).or_insert_with(|| {
            segmentations.push(VideoSegmentation::new(VideoKey::new(subject, activity, video)));
            segmentations.len() - 1
        });
        segmentations[slot].segments.push(segment);
    }

    Ok(segmentations)
}
