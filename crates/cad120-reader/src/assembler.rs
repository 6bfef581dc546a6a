//! Trace assembler.
//!
//! Drives the object and skeleton parsers for each video and appends their
//! states to one `WorldTrace` per video, in frame order and then entity-name
//! order.

use std::collections::BTreeMap;
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use cad120_models::{Joint, JointFilter, VideoKey};
use cad120_trace::{Category, ObjectState, TraceCollection, WorldTrace};

use crate::config::{ReaderConfig, ACTIVITY_LABEL_FILE};
use crate::error::{ReaderError, ReaderResult};
use crate::objects::{parse_object_tracks, ObjectFrames};
use crate::skeleton::{parse_skeleton_file, SkeletonTrack};
use crate::tokenize::{read_lines, FrameRange};

/// Append object states (category `object`, with extent) to `trace`.
pub fn append_object_frames(trace: &mut WorldTrace, frames: &ObjectFrames) {
    for (&frame, objects) in frames {
        for (name, state) in objects {
            let ce = state.bbox.to_center_extent();
            trace.add_object_state(
                ObjectState::point(name.as_str(), frame, ce.x, ce.y, Category::Object)
                    .with_size(ce.width, ce.length),
            );
        }
    }
}

/// Append projected joint states (category `joint`) passed by `filter`.
pub fn append_skeleton_track(trace: &mut WorldTrace, track: &SkeletonTrack, filter: &JointFilter) {
    for (frame, joints) in track.joints_2d(filter) {
        trace.add_object_states(joints.into_iter().map(|(joint, pixel)| {
            ObjectState::point(joint.code(), frame, pixel.x as f64, pixel.y as f64, Category::Joint)
        }));
    }
}

/// Video ids listed in an activity directory's `activityLabel.txt`.
pub fn list_videos(activity_dir: &Path) -> ReaderResult<Vec<String>> {
    let path = activity_dir.join(ACTIVITY_LABEL_FILE);
    let mut videos = Vec::new();
    for line in read_lines(&path)? {
        let line = line.map_err(|e| ReaderError::read(&path, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(video) = line.split(',').next().map(str::trim).filter(|v| !v.is_empty()) {
            if !videos.iter().any(|v| v == video) {
                videos.push(video.to_string());
            }
        }
    }
    Ok(videos)
}

/// Keys of every video whose tracks should be read.
pub fn track_video_keys(config: &ReaderConfig) -> ReaderResult<Vec<VideoKey>> {
    if let Some(episode) = &config.episode {
        return Ok(vec![episode.clone()]);
    }

    let mut keys = Vec::new();
    for subject in config.active_subjects() {
        for activity in config.active_activities() {
            let dir = config.tracks_activity_dir(&subject, &activity);
            match list_videos(&dir) {
                Ok(videos) => {
                    keys.extend(videos.into_iter().map(|v| VideoKey::new(subject.as_str(), activity.as_str(), v)));
                }
                Err(ReaderError::MissingFile(path)) => {
                    warn!(
                        subject = %subject,
                        activity = %activity,
                        path = %path.display(),
                        "Activity label file not found, skipping tracks"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
    Ok(keys)
}

/// Build the world trace of one video.
///
/// Missing object or skeleton files are logged; the trace then holds
/// whatever was found.
pub fn build_video_trace(config: &ReaderConfig, key: &VideoKey) -> ReaderResult<WorldTrace> {
    let span = info_span!("video_trace", key = %key);
    let _enter = span.enter();

    let dir = config.tracks_activity_dir(&key.subject, &key.activity);
    let mut trace = WorldTrace::new(key.flatten());

    match parse_object_tracks(&dir, &key.video, FrameRange::all()) {
        Ok(frames) => append_object_frames(&mut trace, &frames),
        Err(ReaderError::MissingFile(path)) => {
            warn!(path = %path.display(), "Object tracks not found");
        }
        Err(e) => return Err(e),
    }

    let skeleton_path = dir.join(format!("{}.txt", key.video));
    match parse_skeleton_file(&skeleton_path, FrameRange::all()) {
        Ok(track) => append_skeleton_track(&mut trace, &track, &config.skeleton_filter),
        Err(ReaderError::MissingFile(path)) => {
            warn!(path = %path.display(), "Skeleton file not found");
        }
        Err(e) => return Err(e),
    }

    debug!(timestamps = trace.len(), "Built world trace");
    Ok(trace)
}

/// Build world traces for every active video.
pub fn build_traces(config: &ReaderConfig) -> ReaderResult<TraceCollection> {
    let keys = track_video_keys(config)?;
    info!(videos = keys.len(), parallel = config.parallel, "Building tracks from raw files");

    let build = |key: &VideoKey| build_video_trace(config, key).map(|trace| (key.flatten(), trace));
    let traces: Vec<(String, WorldTrace)> = if config.parallel {
        keys.par_iter().map(build).collect::<ReaderResult<_>>()?
    } else {
        keys.iter().map(build).collect::<ReaderResult<_>>()?
    };

    Ok(traces.into_iter().collect())
}

/// Per-joint `(x, y)` trajectories over a trace's sorted timestamps.
///
/// A joint absent at a timestamp repeats its last known state. Timestamps
/// before a joint's first appearance contribute nothing for that joint.
pub fn skeleton_trajectories(trace: &WorldTrace, filter: &JointFilter) -> BTreeMap<Joint, Vec<(f64, f64)>> {
    let joints = filter.joints();
    let mut trajectories: BTreeMap<Joint, Vec<(f64, f64)>> =
        joints.iter().map(|&j| (j, Vec::new())).collect();
    let mut last_known: BTreeMap<Joint, (f64, f64)> = BTreeMap::new();

    for timestamp in trace.sorted_timestamps() {
        for &joint in &joints {
            let point = match trace.object_state(timestamp, joint.code()) {
                Some(state) => {
                    let point = (state.x, state.y);
                    last_known.insert(joint, point);
                    Some(point)
                }
                None => last_known.get(&joint).copied(),
            };
            if let (Some(point), Some(list)) = (point, trajectories.get_mut(&joint)) {
                list.push(point);
            }
        }
    }

    trajectories
}
