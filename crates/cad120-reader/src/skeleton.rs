//! Skeleton track parser.
//!
//! Each line is `frame` followed by the 15 joints in file order. The first 11
//! joints carry an orientation block (9 matrix values + 1 confidence) before
//! their position (3 values + 1 confidence); the last 4 carry only the
//! position block. Reading stops at a line containing `END`.
//!
//! Only 3D positions are kept. Each is projected to image pixels with a fixed
//! affine camera calibration.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use cad120_models::{Joint, JointFilter, Pixel, Point3, Skeleton, ORIENTED_JOINTS, TOTAL_JOINTS};

use crate::error::{ReaderError, ReaderResult};
use crate::tokenize::{parse_float, parse_frame, read_lines, split_record, FrameDecision, FrameRange};

/// Orientation matrix plus its confidence.
const ORIENTATION_FIELDS: usize = 10;

/// Position plus its confidence.
const POSITION_FIELDS: usize = 4;

/// Fields per skeleton line, frame number included.
pub const SKELETON_FIELDS: usize =
    1 + ORIENTED_JOINTS * (ORIENTATION_FIELDS + POSITION_FIELDS) + (TOTAL_JOINTS - ORIENTED_JOINTS) * POSITION_FIELDS;

/// Sentinel marking the end of a skeleton file.
const END_MARKER: &str = "END";

/// Project a 3D joint position to image pixels.
pub fn project(p: Point3) -> Pixel {
    let x = 313.7168912249856 + 0.2930586285744 * p.x - 0.0019333071312 * p.y + 0.0047147840046 * p.z;
    let y = 251.0714402022862 + 0.0006460343298 * p.x - 0.3554622280590 * p.y - 0.0066403457871 * p.z;
    Pixel::new(x.round() as i32, y.round() as i32)
}

/// Joint positions of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonFrame {
    pub frame: u32,
    pub positions: Skeleton<Point3>,
    pub pixels: Skeleton<Pixel>,
}

/// Parsed skeleton file, ordered by frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonTrack {
    pub frames: BTreeMap<u32, SkeletonFrame>,
}

impl SkeletonTrack {
    /// Projected joints passed by `filter`, per frame, in filter order.
    pub fn joints_2d(&self, filter: &JointFilter) -> BTreeMap<u32, Vec<(Joint, Pixel)>> {
        let joints = filter.joints();
        self.frames
            .iter()
            .map(|(&frame, record)| {
                let pixels = joints.iter().map(|&j| (j, *record.pixels.get(j))).collect();
                (frame, pixels)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Field index of a joint's position block within a split line.
fn position_offset(joint: Joint) -> usize {
    let index = joint.index();
    let oriented_before = index.min(ORIENTED_JOINTS);
    let mut offset = 1 + oriented_before * (ORIENTATION_FIELDS + POSITION_FIELDS)
        + (index - oriented_before) * POSITION_FIELDS;
    if joint.has_orientation() {
        offset += ORIENTATION_FIELDS;
    }
    offset
}

/// Parse one skeleton line. `line_no` and `path` are used for errors.
pub fn parse_skeleton_line(line: &str, path: &Path, line_no: usize) -> ReaderResult<SkeletonFrame> {
    let fields = split_record(line.trim());
    if fields.len() != SKELETON_FIELDS {
        return Err(ReaderError::malformed_skeleton(
            path,
            line_no,
            format!("expected {} fields, found {}", SKELETON_FIELDS, fields.len()),
        ));
    }

    let frame = parse_frame(fields[0]).ok_or_else(|| {
        ReaderError::malformed_skeleton(path, line_no, format!("bad frame number '{}'", fields[0]))
    })?;

    let value = |i: usize| {
        parse_float(fields[i]).ok_or_else(|| {
            ReaderError::malformed_skeleton(path, line_no, format!("bad value '{}' at field {}", fields[i], i))
        })
    };

    let positions = Skeleton::try_from_fn(|joint| {
        let at = position_offset(joint);
        Ok::<_, ReaderError>(Point3::new(value(at)?, value(at + 1)?, value(at + 2)?))
    })?;
    let pixels = positions.map(|p| project(*p));

    Ok(SkeletonFrame {
        frame,
        positions,
        pixels,
    })
}

/// Parse a skeleton file.
pub fn parse_skeleton_file(path: &Path, range: FrameRange) -> ReaderResult<SkeletonTrack> {
    let mut track = SkeletonTrack::default();

    for (line_no, line) in read_lines(path)?.enumerate() {
        let line = line.map_err(|e| ReaderError::read(path, e))?;
        if line.contains(END_MARKER) {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_skeleton_line(&line, path, line_no + 1)?;
        match range.decide(record.frame) {
            FrameDecision::Skip => continue,
            FrameDecision::Stop => break,
            FrameDecision::Keep => {
                track.frames.insert(record.frame, record);
            }
        }
    }

    debug!(path = %path.display(), frames = track.len(), "Parsed skeleton file");
    Ok(track)
}
