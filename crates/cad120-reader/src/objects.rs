//! Object track parser.
//!
//! Each video has one `{video}_obj{n}.txt` file per tracked object. Lines are
//! `frame,object_id,min_x,min_y,max_x,max_y` followed by six STIP features.
//! An all-zero box marks an occluded frame; the object's last seen box is
//! repeated for it, and nothing is recorded before the object is first seen.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use cad120_models::{object_key, BoundingBox, ObjectFrameState, UNKNOWN_OBJECT_TYPE};

use crate::config::ACTIVITY_LABEL_FILE;
use crate::error::{ReaderError, ReaderResult};
use crate::tokenize::{parse_float, parse_frame, parse_int, read_lines, split_record, FrameDecision, FrameRange};

/// Fields per detection line.
pub const DETECTION_FIELDS: usize = 12;

/// Index of the first `objectId:typeName` field in `activityLabel.txt`.
const OBJECT_INFO_INDEX: usize = 3;

/// Frame → object key → state.
pub type ObjectFrames = BTreeMap<u32, BTreeMap<String, ObjectFrameState>>;

/// One parsed detection line.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub frame: u32,
    pub object_id: u32,
    pub bbox: BoundingBox,
    /// STIP difference features; parsed for validation only
    pub stip: [f64; 6],
}

/// Parse a detection line. Returns `None` for malformed lines.
pub fn parse_detection_line(line: &str) -> Option<Detection> {
    let fields = split_record(line.trim());
    if fields.len() != DETECTION_FIELDS {
        return None;
    }

    let frame = parse_frame(fields[0])?;
    let object_id = u32::try_from(parse_int(fields[1])?).ok()?;
    let mut coords = [0.0; 4];
    for (slot, field) in coords.iter_mut().zip(&fields[2..6]) {
        *slot = parse_int(field)? as f64;
    }
    let mut stip = [0.0; 6];
    for (slot, field) in stip.iter_mut().zip(&fields[6..]) {
        *slot = parse_float(field)?;
    }

    Some(Detection {
        frame,
        object_id,
        bbox: BoundingBox::new(coords[0], coords[1], coords[2], coords[3]),
        stip,
    })
}

/// Read the object-id → type-name lookup for `video` from `activityLabel.txt`.
pub fn read_object_types(activity_dir: &Path, video: &str) -> ReaderResult<HashMap<u32, String>> {
    let path = activity_dir.join(ACTIVITY_LABEL_FILE);
    let mut types = HashMap::new();

    for line in read_lines(&path)? {
        let line = line.map_err(|e| ReaderError::read(&path, e))?;
        let fields: Vec<&str> = line.trim().split(',').collect();
        if fields.first().map(|f| f.trim()) != Some(video) {
            continue;
        }
        for info in fields.iter().skip(OBJECT_INFO_INDEX) {
            let info = info.trim();
            if info.is_empty() {
                continue;
            }
            let parsed = info
                .split_once(':')
                .and_then(|(id, name)| Some((parse_int(id).and_then(|i| u32::try_from(i).ok())?, name.trim())));
            match parsed {
                Some((id, name)) if !name.is_empty() => {
                    types.insert(id, name.to_string());
                }
                _ => {
                    warn!(path = %path.display(), video = %video, field = %info, "Ignoring malformed object type entry");
                }
            }
        }
    }

    Ok(types)
}

/// List `{video}_obj*` files in `activity_dir`, sorted by name.
pub fn object_files(activity_dir: &Path, video: &str) -> ReaderResult<Vec<PathBuf>> {
    let prefix = format!("{}_obj", video);
    let entries = std::fs::read_dir(activity_dir).map_err(|e| ReaderError::read(activity_dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ReaderError::read(activity_dir, e))?;
        if entry.file_name().to_string_lossy().starts_with(&prefix) && entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Accumulates object states across a video's files, carrying boxes over
/// occluded frames.
#[derive(Debug, Default)]
pub struct ObjectTrackBuilder {
    types: HashMap<u32, String>,
    last_known: HashMap<u32, BoundingBox>,
    frames: ObjectFrames,
}

impl ObjectTrackBuilder {
    pub fn new(types: HashMap<u32, String>) -> Self {
        Self {
            types,
            ..Self::default()
        }
    }

    fn object_type(&self, object_id: u32) -> &str {
        self.types
            .get(&object_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_OBJECT_TYPE)
    }

    /// Record one detection.
    pub fn push(&mut self, detection: &Detection) {
        let bbox = if detection.bbox.is_occluded() {
            match self.last_known.get(&detection.object_id) {
                Some(prior) => *prior,
                None => return,
            }
        } else {
            self.last_known.insert(detection.object_id, detection.bbox);
            detection.bbox
        };

        let state = ObjectFrameState {
            frame: detection.frame,
            object_id: detection.object_id,
            object_type: self.object_type(detection.object_id).to_string(),
            bbox,
        };
        self.frames
            .entry(detection.frame)
            .or_default()
            .insert(object_key(&state.object_type, state.object_id), state);
    }

    /// Parse one object file into the builder.
    ///
    /// The first blank or whitespace-only line ends the file; detections
    /// after it are ignored.
    pub fn read_file(&mut self, path: &Path, range: FrameRange) -> ReaderResult<()> {
        let mut skipped = 0usize;

        for line in read_lines(path)? {
            let line = line.map_err(|e| ReaderError::read(path, e))?;
            if line.trim().is_empty() {
                break;
            }
            let Some(detection) = parse_detection_line(&line) else {
                skipped += 1;
                continue;
            };
            match range.decide(detection.frame) {
                FrameDecision::Skip => continue,
                FrameDecision::Stop => break,
                FrameDecision::Keep => self.push(&detection),
            }
        }

        if skipped > 0 {
            debug!(path = %path.display(), skipped, "Skipped malformed detection lines");
        }
        Ok(())
    }

    pub fn finish(self) -> ObjectFrames {
        self.frames
    }
}

/// Parse all object tracks of `video` inside `activity_dir`.
pub fn parse_object_tracks(activity_dir: &Path, video: &str, range: FrameRange) -> ReaderResult<ObjectFrames> {
    let types = match read_object_types(activity_dir, video) {
        Ok(types) => types,
        Err(ReaderError::MissingFile(path)) => {
            warn!(path = %path.display(), video = %video, "Activity label file not found, object types unknown");
            HashMap::new()
        }
        Err(e) => return Err(e),
    };

    let mut builder = ObjectTrackBuilder::new(types);
    for path in object_files(activity_dir, video)? {
        builder.read_file(&path, range)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const STIP: &str = "0.1,0.2,0.3,0.4,0.5,0.6";

    fn line(frame: u32, id: u32, b: (i32, i32, i32, i32)) -> String {
        format!("{},{},{},{},{},{},{}\n", frame, id, b.0, b.1, b.2, b.3, STIP)
    }

    #[test]
    fn test_parse_detection_line() {
        let det = parse_detection_line(&line(3, 1, (10, 20, 30, 40))).unwrap();
        assert_eq!(det.frame, 3);
        assert_eq!(det.object_id, 1);
        assert_eq!(det.bbox, BoundingBox::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(det.stip[5], 0.6);
    }

    #[test]
    fn test_parse_detection_line_trailing_comma() {
        let text = format!("{},\n", line(3, 1, (1, 2, 3, 4)).trim_end());
        assert!(parse_detection_line(&text).is_some());
    }

    #[test]
    fn test_parse_detection_line_rejects_wrong_field_count() {
        assert!(parse_detection_line("1,1,0,0,0,0,0.1\n").is_none());
        assert!(parse_detection_line("1,1,a,0,0,0,0.1,0.2,0.3,0.4,0.5,0.6").is_none());
    }

    #[test]
    fn test_occlusion_without_prior_box_is_absent() {
        let mut builder = ObjectTrackBuilder::new(HashMap::new());
        builder.push(&parse_detection_line(&line(1, 1, (0, 0, 0, 0))).unwrap());
        let frames = builder.finish();
        assert!(frames.get(&1).map_or(true, |m| m.is_empty()));
    }

    #[test]
    fn test_occlusion_repeats_prior_box() {
        let mut builder = ObjectTrackBuilder::new(HashMap::from([(1, "bowl".to_string())]));
        for l in [
            line(1, 1, (0, 0, 0, 0)),
            line(2, 1, (10, 10, 20, 20)),
            line(3, 1, (0, 0, 0, 0)),
            line(4, 1, (0, 0, 0, 0)),
        ] {
            builder.push(&parse_detection_line(&l).unwrap());
        }
        let frames = builder.finish();
        assert!(frames.get(&1).is_none());
        let expected = BoundingBox::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(frames[&2]["bowl_1"].bbox, expected);
        assert_eq!(frames[&3]["bowl_1"].bbox, expected);
        assert_eq!(frames[&4]["bowl_1"].bbox, expected);
        assert_eq!(frames[&4]["bowl_1"].frame, 4);
    }

    #[test]
    fn test_carry_forward_is_per_object() {
        let mut builder = ObjectTrackBuilder::new(HashMap::new());
        builder.push(&parse_detection_line(&line(1, 1, (1, 1, 2, 2))).unwrap());
        builder.push(&parse_detection_line(&line(2, 2, (0, 0, 0, 0))).unwrap());
        let frames = builder.finish();
        assert!(frames.get(&2).is_none());
        assert_eq!(frames[&1]["unknown_1"].object_type, UNKNOWN_OBJECT_TYPE);
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(ACTIVITY_LABEL_FILE),
            "0510,making_cereal,Subject1,1:bowl,2:milk,\n0511,making_cereal,Subject1,1:box,\n",
        )
        .unwrap();
        let obj1: String = [
            line(1, 1, (0, 0, 0, 0)),
            line(2, 1, (10, 10, 20, 20)),
            line(3, 1, (0, 0, 0, 0)),
            "garbage,line\n".to_string(),
            line(4, 1, (12, 12, 22, 22)),
        ]
        .concat();
        fs::write(dir.path().join("0510_obj1.txt"), obj1).unwrap();
        let obj2: String = [line(1, 2, (5, 5, 6, 6)), "\n".to_string(), line(2, 2, (7, 7, 8, 8))].concat();
        fs::write(dir.path().join("0510_obj2.txt"), obj2).unwrap();
        fs::write(dir.path().join("0511_obj1.txt"), line(1, 1, (1, 1, 1, 1))).unwrap();
        dir
    }

    #[test]
    fn test_whitespace_only_line_ends_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("0600_obj1.txt");
        let text = [line(1, 1, (1, 1, 2, 2)), " \t\r\n".to_string(), line(2, 1, (3, 3, 4, 4))].concat();
        fs::write(&path, text).unwrap();

        let mut builder = ObjectTrackBuilder::new(HashMap::new());
        builder.read_file(&path, FrameRange::all()).unwrap();
        let frames = builder.finish();
        assert_eq!(frames.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_read_object_types() {
        let dir = fixture();
        let types = read_object_types(dir.path(), "0510").unwrap();
        assert_eq!(types.len(), 2);
        assert_eq!(types[&2], "milk");
    }

    #[test]
    fn test_parse_object_tracks() {
        let dir = fixture();
        let frames = parse_object_tracks(dir.path(), "0510", FrameRange::all()).unwrap();

        assert_eq!(frames[&1].keys().collect::<Vec<_>>(), vec!["milk_2"]);
        assert_eq!(frames[&3]["bowl_1"].bbox, BoundingBox::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(frames[&4]["bowl_1"].bbox, BoundingBox::new(12.0, 12.0, 22.0, 22.0));
        // blank line ends obj2 before frame 2
        assert!(!frames[&2].contains_key("milk_2"));
    }

    #[test]
    fn test_parse_object_tracks_frame_range() {
        let dir = fixture();
        let frames = parse_object_tracks(dir.path(), "0510", FrameRange::new(Some(2), Some(3))).unwrap();
        assert_eq!(frames.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_missing_activity_label_defaults_to_unknown() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("7_obj1.txt"), line(1, 3, (1, 2, 3, 4))).unwrap();
        let frames = parse_object_tracks(dir.path(), "7", FrameRange::all()).unwrap();
        assert!(frames[&1].contains_key("unknown_3"));
    }
}
