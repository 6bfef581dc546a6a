//! Line-level primitives shared by the annotation parsers.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::error::{ReaderError, ReaderResult};

/// Open a text file for line-by-line reading.
pub fn read_lines(path: &Path) -> ReaderResult<Lines<BufReader<File>>> {
    let file = File::open(path).map_err(|e| ReaderError::read(path, e))?;
    Ok(BufReader::new(file).lines())
}

/// Split a label-file line: all spaces removed, then split on `,`.
pub fn split_compact(line: &str) -> Vec<String> {
    let compact: String = line.trim_end_matches(['\r', '\n']).replace(' ', "");
    compact.split(',').map(str::to_string).collect()
}

/// Strip trailing commas and line endings, then split on `,`.
pub fn split_record(line: &str) -> Vec<&str> {
    line.trim_end_matches([',', '\r', '\n'])
        .trim_start_matches(',')
        .split(',')
        .collect()
}

/// Parse an integer field, tolerating surrounding whitespace.
pub fn parse_int(field: &str) -> Option<i64> {
    field.trim().parse().ok()
}

/// Parse a frame number field.
pub fn parse_frame(field: &str) -> Option<u32> {
    let value = field.trim();
    value
        .parse::<u32>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u32))
}

/// Parse a float field, tolerating surrounding whitespace.
pub fn parse_float(field: &str) -> Option<f64> {
    field.trim().parse().ok()
}

/// What to do with a frame under a [`FrameRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    /// Frame precedes the range.
    Skip,
    /// Frame is inside the range.
    Keep,
    /// Frame is past the range; frames are non-decreasing so reading stops.
    Stop,
}

/// Optional inclusive frame window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameRange {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl FrameRange {
    /// No restriction.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(start: Option<u32>, end: Option<u32>) -> Self {
        Self { start, end }
    }

    pub fn decide(&self, frame: u32) -> FrameDecision {
        if matches!(self.start, Some(start) if frame < start) {
            FrameDecision::Skip
        } else if matches!(self.end, Some(end) if frame > end) {
            FrameDecision::Stop
        } else {
            FrameDecision::Keep
        }
    }
}
