//! Reader configuration.
//!
//! `ReaderConfig` is an immutable value handed to every stage. It can be built
//! programmatically or loaded from environment variables (after
//! `dotenvy::dotenv()` in the binary).

use std::path::{Path, PathBuf};

use cad120_models::vocabulary::{default_activities, default_subjects};
use cad120_models::{JointFilter, VideoKey};

use crate::cache::CacheArtifacts;
use crate::error::{ReaderError, ReaderResult};

pub const DEFAULT_SEQUENCES_FILE: &str = "sub_sequences.json.gz";
pub const DEFAULT_SEGMENTATION_FILE: &str = "sub_time_segmentation.json.gz";
pub const DEFAULT_TRACES_FILE: &str = "ground_truth_tracks.json.gz";

/// Label file inside each activity directory of the labeling tree.
pub const LABELING_FILE: &str = "labeling.txt";

/// Object-type summary file inside each activity directory of the tracks tree.
pub const ACTIVITY_LABEL_FILE: &str = "activityLabel.txt";

/// Dataset reader configuration.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Root of the corrected labeling release
    pub labeling_root: PathBuf,
    /// Root of the raw object/skeleton tracks
    pub tracks_root: PathBuf,
    /// Directory holding the cache artifacts
    pub cache_dir: PathBuf,
    pub sequences_file: String,
    pub segmentation_file: String,
    pub traces_file: String,
    /// Joints passed through to traces
    pub skeleton_filter: JointFilter,
    pub subjects: Vec<String>,
    pub activities: Vec<String>,
    /// Restrict every stage to this single video
    pub episode: Option<VideoKey>,
    /// Whether object and skeleton tracks are read at all
    pub read_tracks: bool,
    /// Parse videos on a rayon worker pool
    pub parallel: bool,
}

impl ReaderConfig {
    /// Create a config with default file names, vocabulary and filter.
    pub fn new(
        labeling_root: impl Into<PathBuf>,
        tracks_root: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            labeling_root: labeling_root.into(),
            tracks_root: tracks_root.into(),
            cache_dir: cache_dir.into(),
            sequences_file: DEFAULT_SEQUENCES_FILE.to_string(),
            segmentation_file: DEFAULT_SEGMENTATION_FILE.to_string(),
            traces_file: DEFAULT_TRACES_FILE.to_string(),
            skeleton_filter: JointFilter::default(),
            subjects: default_subjects(),
            activities: default_activities(),
            episode: None,
            read_tracks: true,
            parallel: false,
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> ReaderResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ReaderResult<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ReaderError::config_error(format!("{} is not set", name)))
        };

        let cloud = lookup("CLOUD").filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        let with_cloud = |p: String| match &cloud {
            Some(root) => root.join(p.trim_start_matches('/')),
            None => PathBuf::from(p),
        };

        let mut config = Self::new(
            with_cloud(required("CAD120_LABELING_PATH")?),
            PathBuf::from(required("CAD120_TRACKS_PATH")?),
            with_cloud(required("CAD120_CACHE_DIR")?),
        );

        if let Some(name) = lookup("CAD120_SEQUENCES_FILE") {
            config.sequences_file = name;
        }
        if let Some(name) = lookup("CAD120_SEGMENTATION_FILE") {
            config.segmentation_file = name;
        }
        if let Some(name) = lookup("CAD120_TRACES_FILE") {
            config.traces_file = name;
        }
        if let Some(filter) = lookup("CAD120_SKELETON_FILTER") {
            config.skeleton_filter = filter.parse().map_err(|e| {
                ReaderError::config_error(format!("CAD120_SKELETON_FILTER: {}", e))
            })?;
        }
        if let Some(flag) = lookup("CAD120_READ_TRACKS") {
            config.read_tracks = parse_bool("CAD120_READ_TRACKS", &flag)?;
        }
        if let Some(flag) = lookup("CAD120_PARALLEL") {
            config.parallel = parse_bool("CAD120_PARALLEL", &flag)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_episode(mut self, episode: VideoKey) -> Self {
        self.episode = Some(episode);
        self
    }

    pub fn with_read_tracks(mut self, read_tracks: bool) -> Self {
        self.read_tracks = read_tracks;
        self
    }

    pub fn with_skeleton_filter(mut self, filter: JointFilter) -> Self {
        self.skeleton_filter = filter;
        self
    }

    pub fn with_subjects(mut self, subjects: Vec<String>) -> Self {
        self.subjects = subjects;
        self
    }

    pub fn with_activities(mut self, activities: Vec<String>) -> Self {
        self.activities = activities;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check that required paths and names are present.
    pub fn validate(&self) -> ReaderResult<()> {
        if self.labeling_root.as_os_str().is_empty() {
            return Err(ReaderError::config_error("labeling root is empty"));
        }
        if self.read_tracks && self.tracks_root.as_os_str().is_empty() {
            return Err(ReaderError::config_error("tracks root is empty"));
        }
        if self.cache_dir.as_os_str().is_empty() {
            return Err(ReaderError::config_error("cache directory is empty"));
        }
        for (what, name) in [
            ("sequences file", &self.sequences_file),
            ("segmentation file", &self.segmentation_file),
            ("traces file", &self.traces_file),
        ] {
            if name.trim().is_empty() {
                return Err(ReaderError::config_error(format!("{} name is empty", what)));
            }
        }
        Ok(())
    }

    /// Subjects to read; only the episode's subject when one is set.
    pub fn active_subjects(&self) -> Vec<String> {
        match &self.episode {
            Some(key) => vec![key.subject.clone()],
            None => self.subjects.clone(),
        }
    }

    /// Activities to read; only the episode's activity when one is set.
    pub fn active_activities(&self) -> Vec<String> {
        match &self.episode {
            Some(key) => vec![key.activity.clone()],
            None => self.activities.clone(),
        }
    }

    /// Single video filter, if any.
    pub fn active_video(&self) -> Option<&str> {
        self.episode.as_ref().map(|k| k.video.as_str())
    }

    /// `<labeling_root>/annotations/<subject>_annotations/<activity>/labeling.txt`
    pub fn labeling_file(&self, subject: &str, activity: &str) -> PathBuf {
        annotation_dir(&self.labeling_root, subject, activity).join(LABELING_FILE)
    }

    /// `<tracks_root>/annotations/<subject>_annotations/<activity>`
    pub fn tracks_activity_dir(&self, subject: &str, activity: &str) -> PathBuf {
        annotation_dir(&self.tracks_root, subject, activity)
    }

    /// Paths of the cache artifacts. The traces artifact is only listed
    /// when tracks are read.
    pub fn cache_artifacts(&self) -> CacheArtifacts {
        CacheArtifacts {
            sequences: self.cache_dir.join(&self.sequences_file),
            segmentations: self.cache_dir.join(&self.segmentation_file),
            traces: self
                .read_tracks
                .then(|| self.cache_dir.join(&self.traces_file)),
        }
    }
}

fn annotation_dir(root: &Path, subject: &str, activity: &str) -> PathBuf {
    root.join("annotations")
        .join(format!("{}_annotations", subject))
        .join(activity)
}

fn parse_bool(name: &str, value: &str) -> ReaderResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ReaderError::config_error(format!(
            "{}: expected a boolean, got '{}'",
            name, other
        ))),
    }
}
