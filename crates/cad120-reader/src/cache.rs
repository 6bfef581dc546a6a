//! Cache artifact helpers.
//!
//! Artifacts are stored as gzip-compressed JSON. Each payload is wrapped in a
//! `CacheEnvelope` carrying a format version, so artifacts written by an
//! incompatible build are rejected instead of misread.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ReaderError, ReaderResult};

/// Current cache format version.
///
/// Increment this when the serialized shape of any artifact changes.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// Kind tags stored in the envelope.
pub const KIND_SEQUENCES: &str = "sub_sequences";
pub const KIND_SEGMENTATIONS: &str = "sub_time_segmentation";
pub const KIND_TRACES: &str = "ground_truth_tracks";

/// Paths of the cache artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheArtifacts {
    pub sequences: PathBuf,
    pub segmentations: PathBuf,
    /// Only present when tracks are part of the run
    pub traces: Option<PathBuf>,
}

impl CacheArtifacts {
    /// Every artifact a load needs.
    pub fn required(&self) -> Vec<&Path> {
        let mut paths = vec![self.sequences.as_path(), self.segmentations.as_path()];
        if let Some(traces) = &self.traces {
            paths.push(traces.as_path());
        }
        paths
    }

    /// Artifacts that do not exist on disk.
    pub fn missing(&self) -> Vec<&Path> {
        self.required().into_iter().filter(|p| !p.is_file()).collect()
    }
}

/// Whether a run loads from cache or builds from raw files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStrategy {
    Hit,
    Miss,
}

impl CacheStrategy {
    /// Pick a strategy once, up front.
    pub fn select(artifacts: &CacheArtifacts, prefer_cache: bool) -> Self {
        if !prefer_cache {
            return CacheStrategy::Miss;
        }
        let missing = artifacts.missing();
        if missing.is_empty() {
            CacheStrategy::Hit
        } else {
            debug!(missing = missing.len(), "Cache incomplete, building from raw files");
            CacheStrategy::Miss
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStrategy::Hit => "load",
            CacheStrategy::Miss => "build",
        }
    }
}

/// On-disk wrapper around an artifact payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEnvelope<T> {
    pub version: u32,
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub payload: T,
}

/// Write `payload` as a gzip JSON artifact, creating parent directories.
///
/// The artifact is written next to its final path and renamed into place.
pub fn save_artifact<T: Serialize>(path: &Path, kind: &str, payload: &T) -> ReaderResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let envelope = CacheEnvelope {
        version: CACHE_FORMAT_VERSION,
        kind: kind.to_string(),
        created_at: Utc::now(),
        payload,
    };

    let partial = partial_path(path);
    let file = File::create(&partial)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, &envelope)?;
    let mut writer = encoder.finish()?;
    writer.flush()?;
    drop(writer);
    fs::rename(&partial, path)?;

    info!(path = %path.display(), kind = kind, "Saved cache artifact");
    Ok(())
}

/// Read a gzip JSON artifact written by [`save_artifact`].
///
/// A missing file is a `CacheMiss`. Undecodable data, a different format
/// version or an unexpected kind is `CacheCorrupt`.
pub fn load_artifact<T: DeserializeOwned>(path: &Path, kind: &str) -> ReaderResult<T> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ReaderError::CacheMiss(path.to_path_buf()));
        }
        Err(e) => return Err(ReaderError::read(path, e)),
    };

    let decoder = GzDecoder::new(BufReader::new(file));
    let envelope: CacheEnvelope<T> = serde_json::from_reader(decoder)
        .map_err(|e| ReaderError::cache_corrupt(path, format!("decode failed: {}", e)))?;

    if envelope.version != CACHE_FORMAT_VERSION {
        return Err(ReaderError::cache_corrupt(
            path,
            format!(
                "format version {} does not match {}",
                envelope.version, CACHE_FORMAT_VERSION
            ),
        ));
    }
    if envelope.kind != kind {
        return Err(ReaderError::cache_corrupt(
            path,
            format!("expected '{}' artifact, found '{}'", kind, envelope.kind),
        ));
    }

    debug!(
        path = %path.display(),
        kind = kind,
        created_at = %envelope.created_at,
        "Loaded cache artifact"
    );
    Ok(envelope.payload)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
