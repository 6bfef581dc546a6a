//! Dataset reader.
//!
//! `Cad120Reader` owns the three products of a run (time segmentations,
//! per-frame sub-activity sequences and world traces) and moves them between
//! raw files and the cache.

use std::collections::BTreeMap;

use tracing::info;

use cad120_models::{Joint, SubActivitySequence, VideoSegmentation};
use cad120_trace::{TraceCollection, WorldTrace};

use crate::assembler::{build_traces, skeleton_trajectories};
use crate::cache::{
    load_artifact, save_artifact, CacheArtifacts, CacheStrategy, KIND_SEGMENTATIONS, KIND_SEQUENCES,
    KIND_TRACES,
};
use crate::config::ReaderConfig;
use crate::error::ReaderResult;
use crate::logging::RunLogger;
use crate::segmentation::build_segmentations;
use crate::sequence::{expand_all, sequences_by_key};

/// Per-joint `(x, y)` trajectories of one video.
pub type Trajectories = BTreeMap<Joint, Vec<(f64, f64)>>;

/// Loaded or built CAD120 data.
#[derive(Debug, Clone)]
pub struct Cad120Reader {
    config: ReaderConfig,
    segmentations: Vec<VideoSegmentation>,
    sequences: Vec<SubActivitySequence>,
    traces: Option<TraceCollection>,
}

impl Cad120Reader {
    /// Build everything from the raw dataset files.
    ///
    /// # Arguments
    /// * `config` - Dataset roots, vocabulary, joint filter and run options
    ///
    /// # Errors
    /// Fails on invalid configuration, malformed label or skeleton lines and
    /// non-contiguous segments. Missing annotation files are only logged.
    pub fn build(config: ReaderConfig) -> ReaderResult<Self> {
        config.validate()?;
        let logger = RunLogger::new(CacheStrategy::Miss.as_str());
        let span = logger.create_span();
        let _enter = span.enter();
        logger.log_start("building from raw files");

        let segmentations = logged(&logger, build_segmentations(&config))?;
        let sequences = logged(&logger, expand_all(&segmentations))?;
        logger.log_progress(&format!(
            "expanded {} sub-activity sequences",
            sequences.len()
        ));

        let traces = if config.read_tracks {
            Some(logged(&logger, build_traces(&config))?)
        } else {
            logger.log_progress("track reading disabled, skipping objects and skeletons");
            None
        };

        let reader = Self {
            config,
            segmentations,
            sequences,
            traces,
        };
        logger.log_completion(&reader.summary());
        Ok(reader)
    }

    /// Load everything from the cache artifacts named by `config`.
    ///
    /// With an episode set, only that video's entries are kept.
    pub fn load(config: ReaderConfig) -> ReaderResult<Self> {
        let artifacts = config.cache_artifacts();
        Self::load_from(config, &artifacts)
    }

    /// Load from explicit artifact paths.
    ///
    /// # Arguments
    /// * `config` - Run options; only the episode filter and joint filter
    ///   affect a load
    /// * `artifacts` - Paths of the artifacts to read; traces are read only
    ///   when `artifacts.traces` is set
    pub fn load_from(config: ReaderConfig, artifacts: &CacheArtifacts) -> ReaderResult<Self> {
        config.validate()?;
        let logger = RunLogger::new(CacheStrategy::Hit.as_str());
        let span = logger.create_span();
        let _enter = span.enter();
        logger.log_start("loading cached artifacts");

        let mut segmentations: Vec<VideoSegmentation> =
            logged(&logger, load_artifact(&artifacts.segmentations, KIND_SEGMENTATIONS))?;
        let mut sequences: Vec<SubActivitySequence> =
            logged(&logger, load_artifact(&artifacts.sequences, KIND_SEQUENCES))?;
        let mut traces = match &artifacts.traces {
            Some(path) => Some(logged(&logger, load_artifact::<TraceCollection>(path, KIND_TRACES))?),
            None => None,
        };

        if let Some(episode) = &config.episode {
            let key = episode.flatten();
            segmentations.retain(|s| s.key == *episode);
            sequences.retain(|s| s.key == *episode);
            traces = traces.map(|t| t.into_iter().filter(|(k, _)| *k == key).collect());
            info!(episode = %key, "Restricted cached data to episode");
        }

        let reader = Self {
            config,
            segmentations,
            sequences,
            traces,
        };
        logger.log_completion(&reader.summary());
        Ok(reader)
    }

    /// Load on a cache hit, build on a miss.
    pub fn open(config: ReaderConfig, strategy: CacheStrategy) -> ReaderResult<Self> {
        match strategy {
            CacheStrategy::Hit => Self::load(config),
            CacheStrategy::Miss => Self::build(config),
        }
    }

    /// Save all artifacts to the paths named by the config.
    pub fn save(&self) -> ReaderResult<()> {
        self.save_to(&self.config.cache_artifacts())
    }

    /// Save to explicit artifact paths. Traces are skipped when none were
    /// read.
    pub fn save_to(&self, artifacts: &CacheArtifacts) -> ReaderResult<()> {
        let logger = RunLogger::new("save");
        let span = logger.create_span();
        let _enter = span.enter();
        logger.log_start("saving cache artifacts");

        logged(
            &logger,
            save_artifact(&artifacts.segmentations, KIND_SEGMENTATIONS, &self.segmentations),
        )?;
        logged(&logger, save_artifact(&artifacts.sequences, KIND_SEQUENCES, &self.sequences))?;

        match (&self.traces, &artifacts.traces) {
            (Some(traces), Some(path)) => logged(&logger, save_artifact(path, KIND_TRACES, traces))?,
            (None, _) => logger.log_warning("tracks were not read, skipping traces artifact"),
            (Some(_), None) => logger.log_warning("no traces artifact path configured, skipping traces"),
        }

        logger.log_completion(&self.summary());
        Ok(())
    }

    /// Get the configuration this reader was built or loaded with.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Time segmentations, one per video, in label-file order.
    pub fn segmentations(&self) -> &[VideoSegmentation] {
        &self.segmentations
    }

    /// Per-frame sub-activity sequences, parallel to [`Self::segmentations`].
    pub fn sequences(&self) -> &[SubActivitySequence] {
        &self.sequences
    }

    /// `None` when tracks were not read.
    pub fn traces(&self) -> Option<&TraceCollection> {
        self.traces.as_ref()
    }

    /// World trace of one video, by flattened key.
    pub fn trace(&self, key: &str) -> Option<&WorldTrace> {
        self.traces.as_ref().and_then(|t| t.get(key))
    }

    /// Frame labels keyed by flattened video key.
    pub fn sub_sequences_by_key(&self) -> BTreeMap<String, Vec<String>> {
        sequences_by_key(&self.sequences)
    }

    /// Joint trajectories of one video, using the configured joint filter.
    pub fn skeleton_trajectories(&self, key: &str) -> Option<Trajectories> {
        self.trace(key)
            .map(|trace| skeleton_trajectories(trace, &self.config.skeleton_filter))
    }

    /// Joint trajectories of every video.
    pub fn all_skeleton_trajectories(&self) -> BTreeMap<String, Trajectories> {
        self.traces
            .iter()
            .flat_map(|t| t.iter())
            .map(|(key, trace)| {
                (
                    key.clone(),
                    skeleton_trajectories(trace, &self.config.skeleton_filter),
                )
            })
            .collect()
    }

    /// One-line count summary.
    pub fn summary(&self) -> String {
        format!(
            "{} segmentations, {} sequences, {}",
            self.segmentations.len(),
            self.sequences.len(),
            match &self.traces {
                Some(t) => format!("{} traces", t.len()),
                None => "no traces".to_string(),
            }
        )
    }
}

/// Log a failed stage through the run logger before propagating it.
fn logged<T>(logger: &RunLogger, result: ReaderResult<T>) -> ReaderResult<T> {
    result.inspect_err(|e| logger.log_error(&e.to_string()))
}
