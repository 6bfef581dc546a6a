//! Structured run logging.
//!
//! Attaches the run id and mode (`build` or `load`) to every lifecycle event
//! of a reader run.

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{error, info, warn, Span};

/// Logger for one reader run.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
    mode: String,
    started: Instant,
}

impl RunLogger {
    /// Create a logger with a timestamp-based run id.
    ///
    /// # Arguments
    /// * `mode` - What the run does (e.g., "build", "load", "save")
    pub fn new(mode: &str) -> Self {
        Self::with_id(&Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string(), mode)
    }

    /// Create a logger with an explicit run id.
    pub fn with_id(run_id: &str, mode: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            mode: mode.to_string(),
            started: Instant::now(),
        }
    }

    /// Log the start of a run.
    pub fn log_start(&self, message: &str) {
        info!(run_id = %self.run_id, mode = %self.mode, "Run started: {}", message);
    }

    pub fn log_progress(&self, message: &str) {
        info!(run_id = %self.run_id, mode = %self.mode, "Run progress: {}", message);
    }

    /// Log a recoverable problem during a run.
    pub fn log_warning(&self, message: &str) {
        warn!(run_id = %self.run_id, mode = %self.mode, "Run warning: {}", message);
    }

    /// Log the error that aborts a run.
    pub fn log_error(&self, message: &str) {
        error!(run_id = %self.run_id, mode = %self.mode, "Run error: {}", message);
    }

    /// Log completion with the elapsed time since the logger was created.
    pub fn log_completion(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            mode = %self.mode,
            elapsed_ms = self.elapsed().as_millis() as u64,
            "Run completed: {}", message
        );
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Create a tracing span for this run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("run", run_id = %self.run_id, mode = %self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_logger_with_id() {
        let logger = RunLogger::with_id("run-1", "load");
        assert_eq!(logger.run_id(), "run-1");
        assert_eq!(logger.mode(), "load");
    }

    #[test]
    fn test_run_logger_generates_id() {
        let logger = RunLogger::new("build");
        assert!(logger.run_id().ends_with('Z'));
        assert_eq!(logger.mode(), "build");
        logger.log_completion("nothing to do");
    }
}
