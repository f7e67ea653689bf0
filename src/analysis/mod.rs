// src/analysis/mod.rs
//! Core classification logic (the engine).

pub mod matchers;
pub mod msg_graph;

use crate::classifier::Classifier;
use crate::config::Config;
use crate::discovery;
use crate::runlog::{RunEventKind, RunLogger};
use crate::tracefile;
use crate::types::{BatchReport, TraceReport};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use std::path::{Path, PathBuf};

/// The main classification engine.
/// Orchestrates trace discovery, parsing, matching, and run logging.
pub struct ClassifierEngine {
    config: Config,
    classifier: Classifier,
}

impl ClassifierEngine {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let classifier = Classifier::new(&config);
        Self { config, classifier }
    }

    #[must_use]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Classifies one trace file. Failures land in the report's `error`
    /// field instead of aborting the batch.
    #[must_use]
    pub fn classify_file(&self, path: &Path) -> TraceReport {
        let evidence = match tracefile::read_trace(path) {
            Ok(evidence) => evidence,
            Err(e) => {
                return TraceReport {
                    path: path.to_path_buf(),
                    event_count: 0,
                    fingerprint: None,
                    verdict: None,
                    error: Some(e.to_string()),
                }
            }
        };

        let mut report = TraceReport {
            path: path.to_path_buf(),
            event_count: evidence.len(),
            fingerprint: Some(evidence.fingerprint()),
            verdict: None,
            error: None,
        };
        match self.classifier.classify(&evidence) {
            Ok(verdict) => report.verdict = Some(verdict),
            Err(e) => report.error = Some(e.to_string()),
        }
        report
    }

    /// Classifies a batch of trace files in parallel.
    #[must_use]
    pub fn classify_batch(&self, files: &[PathBuf]) -> BatchReport {
        let start = std::time::Instant::now();

        let reports: Vec<TraceReport> = files
            .par_iter()
            .map(|path| self.classify_file(path))
            .collect();

        let classified = reports.iter().filter(|r| r.is_classified()).count();
        let failed = reports.len() - classified;

        BatchReport {
            reports,
            classified,
            failed,
            duration_ms: start.elapsed().as_millis(),
        }
    }

    /// Discovers traces under `root`, classifies them, and appends the
    /// outcome to the run log.
    ///
    /// # Errors
    /// Returns an error when `root` does not exist.
    pub fn run_root(&self, root: &Path) -> anyhow::Result<BatchReport> {
        let files = discovery::discover(root, &self.config)?;
        let logger = RunLogger::new(root);
        logger.log(RunEventKind::BatchStarted {
            traces: files.len(),
        });

        let report = self.classify_batch(&files);

        for trace in &report.reports {
            match (&trace.verdict, &trace.error) {
                (Some(verdict), _) => logger.log(RunEventKind::TraceClassified {
                    path: trace.path.display().to_string(),
                    model: verdict.model,
                    confidence: verdict.confidence,
                }),
                (None, Some(error)) => logger.log(RunEventKind::TraceFailed {
                    path: trace.path.display().to_string(),
                    error: error.clone(),
                }),
                (None, None) => {}
            }
        }
        logger.log(RunEventKind::BatchFinished {
            classified: report.classified,
            failed: report.failed,
            duration_ms: report.duration_ms,
        });

        Ok(report)
    }
}
