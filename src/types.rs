// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The multithreading model a trace is classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadingModel {
    /// Optimistic retry/commit updates over shared memory (STM-style).
    Transactional,
    /// Isolated workers that communicate by passing messages.
    NodeBased,
    /// No known pattern matched with enough evidence.
    Unknown,
}

impl ThreadingModel {
    /// Canonical human-readable label for this model.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Transactional => "Transactional Multithreading",
            Self::NodeBased => "Node-based Multithreading",
            Self::Unknown => "Unknown Multithreading Model",
        }
    }
}

impl fmt::Display for ThreadingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One piece of evidence that contributed to a match decision.
///
/// `weight` is the raw value of the underlying metric in `[0, 1]`; a
/// matcher's score is a weighted mean over these.
#[derive(Debug, Clone, Serialize)]
pub struct Signal {
    pub label: &'static str,
    pub detail: String,
    pub weight: f64,
}

impl Signal {
    #[must_use]
    pub fn new(label: &'static str, detail: String, weight: f64) -> Self {
        Self {
            label,
            detail,
            weight,
        }
    }

    /// A signal that is reported but carries no weight in the score.
    #[must_use]
    pub fn informational(label: &'static str, detail: String) -> Self {
        Self::new(label, detail, 0.0)
    }
}

/// Outcome of evaluating one pattern matcher against a trace.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    /// Whether the score cleared the matcher's threshold.
    pub matched: bool,
    /// Pattern strength in `[0, 1]`.
    pub score: f64,
    pub signals: Vec<Signal>,
}

impl MatchReport {
    /// A report for a trace that did not clear the evidence floor.
    #[must_use]
    pub fn unmatched(signals: Vec<Signal>) -> Self {
        Self {
            matched: false,
            score: 0.0,
            signals,
        }
    }

    #[must_use]
    pub fn scored(score: f64, threshold: f64, signals: Vec<Signal>) -> Self {
        Self {
            matched: score >= threshold,
            score,
            signals,
        }
    }
}

/// The classifier's answer for one trace.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub model: ThreadingModel,
    /// Certainty in `[0, 1]`. Always in range, whatever the inputs were.
    pub confidence: f64,
    pub signals: Vec<Signal>,
}

impl Verdict {
    #[must_use]
    pub fn new(model: ThreadingModel, confidence: f64) -> Self {
        Self::with_signals(model, confidence, Vec::new())
    }

    #[must_use]
    pub fn with_signals(model: ThreadingModel, confidence: f64, signals: Vec<Signal>) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            model,
            confidence,
            signals,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0}%)", self.model, self.confidence * 100.0)
    }
}

/// Classification result for a single trace file.
#[derive(Debug, Clone, Serialize)]
pub struct TraceReport {
    pub path: PathBuf,
    pub event_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    /// Set when the trace could not be read, parsed, or classified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TraceReport {
    #[must_use]
    pub fn is_classified(&self) -> bool {
        self.verdict.is_some()
    }

    #[must_use]
    pub fn model(&self) -> Option<ThreadingModel> {
        self.verdict.as_ref().map(|v| v.model)
    }
}

/// Aggregated results for a batch of traces.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub reports: Vec<TraceReport>,
    pub classified: usize,
    pub failed: usize,
    pub duration_ms: u128,
}

impl BatchReport {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Count of traces classified as the given model.
    #[must_use]
    pub fn count_for(&self, model: ThreadingModel) -> usize {
        self.reports
            .iter()
            .filter(|r| r.model() == Some(model))
            .count()
    }
}
