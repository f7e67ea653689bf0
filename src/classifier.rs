// src/classifier.rs
//! Turns matcher reports into one verdict per trace.
//!
//! Every matcher always runs; precedence only decides which match wins
//! when several fire at once. The verdict's confidence folds in how well
//! the runner-up scored, so an ambiguous trace is visibly less certain
//! than a clean one.

use crate::analysis::matchers::{self, PatternMatcher};
use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::error::{Result, WeftError};
use crate::evidence::Evidence;
use crate::types::{MatchReport, Signal, ThreadingModel, Verdict};

pub struct Classifier {
    matchers: Vec<Box<dyn PatternMatcher>>,
    precedence: Vec<ThreadingModel>,
}

impl Classifier {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            matchers: matchers::default_registry(config),
            precedence: config.classify.precedence.clone(),
        }
    }

    /// Builds a classifier over a custom matcher set.
    #[must_use]
    pub fn with_matchers(
        matchers: Vec<Box<dyn PatternMatcher>>,
        precedence: Vec<ThreadingModel>,
    ) -> Self {
        Self {
            matchers,
            precedence,
        }
    }

    /// Classifies a completed trace.
    ///
    /// The winning verdict carries the winner's signals (plus a `pattern`
    /// signal naming the matcher) and a confidence of
    /// `score * (1 - rival / 2)`, where `rival` is the best score among the
    /// other models. When nothing matches, the verdict is `Unknown` with
    /// confidence `1 - strongest_score`.
    ///
    /// # Errors
    /// Returns [`WeftError::EmptyEvidence`] for a trace with no events.
    /// Absence of evidence is a collection failure, not an unknown model.
    pub fn classify(&self, evidence: &Evidence) -> Result<Verdict> {
        if evidence.is_empty() {
            return Err(WeftError::EmptyEvidence);
        }

        let reports: Vec<(ThreadingModel, &'static str, MatchReport)> = self
            .matchers
            .iter()
            .map(|matcher| (matcher.model(), matcher.name(), matcher.evaluate(evidence)))
            .collect();

        for model in &self.precedence {
            let Some((_, name, winner)) =
                reports.iter().find(|(m, _, r)| m == model && r.matched)
            else {
                continue;
            };
            let rival = reports
                .iter()
                .filter(|(m, _, _)| m != model)
                .map(|(_, _, r)| r.score)
                .fold(0.0, f64::max);
            let confidence = winner.score * (1.0 - 0.5 * rival);
            let mut signals = winner.signals.clone();
            signals.push(Signal::informational("pattern", (*name).to_string()));
            return Ok(Verdict::with_signals(*model, confidence, signals));
        }

        let strongest = reports.iter().map(|(_, _, r)| r.score).fold(0.0, f64::max);
        let signals: Vec<Signal> = reports
            .into_iter()
            .flat_map(|(_, _, report)| report.signals)
            .collect();
        Ok(Verdict::with_signals(
            ThreadingModel::Unknown,
            1.0 - strongest,
            signals,
        ))
    }

    /// Boolean verification against a caller-supplied analyzer.
    ///
    /// Walks the same precedence as [`Classifier::classify`]; the first
    /// capability that answers yes names the model.
    ///
    /// # Errors
    /// Returns [`WeftError::EmptyEvidence`] for a trace with no events.
    pub fn verify_model(
        &self,
        analyzer: &dyn Analyzer,
        evidence: &Evidence,
    ) -> Result<ThreadingModel> {
        if evidence.is_empty() {
            return Err(WeftError::EmptyEvidence);
        }
        for model in &self.precedence {
            let hit = match model {
                ThreadingModel::Transactional => analyzer.is_transactional(evidence),
                ThreadingModel::NodeBased => analyzer.is_node_based(evidence),
                ThreadingModel::Unknown => false,
            };
            if hit {
                return Ok(*model);
            }
        }
        Ok(ThreadingModel::Unknown)
    }
}
