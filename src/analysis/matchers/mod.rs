// src/analysis/matchers/mod.rs
//! Pattern matchers for known concurrency idioms.
//!
//! Each matcher inspects a trace for the fingerprint of one multithreading
//! model and reports how strongly the trace resembles it. Matchers are
//! independent; ordering and tie-breaking live in the classifier.

pub mod node_based;
pub mod transactional;

pub use node_based::NodeBasedMatcher;
pub use transactional::TransactionalMatcher;

use crate::config::Config;
use crate::evidence::Evidence;
use crate::types::{MatchReport, ThreadingModel};

/// A detector for one multithreading model.
///
/// Implementations must be pure and total: the same evidence always yields
/// the same report, and empty evidence yields an unmatched one.
pub trait PatternMatcher: Send + Sync {
    /// Stable name surfaced as the winning verdict's `pattern` signal.
    fn name(&self) -> &'static str;
    /// The model a positive match certifies.
    fn model(&self) -> ThreadingModel;
    fn evaluate(&self, evidence: &Evidence) -> MatchReport;
}

/// Builds the stock matcher set, one per known model.
#[must_use]
pub fn default_registry(config: &Config) -> Vec<Box<dyn PatternMatcher>> {
    vec![
        Box::new(TransactionalMatcher::new(&config.transactional)),
        Box::new(NodeBasedMatcher::new(&config.node_based)),
    ]
}

/// Weighted mean over `(weight, value)` pairs. Zero total weight is 0.0,
/// not NaN; validation upstream keeps real configs away from that.
pub(crate) fn weighted_mean(parts: &[(f64, f64)]) -> f64 {
    let total: f64 = parts.iter().map(|(weight, _)| weight).sum();
    if total <= 0.0 {
        return 0.0;
    }
    parts.iter().map(|(weight, value)| weight * value).sum::<f64>() / total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_both_known_models() {
        let registry = default_registry(&Config::default());
        let models: Vec<ThreadingModel> = registry.iter().map(|m| m.model()).collect();
        assert_eq!(
            models,
            vec![ThreadingModel::Transactional, ThreadingModel::NodeBased]
        );
    }

    #[test]
    fn weighted_mean_handles_degenerate_weights() {
        assert!((weighted_mean(&[]) - 0.0).abs() < f64::EPSILON);
        assert!((weighted_mean(&[(0.0, 1.0)]) - 0.0).abs() < f64::EPSILON);
        assert!((weighted_mean(&[(2.0, 0.5), (1.0, 0.2)]) - 0.4).abs() < 1e-9);
    }
}
