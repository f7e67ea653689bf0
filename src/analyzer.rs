// src/analyzer.rs
//! Yes/no capability checks for each multithreading model.
//!
//! [`Analyzer`] is the narrow seam consumers wire in when they want plain
//! booleans instead of scored verdicts. The stock implementation reduces
//! the pattern matchers' reports; [`FixedAnalyzer`] gives harnesses a
//! predetermined answer.

use crate::analysis::matchers::{NodeBasedMatcher, PatternMatcher, TransactionalMatcher};
use crate::config::Config;
use crate::evidence::Evidence;

pub trait Analyzer {
    /// Whether the trace shows transactional-memory behavior.
    /// Total: empty evidence is simply `false`.
    fn is_transactional(&self, evidence: &Evidence) -> bool;

    /// Whether the trace shows node-based message passing.
    /// Total: empty evidence is simply `false`.
    fn is_node_based(&self, evidence: &Evidence) -> bool;
}

/// The stock analyzer: matcher scores reduced to booleans.
pub struct ModelAnalyzer {
    transactional: TransactionalMatcher,
    node_based: NodeBasedMatcher,
}

impl ModelAnalyzer {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            transactional: TransactionalMatcher::new(&config.transactional),
            node_based: NodeBasedMatcher::new(&config.node_based),
        }
    }
}

impl Default for ModelAnalyzer {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Analyzer for ModelAnalyzer {
    fn is_transactional(&self, evidence: &Evidence) -> bool {
        self.transactional.evaluate(evidence).matched
    }

    fn is_node_based(&self, evidence: &Evidence) -> bool {
        self.node_based.evaluate(evidence).matched
    }
}

/// Gives the same answers regardless of evidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedAnalyzer {
    pub transactional: bool,
    pub node_based: bool,
}

impl Analyzer for FixedAnalyzer {
    fn is_transactional(&self, _evidence: &Evidence) -> bool {
        self.transactional
    }

    fn is_node_based(&self, _evidence: &Evidence) -> bool {
        self.node_based
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{AtomicId, EventKind, ThreadId, TraceEvent};

    fn stm_trace() -> Evidence {
        let mut events = Vec::new();
        let mut at = 0;
        for thread in 0..3_u32 {
            for _ in 0..2 {
                events.push(TraceEvent::new(
                    at,
                    ThreadId(thread),
                    EventKind::AtomicRetry { cell: AtomicId(0) },
                ));
                at += 1;
            }
            events.push(TraceEvent::new(
                at,
                ThreadId(thread),
                EventKind::AtomicCommit { cell: AtomicId(0) },
            ));
            at += 1;
        }
        Evidence::from_events(events)
    }

    #[test]
    fn stock_analyzer_reduces_matcher_reports() {
        let analyzer = ModelAnalyzer::default();
        let trace = stm_trace();
        assert!(analyzer.is_transactional(&trace));
        assert!(!analyzer.is_node_based(&trace));
    }

    #[test]
    fn empty_evidence_is_false_for_both() {
        let analyzer = ModelAnalyzer::default();
        let empty = Evidence::from_events(Vec::new());
        assert!(!analyzer.is_transactional(&empty));
        assert!(!analyzer.is_node_based(&empty));
    }

    #[test]
    fn fixed_analyzer_ignores_the_evidence() {
        let always_txn = FixedAnalyzer {
            transactional: true,
            node_based: false,
        };
        let empty = Evidence::from_events(Vec::new());
        assert!(always_txn.is_transactional(&empty));
        assert!(!always_txn.is_node_based(&empty));
    }
}
