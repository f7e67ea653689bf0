// src/analysis/matchers/transactional.rs
//! Detects transactional-memory style concurrency.
//!
//! The signature is a retry loop: a thread optimistically updates a shared
//! cell, observes a conflict, and restarts. In a trace that shows up as
//! `atomic_retry` events against the same cells from several threads, with
//! commits sprinkled in between.

use super::{weighted_mean, PatternMatcher};
use crate::config::TransactionalConfig;
use crate::event::{AtomicId, EventKind, ThreadId};
use crate::evidence::Evidence;
use crate::types::{MatchReport, Signal, ThreadingModel};
use std::collections::{BTreeMap, BTreeSet};

pub struct TransactionalMatcher {
    rules: TransactionalConfig,
}

impl TransactionalMatcher {
    #[must_use]
    pub fn new(rules: &TransactionalConfig) -> Self {
        Self {
            rules: rules.clone(),
        }
    }
}

impl PatternMatcher for TransactionalMatcher {
    fn name(&self) -> &'static str {
        "transactional-retry"
    }

    fn model(&self) -> ThreadingModel {
        ThreadingModel::Transactional
    }

    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&self, evidence: &Evidence) -> MatchReport {
        let counts = evidence.counts();
        let atomic_ops = counts.atomic_ops();
        // A floor below 1 would let ratios divide by zero, so 1 is the
        // effective minimum.
        let floor = self.rules.min_atomic_ops.max(1);
        if atomic_ops < floor {
            return MatchReport::unmatched(vec![Signal::informational(
                "insufficient_evidence",
                format!("{atomic_ops} retry/commit events, need at least {floor}"),
            )]);
        }

        let total = counts.total();
        let atomic_share = atomic_ops as f64 / total as f64;
        let retry_pressure = counts.atomic_retries as f64 / atomic_ops as f64;
        let cells = CellStats::build(evidence);

        let signals = vec![
            Signal::new(
                "atomic_share",
                format!("{atomic_ops} of {total} events are retry/commit operations"),
                atomic_share,
            ),
            Signal::new(
                "retry_pressure",
                format!(
                    "{} retries against {} commits",
                    counts.atomic_retries, counts.atomic_commits
                ),
                retry_pressure,
            ),
            Signal::new(
                "cell_contention",
                format!(
                    "{} of {} retried cells are touched by more than one thread",
                    cells.contended_cells, cells.retried_cells
                ),
                cells.contention,
            ),
        ];

        let score = weighted_mean(&[
            (self.rules.weight_atomic_share, atomic_share),
            (self.rules.weight_retry_pressure, retry_pressure),
            (self.rules.weight_contention, cells.contention),
        ]);
        MatchReport::scored(score, self.rules.threshold, signals)
    }
}

/// How widely the retried cells are shared between threads.
struct CellStats {
    /// Mean over retried cells of the fraction of other threads touching
    /// the cell. 0.0 for single-threaded traces.
    contention: f64,
    retried_cells: usize,
    contended_cells: usize,
}

impl CellStats {
    #[allow(clippy::cast_precision_loss)]
    fn build(evidence: &Evidence) -> Self {
        let mut touched: BTreeMap<AtomicId, BTreeSet<ThreadId>> = BTreeMap::new();
        let mut retried: BTreeSet<AtomicId> = BTreeSet::new();
        for event in evidence.events() {
            match event.kind {
                EventKind::AtomicRetry { cell } => {
                    touched.entry(cell).or_default().insert(event.thread);
                    retried.insert(cell);
                }
                EventKind::AtomicCommit { cell } => {
                    touched.entry(cell).or_default().insert(event.thread);
                }
                _ => {}
            }
        }

        let total_threads = evidence.thread_count();
        let retried_cells = retried.len();
        let contended_cells = retried
            .iter()
            .copied()
            .filter(|cell| touched.get(cell).map_or(0, BTreeSet::len) > 1)
            .count();

        if total_threads < 2 || retried_cells == 0 {
            return Self {
                contention: 0.0,
                retried_cells,
                contended_cells,
            };
        }

        let spread: f64 = retried
            .iter()
            .map(|cell| {
                let threads = touched.get(cell).map_or(0, BTreeSet::len);
                threads.saturating_sub(1) as f64 / (total_threads - 1) as f64
            })
            .sum();
        Self {
            contention: spread / retried_cells as f64,
            retried_cells,
            contended_cells,
        }
    }
}
