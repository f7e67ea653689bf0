// src/evidence.rs
//! An immutable, time-ordered view over collected trace events.
//!
//! [`Evidence`] is what every downstream consumer (matchers, classifier,
//! analyzers) sees. Construction sorts events by timestamp once, so the
//! rest of the pipeline can rely on chronological order without re-sorting.

use crate::event::{EventKind, ThreadId, TraceEvent};
use crate::utils;
use serde::Serialize;
use std::collections::BTreeSet;

/// Tallies of trace events by operation family.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub lock_acquires: usize,
    pub lock_releases: usize,
    pub atomic_retries: usize,
    pub atomic_commits: usize,
    pub message_sends: usize,
    pub message_receives: usize,
    pub task_spawns: usize,
}

impl EventCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.lock_acquires
            + self.lock_releases
            + self.atomic_retries
            + self.atomic_commits
            + self.message_sends
            + self.message_receives
            + self.task_spawns
    }

    /// Retries plus commits on optimistic cells.
    #[must_use]
    pub fn atomic_ops(&self) -> usize {
        self.atomic_retries + self.atomic_commits
    }

    /// Sends plus receives on channels.
    #[must_use]
    pub fn message_ops(&self) -> usize {
        self.message_sends + self.message_receives
    }

    #[must_use]
    pub fn lock_ops(&self) -> usize {
        self.lock_acquires + self.lock_releases
    }

    /// Operations that touch memory shared between threads: locks and
    /// optimistic cells, but not channels.
    #[must_use]
    pub fn shared_memory_ops(&self) -> usize {
        self.lock_ops() + self.atomic_ops()
    }
}

/// A completed, chronologically ordered trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    events: Vec<TraceEvent>,
}

impl Evidence {
    /// Builds evidence from raw events, sorting them by timestamp.
    ///
    /// The sort is stable: events that share a timestamp keep the order in
    /// which they were recorded.
    #[must_use]
    pub fn from_events(mut events: Vec<TraceEvent>) -> Self {
        events.sort_by_key(|e| e.at_ns);
        Self { events }
    }

    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of distinct threads that recorded at least one event.
    ///
    /// A thread that was spawned but never recorded anything does not count;
    /// only the `thread` field of recorded events is considered.
    #[must_use]
    pub fn thread_count(&self) -> usize {
        let threads: BTreeSet<ThreadId> = self.events.iter().map(|e| e.thread).collect();
        threads.len()
    }

    /// Folds the whole trace into per-family tallies.
    #[must_use]
    pub fn counts(&self) -> EventCounts {
        let mut counts = EventCounts::default();
        for event in &self.events {
            match event.kind {
                EventKind::LockAcquire { .. } => counts.lock_acquires += 1,
                EventKind::LockRelease { .. } => counts.lock_releases += 1,
                EventKind::AtomicRetry { .. } => counts.atomic_retries += 1,
                EventKind::AtomicCommit { .. } => counts.atomic_commits += 1,
                EventKind::MessageSend { .. } => counts.message_sends += 1,
                EventKind::MessageReceive { .. } => counts.message_receives += 1,
                EventKind::TaskSpawn { .. } => counts.task_spawns += 1,
            }
        }
        counts
    }

    /// SHA-256 over the canonical serialization of the ordered events.
    ///
    /// Two traces with the same events in the same order fingerprint
    /// identically, regardless of which file they were read from.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        utils::trace_digest(self)
    }
}
