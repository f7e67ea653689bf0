// src/collect/collector.rs
//! Thread-safe append-only buffer for trace events.

use super::probe::Probe;
use crate::event::{EventKind, ThreadId, TraceEvent};
use crate::evidence::Evidence;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Shared state behind every probe of one collection run.
pub(crate) struct CollectorInner {
    events: Mutex<Vec<TraceEvent>>,
    epoch: Instant,
    next_thread: AtomicU32,
}

impl CollectorInner {
    fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            epoch: Instant::now(),
            next_thread: AtomicU32::new(0),
        }
    }

    /// Appends one event stamped with the offset from the collection epoch.
    /// A poisoned buffer drops the event rather than propagating the panic.
    pub(crate) fn record(&self, thread: ThreadId, kind: EventKind) {
        #[allow(clippy::cast_possible_truncation)]
        let at_ns = self.epoch.elapsed().as_nanos() as u64;
        if let Ok(mut events) = self.events.lock() {
            events.push(TraceEvent::new(at_ns, thread, kind));
        }
    }

    pub(crate) fn allocate_thread(&self) -> ThreadId {
        ThreadId(self.next_thread.fetch_add(1, Ordering::Relaxed))
    }

    fn snapshot(&self) -> Evidence {
        let events = if let Ok(guard) = self.events.lock() {
            guard.clone()
        } else {
            Vec::new()
        };
        Evidence::from_events(events)
    }

    fn len(&self) -> usize {
        self.events.lock().map_or(0, |guard| guard.len())
    }
}

/// Collects concurrency events from any number of threads.
///
/// Thread ids are dense and start at zero for every new collector, so two
/// runs of the same workload produce comparable traces.
pub struct TraceCollector {
    inner: Arc<CollectorInner>,
}

impl TraceCollector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CollectorInner::new()),
        }
    }

    /// Hands out a probe with a fresh thread id.
    #[must_use]
    pub fn probe(&self) -> Probe {
        let thread = self.inner.allocate_thread();
        Probe::attach(Arc::clone(&self.inner), thread)
    }

    /// Number of events recorded so far.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.inner.len()
    }

    /// Copies the buffer into time-ordered evidence. Probes may keep
    /// recording afterwards; later snapshots will include their events.
    #[must_use]
    pub fn snapshot(&self) -> Evidence {
        self.inner.snapshot()
    }

    /// Ends collection and returns the final evidence.
    #[must_use]
    pub fn finish(self) -> Evidence {
        self.inner.snapshot()
    }
}

impl Default for TraceCollector {
    fn default() -> Self {
        Self::new()
    }
}
