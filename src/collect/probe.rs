// src/collect/probe.rs
//! Per-thread recording handle.

use super::collector::CollectorInner;
use crate::event::{AtomicId, ChannelId, EventKind, LockId, ThreadId};
use std::sync::Arc;

/// Records events on behalf of one traced thread.
///
/// Cloning a probe shares the thread identity; use [`Probe::spawn`] to give
/// a new thread its own id. Recording never blocks on anything but the
/// buffer mutex and never fails.
#[derive(Clone)]
pub struct Probe {
    inner: Arc<CollectorInner>,
    thread: ThreadId,
}

impl Probe {
    pub(crate) fn attach(inner: Arc<CollectorInner>, thread: ThreadId) -> Self {
        Self { inner, thread }
    }

    #[must_use]
    pub fn thread(&self) -> ThreadId {
        self.thread
    }

    pub fn lock_acquire(&self, lock: LockId) {
        self.inner.record(self.thread, EventKind::LockAcquire { lock });
    }

    pub fn lock_release(&self, lock: LockId) {
        self.inner.record(self.thread, EventKind::LockRelease { lock });
    }

    /// Records that an optimistic update conflicted and restarted.
    pub fn atomic_retry(&self, cell: AtomicId) {
        self.inner.record(self.thread, EventKind::AtomicRetry { cell });
    }

    /// Records that an optimistic update published its result.
    pub fn atomic_commit(&self, cell: AtomicId) {
        self.inner.record(self.thread, EventKind::AtomicCommit { cell });
    }

    pub fn message_send(&self, channel: ChannelId) {
        self.inner
            .record(self.thread, EventKind::MessageSend { channel });
    }

    pub fn message_receive(&self, channel: ChannelId) {
        self.inner
            .record(self.thread, EventKind::MessageReceive { channel });
    }

    /// Allocates a probe for a newly spawned thread and records the spawn
    /// on the parent's timeline.
    #[must_use]
    pub fn spawn(&self) -> Probe {
        let child = self.inner.allocate_thread();
        self.inner
            .record(self.thread, EventKind::TaskSpawn { task: child });
        Probe::attach(Arc::clone(&self.inner), child)
    }
}

#[cfg(test)]
mod tests {
    use crate::collect::TraceCollector;
    use crate::event::{ChannelId, EventKind, ThreadId};
    use std::thread;

    #[test]
    fn spawn_records_the_parent_child_link() {
        let collector = TraceCollector::new();
        let parent = collector.probe();
        let child = parent.spawn();
        assert_ne!(parent.thread(), child.thread());

        let evidence = collector.finish();
        assert_eq!(evidence.len(), 1);
        let event = evidence.events()[0];
        assert_eq!(event.thread, parent.thread());
        assert_eq!(
            event.kind,
            EventKind::TaskSpawn {
                task: child.thread()
            }
        );
    }

    #[test]
    fn clones_share_a_thread_id() {
        let collector = TraceCollector::new();
        let probe = collector.probe();
        let clone = probe.clone();
        assert_eq!(probe.thread(), clone.thread());
    }

    #[test]
    fn probes_move_across_real_threads() {
        let collector = TraceCollector::new();
        let parent = collector.probe();
        let child = parent.spawn();
        let worker = thread::spawn(move || {
            child.message_receive(ChannelId(0));
        });
        parent.message_send(ChannelId(0));
        worker.join().unwrap();

        let evidence = collector.finish();
        assert_eq!(evidence.counts().message_ops(), 2);
        assert_eq!(evidence.counts().task_spawns, 1);
        assert_eq!(parent.thread(), ThreadId(0));
    }
}
