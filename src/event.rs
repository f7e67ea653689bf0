// src/event.rs
//! The trace event data model.
//!
//! A trace is a line-oriented sequence of [`TraceEvent`] records, one JSON
//! object per line. Each record carries a nanosecond offset from the start of
//! collection, the numeric id of the thread that produced it, and the kind of
//! concurrency operation observed. The kinds cover the three families of
//! evidence the matchers care about: lock traffic, optimistic (retry/commit)
//! memory updates, and message passing between threads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identity of a traced thread, assigned at probe creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub u32);

/// Identity of a mutex or similar exclusive lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockId(pub u32);

/// Identity of an optimistically updated memory cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AtomicId(pub u32);

/// Identity of a message channel (queue, mailbox, pipe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u32);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// One observed concurrency operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EventKind {
    LockAcquire { lock: LockId },
    LockRelease { lock: LockId },
    /// An optimistic update observed a conflict and restarted.
    AtomicRetry { cell: AtomicId },
    /// An optimistic update published its result.
    AtomicCommit { cell: AtomicId },
    MessageSend { channel: ChannelId },
    MessageReceive { channel: ChannelId },
    /// The recording thread spawned a new traced thread.
    TaskSpawn { task: ThreadId },
}

/// A single trace record: when, who, what.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Nanoseconds since the collector's epoch.
    pub at_ns: u64,
    pub thread: ThreadId,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl TraceEvent {
    #[must_use]
    pub fn new(at_ns: u64, thread: ThreadId, kind: EventKind) -> Self {
        Self { at_ns, thread, kind }
    }

    /// True for lock-acquire and lock-release events.
    #[must_use]
    pub fn is_lock_op(&self) -> bool {
        matches!(
            self.kind,
            EventKind::LockAcquire { .. } | EventKind::LockRelease { .. }
        )
    }

    /// True for retry and commit events on optimistic cells.
    #[must_use]
    pub fn is_atomic_op(&self) -> bool {
        matches!(
            self.kind,
            EventKind::AtomicRetry { .. } | EventKind::AtomicCommit { .. }
        )
    }

    /// True for send and receive events on channels.
    #[must_use]
    pub fn is_message_op(&self) -> bool {
        matches!(
            self.kind,
            EventKind::MessageSend { .. } | EventKind::MessageReceive { .. }
        )
    }
}
