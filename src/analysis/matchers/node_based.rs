// src/analysis/matchers/node_based.rs
//! Detects node-based (actor / message passing) concurrency.
//!
//! Workers that own their state and talk through channels leave a
//! distinctive trace: traffic is dominated by sends and receives, each
//! channel is drained by one thread, most threads take part, and shared
//! memory stays quiet. The communication topology comes from
//! [`MessageGraph`]; loops in it are reported as supporting signals.

use super::{weighted_mean, PatternMatcher};
use crate::analysis::msg_graph::MessageGraph;
use crate::config::NodeBasedConfig;
use crate::evidence::Evidence;
use crate::types::{MatchReport, Signal, ThreadingModel};

pub struct NodeBasedMatcher {
    rules: NodeBasedConfig,
}

impl NodeBasedMatcher {
    #[must_use]
    pub fn new(rules: &NodeBasedConfig) -> Self {
        Self {
            rules: rules.clone(),
        }
    }
}

impl PatternMatcher for NodeBasedMatcher {
    fn name(&self) -> &'static str {
        "message-topology"
    }

    fn model(&self) -> ThreadingModel {
        ThreadingModel::NodeBased
    }

    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&self, evidence: &Evidence) -> MatchReport {
        let counts = evidence.counts();
        let message_ops = counts.message_ops();
        // A floor below 1 would let ratios divide by zero, so 1 is the
        // effective minimum.
        let floor = self.rules.min_messages.max(1);
        if message_ops < floor {
            return MatchReport::unmatched(vec![Signal::informational(
                "insufficient_evidence",
                format!("{message_ops} send/receive events, need at least {floor}"),
            )]);
        }

        let total = counts.total();
        let graph = MessageGraph::build(evidence);

        let message_share = message_ops as f64 / total as f64;
        let exclusivity = graph.receiver_exclusivity();
        let participation = graph.participant_count() as f64 / evidence.thread_count() as f64;
        let isolation = 1.0 - counts.shared_memory_ops() as f64 / total as f64;

        let mut signals = vec![
            Signal::new(
                "message_share",
                format!("{message_ops} of {total} events are send/receive operations"),
                message_share,
            ),
            Signal::new(
                "mailbox_exclusivity",
                format!(
                    "{} of {} consuming channels are drained by a single thread",
                    graph.single_receiver_channels(),
                    graph.received_channels()
                ),
                exclusivity,
            ),
            Signal::new(
                "participation",
                format!(
                    "{} of {} threads send or receive",
                    graph.participant_count(),
                    evidence.thread_count()
                ),
                participation,
            ),
            Signal::new(
                "isolation",
                format!(
                    "{} of {total} events touch shared memory",
                    counts.shared_memory_ops()
                ),
                isolation,
            ),
        ];

        let cycle_count = graph.cycle_count();
        if cycle_count > 0 {
            signals.push(Signal::informational(
                "message_cycles",
                format!("{cycle_count} communication loops between threads"),
            ));
        }
        if counts.task_spawns > 0 {
            signals.push(Signal::informational(
                "task_spawns",
                format!("{} traced thread spawns", counts.task_spawns),
            ));
        }

        let score = weighted_mean(&[
            (self.rules.weight_message_share, message_share),
            (self.rules.weight_exclusivity, exclusivity),
            (self.rules.weight_participation, participation),
            (self.rules.weight_isolation, isolation),
        ]);
        MatchReport::scored(score, self.rules.threshold, signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{AtomicId, ChannelId, EventKind, LockId, ThreadId, TraceEvent};

    fn send(at_ns: u64, thread: u32, channel: u32) -> TraceEvent {
        TraceEvent::new(
            at_ns,
            ThreadId(thread),
            EventKind::MessageSend {
                channel: ChannelId(channel),
            },
        )
    }

    fn recv(at_ns: u64, thread: u32, channel: u32) -> TraceEvent {
        TraceEvent::new(
            at_ns,
            ThreadId(thread),
            EventKind::MessageReceive {
                channel: ChannelId(channel),
            },
        )
    }

    fn matcher() -> NodeBasedMatcher {
        NodeBasedMatcher::new(&NodeBasedConfig::default())
    }

    /// Three workers in a ring, each with its own inbox channel.
    fn actor_ring_trace() -> Evidence {
        let mut events = Vec::new();
        let mut at = 0;
        for _ in 0..3 {
            for worker in 0..3_u32 {
                let next = (worker + 1) % 3;
                events.push(send(at, worker, next));
                at += 1;
                events.push(recv(at, next, next));
                at += 1;
            }
        }
        Evidence::from_events(events)
    }

    #[test]
    fn an_actor_ring_is_a_perfect_match() {
        let report = matcher().evaluate(&actor_ring_trace());
        assert!(report.matched);
        assert!(report.score > 0.99, "score {}", report.score);
        assert!(report
            .signals
            .iter()
            .any(|s| s.label == "message_cycles"));
    }

    #[test]
    fn below_the_floor_never_matches() {
        let evidence = Evidence::from_events(vec![send(0, 0, 0), recv(1, 1, 0)]);
        let report = matcher().evaluate(&evidence);
        assert!(!report.matched);
        assert_eq!(report.signals[0].label, "insufficient_evidence");
    }

    #[test]
    fn empty_evidence_never_matches() {
        let report = matcher().evaluate(&Evidence::from_events(Vec::new()));
        assert!(!report.matched);
    }

    #[test]
    fn lock_heavy_traces_fall_short() {
        // Two messages worth of pleasantries, then twenty lock operations
        // from threads that never touch a channel.
        let mut events = vec![send(0, 0, 0), recv(1, 1, 0), send(2, 0, 0), recv(3, 1, 0)];
        let mut at = 10;
        for round in 0..10_u32 {
            let thread = 2 + (round % 2);
            events.push(TraceEvent::new(
                at,
                ThreadId(thread),
                EventKind::LockAcquire { lock: LockId(0) },
            ));
            at += 1;
            events.push(TraceEvent::new(
                at,
                ThreadId(thread),
                EventKind::LockRelease { lock: LockId(0) },
            ));
            at += 1;
        }
        let report = matcher().evaluate(&Evidence::from_events(events));
        assert!(!report.matched, "score {}", report.score);
    }

    #[test]
    fn shared_mailboxes_weaken_the_match() {
        // Everything flows through one channel drained by four threads.
        let mut events = Vec::new();
        let mut at = 0;
        for _ in 0..8 {
            events.push(send(at, 0, 0));
            at += 1;
        }
        for round in 0..8_u32 {
            events.push(recv(at, 1 + (round % 4), 0));
            at += 1;
        }
        let scattered = matcher().evaluate(&Evidence::from_events(events));
        let dedicated = matcher().evaluate(&actor_ring_trace());
        assert!(scattered.score < dedicated.score);
    }

    #[test]
    fn atomic_traffic_lowers_isolation() {
        let mut events: Vec<TraceEvent> = actor_ring_trace().events().to_vec();
        let mut at = 100;
        for round in 0..6_u32 {
            events.push(TraceEvent::new(
                at,
                ThreadId(round % 3),
                EventKind::AtomicRetry {
                    cell: AtomicId(0),
                },
            ));
            at += 1;
        }
        let mixed = matcher().evaluate(&Evidence::from_events(events));
        let pure = matcher().evaluate(&actor_ring_trace());
        assert!(mixed.score < pure.score);
    }
}
