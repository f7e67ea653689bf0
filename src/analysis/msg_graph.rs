// src/analysis/msg_graph.rs
//! Thread communication graph built from message events.
//!
//! Sends and receives are paired per channel in FIFO order: the k-th send
//! on a channel matches the k-th receive. Each pair contributes one
//! sender-to-receiver edge. Unpaired tails (a send nobody consumed, a
//! receive with no recorded send) contribute no edge, but their threads
//! still count as participants.

use crate::event::{ChannelId, EventKind, ThreadId};
use crate::evidence::Evidence;
use std::collections::{BTreeMap, BTreeSet};

/// Directed graph of who-sends-to-whom, plus channel ownership stats.
#[derive(Debug, Clone)]
pub struct MessageGraph {
    edges: BTreeMap<ThreadId, BTreeSet<ThreadId>>,
    participants: BTreeSet<ThreadId>,
    received_channels: usize,
    single_receiver_channels: usize,
}

impl MessageGraph {
    #[must_use]
    pub fn build(evidence: &Evidence) -> Self {
        let mut sends: BTreeMap<ChannelId, Vec<ThreadId>> = BTreeMap::new();
        let mut receives: BTreeMap<ChannelId, Vec<ThreadId>> = BTreeMap::new();
        let mut participants = BTreeSet::new();

        for event in evidence.events() {
            match event.kind {
                EventKind::MessageSend { channel } => {
                    sends.entry(channel).or_default().push(event.thread);
                    participants.insert(event.thread);
                }
                EventKind::MessageReceive { channel } => {
                    receives.entry(channel).or_default().push(event.thread);
                    participants.insert(event.thread);
                }
                _ => {}
            }
        }

        let mut edges: BTreeMap<ThreadId, BTreeSet<ThreadId>> = BTreeMap::new();
        for (channel, senders) in &sends {
            let Some(receivers) = receives.get(channel) else {
                continue;
            };
            for (sender, receiver) in senders.iter().zip(receivers.iter()) {
                edges.entry(*sender).or_default().insert(*receiver);
            }
        }

        let received_channels = receives.len();
        let single_receiver_channels = receives
            .values()
            .filter(|threads| {
                let distinct: BTreeSet<ThreadId> = threads.iter().copied().collect();
                distinct.len() == 1
            })
            .count();

        Self {
            edges,
            participants,
            received_channels,
            single_receiver_channels,
        }
    }

    /// Threads that sent or received at least one message.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Number of distinct sender-to-receiver links.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Channels with at least one recorded receive.
    #[must_use]
    pub fn received_channels(&self) -> usize {
        self.received_channels
    }

    /// Channels whose receives all came from one thread.
    #[must_use]
    pub fn single_receiver_channels(&self) -> usize {
        self.single_receiver_channels
    }

    /// Fraction of consuming channels drained by exactly one thread.
    ///
    /// A dedicated mailbox per worker is the signature of actor-style
    /// designs; a channel shared by many receivers looks more like a
    /// scrambled work pile. Returns 0.0 when nothing was received.
    #[must_use]
    pub fn receiver_exclusivity(&self) -> f64 {
        if self.received_channels == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.single_receiver_channels as f64 / self.received_channels as f64;
        ratio
    }

    /// Message loops between threads (request/reply pairs, rings).
    /// Output is deterministic: nodes and neighbors are visited in id order.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<ThreadId>> {
        let mut nodes: BTreeSet<ThreadId> = self.edges.keys().copied().collect();
        for targets in self.edges.values() {
            nodes.extend(targets.iter().copied());
        }

        let mut state = DfsState {
            visited: BTreeSet::new(),
            recursion_stack: BTreeSet::new(),
            path_stack: Vec::new(),
            cycles: Vec::new(),
        };
        for node in nodes {
            if !state.visited.contains(&node) {
                self.dfs(node, &mut state);
            }
        }
        state.cycles
    }

    #[must_use]
    pub fn cycle_count(&self) -> usize {
        self.cycles().len()
    }

    fn dfs(&self, node: ThreadId, state: &mut DfsState) {
        state.visited.insert(node);
        state.recursion_stack.insert(node);
        state.path_stack.push(node);

        if let Some(neighbors) = self.edges.get(&node) {
            for &neighbor in neighbors {
                if !state.visited.contains(&neighbor) {
                    self.dfs(neighbor, state);
                } else if state.recursion_stack.contains(&neighbor) {
                    record_cycle(neighbor, state);
                }
            }
        }

        state.recursion_stack.remove(&node);
        state.path_stack.pop();
    }
}

struct DfsState {
    visited: BTreeSet<ThreadId>,
    recursion_stack: BTreeSet<ThreadId>,
    path_stack: Vec<ThreadId>,
    cycles: Vec<Vec<ThreadId>>,
}

#[allow(clippy::indexing_slicing)] // Guarded: pos is from position() returning Some
fn record_cycle(neighbor: ThreadId, state: &mut DfsState) {
    if let Some(pos) = state.path_stack.iter().position(|t| *t == neighbor) {
        let mut cycle = state.path_stack[pos..].to_vec();
        cycle.push(neighbor); // Close the loop visually
        state.cycles.push(cycle);
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::event::TraceEvent;

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

    #[test]
    fn pipeline_has_edges_but_no_cycles() {
        // t0 -> t1 -> t2 over two channels.
        let evidence = Evidence::from_events(vec![
            send(10, 0, 0),
            recv(20, 1, 0),
            send(30, 1, 1),
            recv(40, 2, 1),
        ]);
        let graph = MessageGraph::build(&evidence);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.participant_count(), 3);
        assert_eq!(graph.cycle_count(), 0);
    }

    #[test]
    fn ring_is_one_cycle() {
        let evidence = Evidence::from_events(vec![
            send(10, 0, 0),
            recv(11, 1, 0),
            send(20, 1, 1),
            recv(21, 2, 1),
            send(30, 2, 2),
            recv(31, 0, 2),
        ]);
        let graph = MessageGraph::build(&evidence);
        let cycles = graph.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 4); // t0 t1 t2 t0
    }

    #[test]
    fn self_send_is_a_self_loop() {
        let evidence = Evidence::from_events(vec![send(1, 0, 0), recv(2, 0, 0)]);
        let graph = MessageGraph::build(&evidence);
        let cycles = graph.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 2);
    }

    #[test]
    fn sends_pair_with_receives_in_fifo_order() {
        // Two sends on one channel, drained by two different threads.
        let evidence = Evidence::from_events(vec![
            send(10, 0, 5),
            send(20, 1, 5),
            recv(30, 2, 5),
            recv(40, 3, 5),
        ]);
        let graph = MessageGraph::build(&evidence);
        assert_eq!(graph.edge_count(), 2); // t0 -> t2 and t1 -> t3
        assert_eq!(graph.cycle_count(), 0);
    }

    #[test]
    fn unpaired_send_still_counts_as_participation() {
        let evidence = Evidence::from_events(vec![send(10, 0, 0)]);
        let graph = MessageGraph::build(&evidence);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.participant_count(), 1);
        assert!((graph.receiver_exclusivity() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn exclusivity_is_the_single_receiver_fraction() {
        // Channel 0 drained only by t1; channel 1 drained by t1 and t2.
        let evidence = Evidence::from_events(vec![
            send(10, 0, 0),
            recv(11, 1, 0),
            send(20, 0, 1),
            send(21, 0, 1),
            recv(22, 1, 1),
            recv(23, 2, 1),
        ]);
        let graph = MessageGraph::build(&evidence);
        assert!((graph.receiver_exclusivity() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_evidence_builds_an_empty_graph() {
        let graph = MessageGraph::build(&Evidence::from_events(Vec::new()));
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.participant_count(), 0);
        assert_eq!(graph.cycle_count(), 0);
        assert!((graph.receiver_exclusivity() - 0.0).abs() < f64::EPSILON);
    }
}
