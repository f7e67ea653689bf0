// src/collect/mod.rs
//! Runtime evidence collection.
//!
//! A [`TraceCollector`] owns the shared event buffer; each traced thread
//! records through its own [`Probe`]. The split keeps locking out of sight:
//! the collector is held by whoever drives the run, probes are handed to
//! workers and are cheap to clone and send across threads.

mod collector;
mod probe;

pub use collector::TraceCollector;
pub use probe::Probe;
