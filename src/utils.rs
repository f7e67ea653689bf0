// src/utils.rs
use crate::evidence::Evidence;
use sha2::{Digest, Sha256};

/// Computes SHA256 hash of content with normalized line endings.
/// Trace files written on Windows hash the same as their Unix twins.
#[must_use]
pub fn compute_sha256(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Digest of a trace in its canonical form: one JSON line per event, in
/// timestamp order. Events that fail to serialize are skipped, matching
/// the best-effort stance of the run log.
#[must_use]
pub fn trace_digest(evidence: &Evidence) -> String {
    let mut canonical = String::new();
    for event in evidence.events() {
        if let Ok(line) = serde_json::to_string(event) {
            canonical.push_str(&line);
            canonical.push('\n');
        }
    }
    compute_sha256(&canonical)
}
