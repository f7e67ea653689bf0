// src/runlog.rs
//! Machine-readable run logging for classification audit trails.
//!
//! Events are appended to `.weft/runs.jsonl`.

use crate::types::ThreadingModel;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEventKind {
    BatchStarted {
        traces: usize,
    },
    TraceClassified {
        path: String,
        model: ThreadingModel,
        confidence: f64,
    },
    TraceFailed {
        path: String,
        error: String,
    },
    BatchFinished {
        classified: usize,
        failed: usize,
        duration_ms: u128,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RunEvent {
    pub timestamp: u64,
    pub kind: RunEventKind,
}

#[derive(Clone)]
pub struct RunLogger {
    log_path: PathBuf,
}

impl RunLogger {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        let log_path = root.join(".weft").join("runs.jsonl");
        Self { log_path }
    }

    pub fn log(&self, kind: RunEventKind) {
        // Logging is best-effort. We swallow errors to avoid crashing main flow.
        if let Ok(json) = Self::serialize_event(kind) {
            let _ = self.append_to_file(&json);
        }
    }

    fn serialize_event(kind: RunEventKind) -> Result<String> {
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let event = RunEvent { timestamp, kind };
        Ok(serde_json::to_string(&event)?)
    }

    fn append_to_file(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}
