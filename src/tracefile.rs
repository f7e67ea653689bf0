// src/tracefile.rs
//! Reading and writing traces as JSON Lines.
//!
//! One event per line. Blank lines are tolerated so traces can be
//! concatenated or hand-edited; anything else that fails to parse is an
//! error carrying the file path and 1-based line number.

use crate::error::{Result, WeftError};
use crate::evidence::Evidence;
use crate::event::TraceEvent;
use std::fs;
use std::path::Path;

/// Reads and parses a trace file into time-ordered evidence.
pub fn read_trace(path: &Path) -> Result<Evidence> {
    let content = fs::read_to_string(path).map_err(|source| WeftError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    parse_trace(path, &content)
}

/// Parses trace content. `path` is only used for error reporting.
pub fn parse_trace(path: &Path, content: &str) -> Result<Evidence> {
    let mut events = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let event: TraceEvent =
            serde_json::from_str(line).map_err(|source| WeftError::TraceParse {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })?;
        events.push(event);
    }
    Ok(Evidence::from_events(events))
}

/// Writes evidence to a trace file, creating parent directories as needed.
pub fn write_trace(path: &Path, evidence: &Evidence) -> Result<()> {
    let mut out = String::new();
    for event in evidence.events() {
        let line = serde_json::to_string(event)
            .map_err(|e| WeftError::Other(format!("failed to serialize trace event: {e}")))?;
        out.push_str(&line);
        out.push('\n');
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| WeftError::Io {
            source,
            path: parent.to_path_buf(),
        })?;
    }
    fs::write(path, out).map_err(|source| WeftError::Io {
        source,
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ChannelId, EventKind, LockId, ThreadId};
    use std::path::PathBuf;

    fn sample() -> Evidence {
        Evidence::from_events(vec![
            TraceEvent::new(10, ThreadId(0), EventKind::LockAcquire { lock: LockId(1) }),
            TraceEvent::new(
                20,
                ThreadId(1),
                EventKind::MessageSend {
                    channel: ChannelId(0),
                },
            ),
            TraceEvent::new(30, ThreadId(0), EventKind::LockRelease { lock: LockId(1) }),
        ])
    }

    #[test]
    fn parse_skips_blank_lines() {
        let content = concat!(
            r#"{"at_ns":5,"thread":0,"op":"lock_acquire","lock":2}"#,
            "\n\n",
            r#"{"at_ns":9,"thread":0,"op":"lock_release","lock":2}"#,
            "\n",
        );
        let evidence = parse_trace(&PathBuf::from("x.jsonl"), content).unwrap();
        assert_eq!(evidence.len(), 2);
    }

    #[test]
    fn parse_reports_path_and_line() {
        let content = "{\"at_ns\":5,\"thread\":0,\"op\":\"lock_acquire\",\"lock\":2}\nnot json\n";
        let err = parse_trace(&PathBuf::from("bad.jsonl"), content).unwrap_err();
        match err {
            WeftError::TraceParse { path, line, .. } => {
                assert_eq!(path, PathBuf::from("bad.jsonl"));
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_rejects_unknown_ops() {
        let content = r#"{"at_ns":1,"thread":0,"op":"teleport","lock":2}"#;
        assert!(parse_trace(&PathBuf::from("x.jsonl"), content).is_err());
    }

    #[test]
    fn written_traces_read_back_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("run.jsonl");
        let original = sample();
        write_trace(&path, &original).unwrap();
        let read = read_trace(&path).unwrap();
        assert_eq!(read, original);
        assert_eq!(read.fingerprint(), original.fingerprint());
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = read_trace(&PathBuf::from("/no/such/trace.jsonl")).unwrap_err();
        match err {
            WeftError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("/no/such/trace.jsonl"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
