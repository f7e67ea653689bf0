// src/discovery.rs
//! Finds trace files for batch classification.

use crate::config::Config;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories never worth descending into.
pub const PRUNE_DIRS: &[&str] = &[".git", ".weft", "node_modules", "target"];

/// Extension a trace file must carry.
const TRACE_EXT: &str = "jsonl";

/// Runs the trace discovery pipeline.
/// Output is sorted so batch ordering is deterministic.
///
/// # Errors
/// Returns an error when `root` does not exist.
pub fn discover(root: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        bail!("trace root not found: {}", root.display());
    }
    let raw = walk_filesystem(root);
    let mut files = filter_config(raw, config);
    files.sort();
    Ok(files)
}

fn walk_filesystem(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !should_prune(&e.file_name().to_string_lossy()))
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_trace_file(entry.path()))
        .map(|entry| entry.path().to_path_buf())
        .collect()
}

fn should_prune(name: &str) -> bool {
    PRUNE_DIRS.contains(&name)
}

fn is_trace_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(TRACE_EXT)
}

/// Normalizes a path to use forward slashes (cross-platform pattern matching).
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn filter_config(mut paths: Vec<PathBuf>, config: &Config) -> Vec<PathBuf> {
    if !config.include_patterns.is_empty() {
        paths.retain(|p| {
            let s = normalize_path(p);
            config.include_patterns.iter().any(|re| re.is_match(&s))
        });
    }

    if !config.exclude_patterns.is_empty() {
        paths.retain(|p| {
            let s = normalize_path(p);
            !config.exclude_patterns.iter().any(|re| re.is_match(&s))
        });
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prunes_the_usual_suspects() {
        assert!(should_prune(".git"));
        assert!(should_prune(".weft"));
        assert!(should_prune("target"));
        assert!(!should_prune("traces"));
    }

    #[test]
    fn only_jsonl_files_are_traces() {
        assert!(is_trace_file(Path::new("runs/a.jsonl")));
        assert!(!is_trace_file(Path::new("runs/a.json")));
        assert!(!is_trace_file(Path::new("runs/jsonl")));
        assert!(!is_trace_file(Path::new("notes.txt")));
    }

    #[test]
    fn missing_root_is_an_error() {
        let config = Config::default();
        assert!(discover(Path::new("/definitely/not/here"), &config).is_err());
    }
}
