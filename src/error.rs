// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeftError {
    #[error("cannot classify an empty evidence trace")]
    EmptyEvidence,

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("malformed trace event at {path}:{line}: {source}")]
    TraceParse {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Generic error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, WeftError>;

// Allow `?` on std::io::Error by converting to WeftError::Io with unknown path.
impl From<std::io::Error> for WeftError {
    fn from(source: std::io::Error) -> Self {
        WeftError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
