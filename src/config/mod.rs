// src/config/mod.rs
pub mod types;

pub use self::types::{
    ClassifyConfig, Config, DiscoveryConfig, NodeBasedConfig, TransactionalConfig, WeftToml,
};

use crate::error::WeftError;
use crate::types::ThreadingModel;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// File name looked up in the trace root.
pub const CONFIG_FILE: &str = "weft.toml";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `weft.toml` from the given root.
    ///
    /// A missing file yields the defaults; a file that is present but
    /// unparseable or out of range is an error.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed, or validated.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let parsed: WeftToml = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let config = Self::from_toml(parsed)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the runtime config from a parsed file, compiling the
    /// discovery patterns.
    ///
    /// # Errors
    /// Returns an error when a discovery pattern is not a valid regex.
    pub fn from_toml(parsed: WeftToml) -> crate::error::Result<Self> {
        Ok(Self {
            classify: parsed.classify,
            transactional: parsed.transactional,
            node_based: parsed.node_based,
            include_patterns: compile_patterns(&parsed.discovery.include)?,
            exclude_patterns: compile_patterns(&parsed.discovery.exclude)?,
        })
    }

    /// Rejects configurations the matchers cannot score sensibly.
    ///
    /// # Errors
    /// Returns an error for empty or duplicated precedence, thresholds
    /// outside `[0, 1]`, or degenerate weight sets.
    pub fn validate(&self) -> crate::error::Result<()> {
        validate_precedence(&self.classify.precedence)?;
        validate_threshold("transactional.threshold", self.transactional.threshold)?;
        validate_threshold("node_based.threshold", self.node_based.threshold)?;
        validate_weights(
            "transactional",
            &[
                self.transactional.weight_atomic_share,
                self.transactional.weight_retry_pressure,
                self.transactional.weight_contention,
            ],
        )?;
        validate_weights(
            "node_based",
            &[
                self.node_based.weight_message_share,
                self.node_based.weight_exclusivity,
                self.node_based.weight_participation,
                self.node_based.weight_isolation,
            ],
        )?;
        Ok(())
    }
}

fn compile_patterns(raw: &[String]) -> crate::error::Result<Vec<Regex>> {
    raw.iter()
        .map(|pattern| Regex::new(pattern).map_err(WeftError::from))
        .collect()
}

fn validate_precedence(precedence: &[ThreadingModel]) -> crate::error::Result<()> {
    if precedence.is_empty() {
        return Err(WeftError::Config(
            "classify.precedence must not be empty".into(),
        ));
    }
    if precedence.contains(&ThreadingModel::Unknown) {
        return Err(WeftError::Config(
            "classify.precedence cannot contain `unknown`; it is the fallback".into(),
        ));
    }
    let mut seen = BTreeSet::new();
    for model in precedence {
        if !seen.insert(model) {
            return Err(WeftError::Config(
                "classify.precedence lists the same model twice".into(),
            ));
        }
    }
    Ok(())
}

fn validate_threshold(name: &str, value: f64) -> crate::error::Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(WeftError::Config(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

fn validate_weights(section: &str, weights: &[f64]) -> crate::error::Result<()> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(WeftError::Config(format!(
            "{section} weights must be finite and non-negative"
        )));
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(WeftError::Config(format!(
            "{section} weights must not all be zero"
        )));
    }
    Ok(())
}
