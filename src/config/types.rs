// src/config/types.rs
use crate::types::ThreadingModel;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Classifier policy: which matchers run and in what order ties break.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyConfig {
    /// Models checked in order; the first whose matcher reports a match
    /// wins. `unknown` is not allowed here, it is the fallback.
    #[serde(default = "default_precedence")]
    pub precedence: Vec<ThreadingModel>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            precedence: default_precedence(),
        }
    }
}

fn default_precedence() -> Vec<ThreadingModel> {
    vec![ThreadingModel::Transactional, ThreadingModel::NodeBased]
}

/// Tuning for the transactional-memory matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionalConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Traces with fewer retry/commit events than this never match.
    /// Values below 1 behave as 1.
    #[serde(default = "default_min_atomic_ops")]
    pub min_atomic_ops: usize,
    #[serde(default = "default_weight_atomic_share")]
    pub weight_atomic_share: f64,
    #[serde(default = "default_weight_one")]
    pub weight_retry_pressure: f64,
    #[serde(default = "default_weight_one")]
    pub weight_contention: f64,
}

impl Default for TransactionalConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            min_atomic_ops: default_min_atomic_ops(),
            weight_atomic_share: default_weight_atomic_share(),
            weight_retry_pressure: default_weight_one(),
            weight_contention: default_weight_one(),
        }
    }
}

/// Tuning for the node-based (message passing) matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeBasedConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Traces with fewer send/receive events than this never match.
    /// Values below 1 behave as 1.
    #[serde(default = "default_min_messages")]
    pub min_messages: usize,
    #[serde(default = "default_weight_one")]
    pub weight_message_share: f64,
    #[serde(default = "default_weight_one")]
    pub weight_exclusivity: f64,
    #[serde(default = "default_weight_participation")]
    pub weight_participation: f64,
    #[serde(default = "default_weight_one")]
    pub weight_isolation: f64,
}

impl Default for NodeBasedConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            min_messages: default_min_messages(),
            weight_message_share: default_weight_one(),
            weight_exclusivity: default_weight_one(),
            weight_participation: default_weight_participation(),
            weight_isolation: default_weight_one(),
        }
    }
}

fn default_threshold() -> f64 {
    0.55
}
const fn default_min_atomic_ops() -> usize {
    4
}
const fn default_min_messages() -> usize {
    4
}
fn default_weight_one() -> f64 {
    1.0
}
// Atomic volume is the strongest single indicator; it counts double
// against the scale-free ratios.
fn default_weight_atomic_share() -> f64 {
    2.0
}
fn default_weight_participation() -> f64 {
    0.75
}

/// Which trace files a batch run picks up.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiscoveryConfig {
    /// Regexes matched against the path. Empty means everything.
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// On-disk schema of `weft.toml`. Every table is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeftToml {
    #[serde(default)]
    pub classify: ClassifyConfig,
    #[serde(default)]
    pub transactional: TransactionalConfig,
    #[serde(default)]
    pub node_based: NodeBasedConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// Runtime configuration with discovery patterns compiled.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub classify: ClassifyConfig,
    pub transactional: TransactionalConfig,
    pub node_based: NodeBasedConfig,
    pub include_patterns: Vec<Regex>,
    pub exclude_patterns: Vec<Regex>,
}
