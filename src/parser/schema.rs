//! Record types shared by the parsers, the aggregator and the JSON reports.
//!
//! A stats file is read into a `CorePartition` (core id → `StatRecord`);
//! one `Experiment` holds the partition for a single
//! (benchmark, trial, workload, tool) run.

use crate::keys;
use crate::utils::config::GLOBAL_CPUID;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single statistic as written by a simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl StatValue {
    /// Numeric view of the value
    ///
    /// Booleans count as 0/1. Strings have no numeric view.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            StatValue::Int(i) => Some(*i as f64),
            StatValue::Float(f) => Some(*f),
            StatValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StatValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Bool(b) => write!(f, "{}", b),
            StatValue::Int(i) => write!(f, "{}", i),
            StatValue::Float(x) => write!(f, "{}", x),
            StatValue::Str(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        StatValue::Float(value)
    }
}

impl From<i64> for StatValue {
    fn from(value: i64) -> Self {
        StatValue::Int(value)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        StatValue::Str(value.to_string())
    }
}

/// Metric name → value. Ordered so that reports are reproducible.
pub type StatRecord = BTreeMap<String, StatValue>;

/// Core id → statistics of that core; `GLOBAL_CPUID` holds the totals
pub type CorePartition = BTreeMap<i32, StatRecord>;

/// One collected run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub bench: String,

    /// Trial number, 1-based, kept as text like the other metadata
    pub trial: String,

    pub workload: String,

    pub tool: String,

    /// Parsed statistics. Pintool runs keep theirs under the global id.
    pub cores: CorePartition,
}

impl Experiment {
    pub fn new(bench: &str, trial: u32, workload: &str, tool: &str) -> Self {
        Self {
            bench: bench.to_string(),
            trial: trial.to_string(),
            workload: workload.to_string(),
            tool: tool.to_string(),
            cores: CorePartition::new(),
        }
    }

    /// Metadata fields as a record
    pub fn metadata(&self) -> StatRecord {
        keys::METADATA_KEYS
            .iter()
            .zip([&self.bench, &self.trial, &self.workload, &self.tool])
            .map(|(key, value)| (key.to_string(), StatValue::from(value.as_str())))
            .collect()
    }

    pub fn global(&self) -> Option<&StatRecord> {
        self.cores.get(&GLOBAL_CPUID)
    }

    pub fn global_mut(&mut self) -> Option<&mut StatRecord> {
        self.cores.get_mut(&GLOBAL_CPUID)
    }
}

/// Build a probe record from metadata pairs
///
/// # Example
/// ```ignore
/// let p = probe(&[("bench", "x264"), ("tool", "viser8")]);
/// let rows = dict_filter(&records, &p);
/// ```
pub fn probe(pairs: &[(&str, &str)]) -> StatRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), StatValue::from(*v)))
        .collect()
}
