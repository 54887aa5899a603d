//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading simulator, pintool or McPAT output
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line_no}: {reason}\n    {line}")]
    MalformedLine {
        path: PathBuf,
        line_no: usize,
        line: String,
        reason: String,
    },

    #[error("{path}:{line_no}: core id {cpuid} outside [-1, 32)\n    {line}")]
    CoreIdOutOfRange {
        path: PathBuf,
        line_no: usize,
        line: String,
        cpuid: i64,
    },

    #[error("Invalid McPAT report {path}: {reason}")]
    InvalidReport { path: PathBuf, reason: String },
}

/// Errors raised while merging experiments and deriving metrics
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("No data for metric {0}")]
    NoData(String),

    #[error("Metric {key} is not numeric: {value}")]
    NotNumeric { key: String, value: String },

    #[error("Missing metric {key} for bench {bench}, tool {tool}")]
    MissingMetric {
        key: String,
        bench: String,
        tool: String,
    },

    #[error("Unknown configuration: {0}")]
    UnknownConfig(String),

    #[error("Unhandled core count in configuration: {0}")]
    UnhandledCoreCount(String),

    #[error("Phase cycles for {tool} sum to {phases}, expected {total}")]
    PhaseSumMismatch { tool: String, phases: i64, total: i64 },

    #[error("Invalid cycle count {key} = {value} for bench {bench}, tool {tool}")]
    InvalidCycleCount {
        key: String,
        value: f64,
        bench: String,
        tool: String,
    },

    #[error("Invalid scale factor {factor} for bench {bench}, tool {tool}")]
    InvalidScaleFactor {
        factor: f64,
        bench: String,
        tool: String,
    },

    #[error("No global partition in experiment {bench}/{tool}")]
    MissingGlobal { bench: String, tool: String },

    #[error("Cannot find stats. Bench: {bench} Workload: {workload} Tool: {tool} Key: {key}")]
    EmptySelection {
        bench: String,
        workload: String,
        tool: String,
        key: String,
    },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Failed to read report {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse report {path}: {source}")]
    DeserializationFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors in the run environment or hardware configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid hardware config: {0}")]
    Invalid(String),
}
