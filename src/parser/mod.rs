//! Parsers for simulator output and record schema definitions.
//!
//! This module handles:
//! - Decoding the one-dict-per-line backend stats format
//! - Reading backend stats files into per-core partitions
//! - Reading pintool counters
//! - Reading McPAT power reports
//! - Defining the record types

pub mod backend;
pub mod literal;
pub mod mcpat;
pub mod pintool;
pub mod schema;

// Re-export main types
pub use backend::parse_stats;
pub use literal::{decode_line, DecodeError};
pub use mcpat::{parse_detailed, parse_terse, AimPower, McpatReport};
pub use pintool::parse_pintool_stats;
pub use schema::{probe, CorePartition, Experiment, StatRecord, StatValue};
