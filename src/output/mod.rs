//! Output writers for collected results and summary tables.
//!
//! This module handles writing data to disk and the terminal:
//! - Versioned JSON reports
//! - Text summaries of stats tables

pub mod json;
pub mod summary;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report, Report};
pub use summary::{render_output_table, render_table};
