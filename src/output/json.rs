//! JSON report writer and reader.
//!
//! Every report is wrapped in a [`Report`] envelope carrying the schema
//! version and generation time, and written pretty-printed.

use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Versioned envelope around report data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report<T> {
    /// Schema version
    pub version: String,

    /// RFC 3339 timestamp
    pub generated_at: String,

    pub data: T,
}

impl<T> Report<T> {
    /// Stamp data with the current schema version and time
    pub fn new(data: T) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            data,
        }
    }
}

/// Write report data to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `data` - Report contents, wrapped in a [`Report`] before writing
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// write_report(&experiments, out_dir.join(RESULTS_FILE))?;
/// ```
pub fn write_report<T: Serialize>(
    data: &T,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, &Report::new(data))
        .map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report written ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize report data to a string (for tests and inspection)
pub fn report_to_string<T: Serialize>(data: &T) -> Result<String, OutputError> {
    serde_json::to_string_pretty(&Report::new(data)).map_err(OutputError::SerializationFailed)
}

/// **Private** - refuse empty paths and directories
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// **Private** - size of a written file, 0 when unknown
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a report written by [`write_report`]
///
/// **Public** - the energy command reads collected results this way
///
/// # Errors
/// * `OutputError::ReadFailed` - File cannot be opened
/// * `OutputError::DeserializationFailed` - JSON does not match the report shape
/// * `OutputError::InvalidPath` - report has an unknown schema version
pub fn read_report<T: DeserializeOwned>(input_path: impl AsRef<Path>) -> Result<Report<T>, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(|source| OutputError::ReadFailed {
        path: input_path.to_path_buf(),
        source,
    })?;
    let report: Report<T> = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        OutputError::DeserializationFailed {
            path: input_path.to_path_buf(),
            source,
        }
    })?;

    if report.version != SCHEMA_VERSION {
        return Err(OutputError::InvalidPath(format!(
            "{} has schema version {}, expected {}",
            input_path.display(),
            report.version,
            SCHEMA_VERSION
        )));
    }

    debug!("Report loaded: generated {}", report.generated_at);

    Ok(report)
}
