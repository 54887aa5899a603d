//! Pintool stats parser.
//!
//! The frontend writes one `<label>: <count>` line per counter, e.g.
//! `total events: 123456`. Labels are mapped to record keys through
//! `keys::PINTOOL_LABELS`; anything else in the file is ignored.

use super::schema::{StatRecord, StatValue};
use crate::keys::pintool_key;
use crate::utils::error::ParseError;
use log::debug;
use std::fs;
use std::path::Path;

/// Parse a pintool stats file into `record`
///
/// **Public** - main entry point for frontend output
///
/// # Errors
/// * `ParseError::Io` - file cannot be read
/// * `ParseError::MalformedLine` - a known label carries a non-numeric value
pub fn parse_pintool_stats(
    path: impl AsRef<Path>,
    record: &mut StatRecord,
) -> Result<(), ParseError> {
    let path = path.as_ref();
    debug!("Parsing pintool stats: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    for (idx, raw) in contents.lines().enumerate() {
        let Some((label, value)) = raw.split_once(':') else {
            continue;
        };

        let label = label.trim().to_lowercase();
        let Some(key) = pintool_key(&label) else {
            debug!("Ignoring pintool label '{}'", label);
            continue;
        };

        let value = parse_count(value.trim()).ok_or_else(|| ParseError::MalformedLine {
            path: path.to_path_buf(),
            line_no: idx + 1,
            line: raw.trim().to_string(),
            reason: format!("'{}' is not a number", value.trim()),
        })?;

        record.insert(key.to_string(), value);
    }

    Ok(())
}

/// **Private** - integer first, then float
fn parse_count(text: &str) -> Option<StatValue> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(StatValue::Int(i));
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(StatValue::Float)
}
