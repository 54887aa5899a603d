//! Backend simulator stats parser.
//!
//! Reads a `<tool>-stats.py` file into a per-core partition. Lines starting
//! with `#` (histogram descriptions) and blank lines are skipped. The
//! `cpuid` field of each line selects the destination core; lines without
//! it belong to the global record.

use super::literal::decode_line;
use super::schema::{CorePartition, StatValue};
use crate::keys::CPUID;
use crate::utils::config::{GLOBAL_CPUID, MAX_CORES};
use crate::utils::error::ParseError;
use log::debug;
use std::fs;
use std::path::Path;

/// Parse a backend stats file into `store`
///
/// **Public** - main entry point for simulator output
///
/// Fields of a line are merged into the existing record for its core:
/// existing keys are overwritten, new keys are added.
///
/// # Arguments
/// * `path` - Stats file to read
/// * `store` - Accumulator, keyed by core id
///
/// # Errors
/// * `ParseError::Io` - file cannot be read
/// * `ParseError::MalformedLine` - a line is not a flat mapping or has a non-integer `cpuid`
/// * `ParseError::CoreIdOutOfRange` - `cpuid` outside [-1, 32)
pub fn parse_stats(path: impl AsRef<Path>, store: &mut CorePartition) -> Result<(), ParseError> {
    let path = path.as_ref();
    debug!("Parsing simulator stats: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lines_read = 0usize;
    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let malformed = |reason: String| ParseError::MalformedLine {
            path: path.to_path_buf(),
            line_no: idx + 1,
            line: line.to_string(),
            reason,
        };

        let record = decode_line(line).map_err(|e| malformed(e.to_string()))?;

        let cpuid = match record.get(CPUID) {
            None => GLOBAL_CPUID as i64,
            Some(StatValue::Int(id)) => *id,
            Some(other) => {
                return Err(malformed(format!("cpuid must be an integer, found {}", other)))
            }
        };

        if cpuid < GLOBAL_CPUID as i64 || cpuid >= MAX_CORES as i64 {
            return Err(ParseError::CoreIdOutOfRange {
                path: path.to_path_buf(),
                line_no: idx + 1,
                line: line.to_string(),
                cpuid,
            });
        }

        store.entry(cpuid as i32).or_default().extend(record);
        lines_read += 1;
    }

    debug!(
        "Read {} stat lines covering {} cores from {}",
        lines_read,
        store.len(),
        path.display()
    );

    Ok(())
}
