//! McPAT report parser.
//!
//! Only a handful of figures are taken from a report: processor area,
//! leakage (static) power and runtime dynamic power, plus the same power
//! figures for the AIM cache in configurations that model one. The value
//! of a matching line is its second-to-last whitespace token
//! (`Runtime Dynamic = 3.21 W` → 3.21).

use crate::utils::error::ParseError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const AREA_LABEL: &str = "Area";
const STATIC_LABEL: &str = "Subthreshold Leakage with power gating";
const DYNAMIC_LABEL: &str = "Runtime Dynamic";
const TERSE_END: &str = "Total Cores";
const PROCESSOR_HEADER: &str = "Processor:";
const L3_MARKER: &str = "L3";

/// The AIM cache is the third L3-named block in a detailed report
const AIM_L3_ORDINAL: usize = 3;

/// Power figures read from one report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpatReport {
    /// mm^2
    pub area: f64,

    /// W
    pub static_power: f64,

    /// W
    pub dynamic_power: f64,

    /// AIM cache power, detailed reports only
    pub aim: Option<AimPower>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimPower {
    pub static_power: f64,
    pub dynamic_power: f64,
}

#[derive(Default)]
struct PowerFields {
    area: Option<f64>,
    static_power: Option<f64>,
    dynamic_power: Option<f64>,
}

impl PowerFields {
    fn finish(self, path: &Path) -> Result<(f64, f64, f64), ParseError> {
        let missing = |what: &str| ParseError::InvalidReport {
            path: path.to_path_buf(),
            reason: format!("no {} figure", what),
        };
        Ok((
            self.area.ok_or_else(|| missing(AREA_LABEL))?,
            self.static_power.ok_or_else(|| missing(STATIC_LABEL))?,
            self.dynamic_power.ok_or_else(|| missing(DYNAMIC_LABEL))?,
        ))
    }
}

/// Parse the processor summary at the top of a report
///
/// **Public** - used for configurations without an AIM cache
///
/// Reads lines until the `Total Cores` block; the last match of each label
/// wins.
///
/// # Errors
/// * `ParseError::Io` - file cannot be read
/// * `ParseError::InvalidReport` - a figure is missing or unparsable
pub fn parse_terse(path: impl AsRef<Path>) -> Result<McpatReport, ParseError> {
    let path = path.as_ref();
    let contents = read_report(path)?;
    let mut fields = PowerFields::default();

    for line in contents.lines() {
        if line.contains(TERSE_END) {
            break;
        }
        if line.contains(AREA_LABEL) {
            fields.area = Some(line_value(path, line)?);
        } else if line.contains(STATIC_LABEL) {
            fields.static_power = Some(line_value(path, line)?);
        } else if line.contains(DYNAMIC_LABEL) {
            fields.dynamic_power = Some(line_value(path, line)?);
        }
    }

    let (area, static_power, dynamic_power) = fields.finish(path)?;
    debug!(
        "McPAT terse {}: area {} static {} dynamic {}",
        path.display(),
        area,
        static_power,
        dynamic_power
    );

    Ok(McpatReport {
        area,
        static_power,
        dynamic_power,
        aim: None,
    })
}

/// Parse processor and AIM figures from a full report
///
/// **Public** - used for Viser and CE-with-AIM configurations
///
/// Processor figures come from the `Processor:` section, which ends at the
/// next line containing a colon. AIM figures come from the third block whose
/// heading mentions `L3`. A report has three such blocks, or four for
/// 32-core ideal-AIM configurations.
///
/// # Errors
/// * `ParseError::Io` - file cannot be read
/// * `ParseError::InvalidReport` - wrong number of L3 blocks or a missing figure
pub fn parse_detailed(path: impl AsRef<Path>) -> Result<McpatReport, ParseError> {
    let path = path.as_ref();
    let contents = read_report(path)?;

    let mut processor = PowerFields::default();
    let mut aim_static = None;
    let mut aim_dynamic = None;
    let mut in_processor = false;
    let mut in_aim = false;
    let mut l3_blocks = 0usize;

    for raw in contents.lines() {
        let line = raw.trim();

        if line == PROCESSOR_HEADER {
            in_processor = true;
            continue;
        } else if line.contains(':') {
            in_processor = false;
        }

        if line.contains(L3_MARKER) {
            l3_blocks += 1;
            if l3_blocks == AIM_L3_ORDINAL {
                in_aim = true;
            }
        }

        if in_aim && line.contains(DYNAMIC_LABEL) {
            aim_dynamic = Some(line_value(path, line)?);
        } else if in_aim && line.contains(STATIC_LABEL) {
            aim_static = Some(line_value(path, line)?);
        }

        if in_processor && line.contains(AREA_LABEL) {
            processor.area = Some(line_value(path, line)?);
        } else if in_processor && line.contains(STATIC_LABEL) {
            processor.static_power = Some(line_value(path, line)?);
        } else if in_processor && line.contains(DYNAMIC_LABEL) {
            processor.dynamic_power = Some(line_value(path, line)?);
        }
    }

    let expected = expected_l3_blocks(path);
    if l3_blocks != expected {
        return Err(ParseError::InvalidReport {
            path: path.to_path_buf(),
            reason: format!("found {} L3 blocks, expected {}", l3_blocks, expected),
        });
    }

    let (area, static_power, dynamic_power) = processor.finish(path)?;
    let aim = match (aim_static, aim_dynamic) {
        (Some(static_power), Some(dynamic_power)) => AimPower {
            static_power,
            dynamic_power,
        },
        _ => {
            return Err(ParseError::InvalidReport {
                path: path.to_path_buf(),
                reason: "no AIM power figures".to_string(),
            })
        }
    };

    Ok(McpatReport {
        area,
        static_power,
        dynamic_power,
        aim: Some(aim),
    })
}

/// **Private** - ideal-AIM reports at 32 cores carry an extra L3 block
fn expected_l3_blocks(path: &Path) -> usize {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name.contains("idealaim") && name.contains("32") {
        4
    } else {
        3
    }
}

/// **Private** - internal helper
fn read_report(path: &Path) -> Result<String, ParseError> {
    fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// **Private** - second-to-last token of a line as a float
fn line_value(path: &Path, line: &str) -> Result<f64, ParseError> {
    line.split_whitespace()
        .rev()
        .nth(1)
        .and_then(|token| token.parse::<f64>().ok())
        .ok_or_else(|| ParseError::InvalidReport {
            path: path.to_path_buf(),
            reason: format!("cannot read value from '{}'", line.trim()),
        })
}
