//! Classification of tool configuration names.
//!
//! Configurations are named `<tool><cores>-<options>` (e.g. `viser8-idealaim`,
//! `ce16-32Kaim`, `mesi4`). Every decision about which formulas apply to an
//! experiment is taken from the name alone, because a single run may mix
//! configurations with different core counts.

use crate::utils::config::{PINTOOL, PINTOOL_STATS_SUFFIX, SIM_STATS_SUFFIX};
use crate::utils::error::AggregateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Backend simulator families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SimulatorFamily {
    Mesi,
    Viser,
    RccSi,
    Pause,
}

impl SimulatorFamily {
    pub const ALL: [SimulatorFamily; 4] = [
        SimulatorFamily::Mesi,
        SimulatorFamily::Viser,
        SimulatorFamily::RccSi,
        SimulatorFamily::Pause,
    ];

    /// Position in per-family tables
    pub fn index(self) -> usize {
        match self {
            SimulatorFamily::Mesi => 0,
            SimulatorFamily::Viser => 1,
            SimulatorFamily::RccSi => 2,
            SimulatorFamily::Pause => 3,
        }
    }
}

impl fmt::Display for SimulatorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimulatorFamily::Mesi => "MESI",
            SimulatorFamily::Viser => "Viser",
            SimulatorFamily::RccSi => "RCC-SI",
            SimulatorFamily::Pause => "Pause",
        };
        f.write_str(name)
    }
}

/// What produced a tool's statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Pintool,
    Simulator(SimulatorFamily),
    /// Configurations whose output is not aggregated here (e.g. Sniper)
    Unsupported,
}

/// Off-chip traffic accounting for a simulator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryModel {
    /// Data lines plus separate AIM metadata lines
    Viser { aim_line_bytes: u64, ideal_aim: bool },
    /// Conflict exceptions backed by an AIM cache
    CeWithAim { aim_line_bytes: u64 },
    /// Conflict exceptions with metadata spilled from the L2
    CeWithoutAim { aim_line_bytes: u64 },
    /// Data lines only
    Mesi,
}

pub fn is_pintool(tool: &str) -> bool {
    tool.contains(PINTOOL)
}

pub fn is_mesi(tool: &str) -> bool {
    tool.contains("mesi")
}

/// `viseroptregularplru` is accounted as a pause/restart configuration
pub fn is_viser(tool: &str) -> bool {
    !tool.contains("viseroptregularplru")
        && (tool.contains("viser") || tool.contains("drf0") || tool.contains("arc"))
}

pub fn is_viser_ideal_aim(tool: &str) -> bool {
    is_viser(tool) && tool.contains("idealaim")
}

pub fn is_ce(tool: &str) -> bool {
    ["ce4", "ce8", "ce16", "ce32"].iter().any(|p| tool.contains(p))
}

pub fn is_ce_with_aim(tool: &str) -> bool {
    is_ce(tool)
        && ["-8Kaim", "-16Kaim", "-32Kaim", "-64Kaim"]
            .iter()
            .any(|p| tool.contains(p))
}

pub fn is_ce_without_aim(tool: &str) -> bool {
    is_ce(tool) && !is_ce_with_aim(tool)
}

pub fn is_pause(tool: &str) -> bool {
    tool.contains("pause") || tool.contains("restart") || tool.contains("viseroptregularplru")
}

pub fn is_rccsi(tool: &str) -> bool {
    tool.contains("rccsi")
}

pub fn is_sniper(tool: &str) -> bool {
    tool.contains("sniper")
}

pub fn is_simulator(tool: &str) -> bool {
    is_mesi(tool) || is_viser(tool) || is_rccsi(tool) || is_pause(tool) || is_ce(tool)
}

/// Classify a tool name
///
/// **Public** - decides which parser reads a run directory entry
///
/// CE configurations run on the MESI simulator, so they share its family.
pub fn classify(tool: &str) -> ToolKind {
    if is_pintool(tool) {
        ToolKind::Pintool
    } else if is_mesi(tool) || is_ce(tool) {
        ToolKind::Simulator(SimulatorFamily::Mesi)
    } else if is_viser(tool) {
        ToolKind::Simulator(SimulatorFamily::Viser)
    } else if is_rccsi(tool) {
        ToolKind::Simulator(SimulatorFamily::RccSi)
    } else if is_pause(tool) {
        ToolKind::Simulator(SimulatorFamily::Pause)
    } else {
        ToolKind::Unsupported
    }
}

/// Name of the stats file a tool leaves in its run directory
pub fn stats_file_name(tool: &str) -> String {
    if is_pintool(tool) {
        format!("{}{}", tool, PINTOOL_STATS_SUFFIX)
    } else {
        format!("{}{}", tool, SIM_STATS_SUFFIX)
    }
}

/// Stats file of one run, relative to the output directory
///
/// Runs are laid out as `<workload>/<trial>/<bench>/<stats file>`.
pub fn stats_file_path(workload: &str, trial: &str, bench: &str, tool: &str) -> PathBuf {
    [workload, trial, bench, stats_file_name(tool).as_str()].iter().collect()
}

/// Families of the simulator tools in a tool list, in family order
pub fn families_present<S: AsRef<str>>(tools: &[S]) -> Vec<SimulatorFamily> {
    let mut families: Vec<SimulatorFamily> = tools
        .iter()
        .filter_map(|t| match classify(t.as_ref()) {
            ToolKind::Simulator(family) => Some(family),
            _ => None,
        })
        .collect();
    families.sort();
    families.dedup();
    families
}

/// True when no tool in the list uses an AIM cache or Viser
///
/// Pintool entries are ignored. Such runs have no bloom-filter energy.
pub fn only_ce_without_aim<S: AsRef<str>>(tools: &[S]) -> bool {
    tools
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| !is_pintool(t))
        .all(|t| !is_viser(t) && !is_ce_with_aim(t))
}

/// AIM line size in bytes for a Viser/ARC configuration
///
/// # Errors
/// * `AggregateError::UnhandledCoreCount` - name carries no known core count
pub fn arc_aim_line_size(tool: &str) -> Result<u64, AggregateError> {
    let size = if tool.contains("viser4") {
        60
    } else if tool.contains("viser8") {
        100
    } else if tool.contains("viser16") {
        172
    } else if tool.contains("viser32") {
        308
    } else {
        return Err(AggregateError::UnhandledCoreCount(tool.to_string()));
    };
    Ok(size)
}

/// AIM line size in bytes for a conflict-exception configuration
///
/// # Errors
/// * `AggregateError::UnhandledCoreCount` - name carries no known core count
pub fn ce_aim_line_size(tool: &str) -> Result<u64, AggregateError> {
    let size = if tool.contains("ce4") {
        56
    } else if tool.contains("ce8") {
        96
    } else if tool.contains("ce16") {
        168
    } else if tool.contains("ce32") {
        304
    } else {
        return Err(AggregateError::UnhandledCoreCount(tool.to_string()));
    };
    Ok(size)
}

/// Pick the off-chip traffic model for a simulator configuration
///
/// **Public** - used by memory traffic estimation
///
/// # Errors
/// * `AggregateError::UnknownConfig` - RCC-SI, pause/restart and unrecognised names
/// * `AggregateError::UnhandledCoreCount` - AIM configuration without a known core count
pub fn memory_model(tool: &str) -> Result<MemoryModel, AggregateError> {
    if is_viser(tool) {
        Ok(MemoryModel::Viser {
            aim_line_bytes: arc_aim_line_size(tool)?,
            ideal_aim: is_viser_ideal_aim(tool),
        })
    } else if is_ce_with_aim(tool) {
        Ok(MemoryModel::CeWithAim {
            aim_line_bytes: ce_aim_line_size(tool)?,
        })
    } else if is_ce_without_aim(tool) {
        Ok(MemoryModel::CeWithoutAim {
            aim_line_bytes: ce_aim_line_size(tool)?,
        })
    } else if is_mesi(tool) {
        Ok(MemoryModel::Mesi)
    } else {
        Err(AggregateError::UnknownConfig(tool.to_string()))
    }
}
