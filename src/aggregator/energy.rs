//! Energy aggregation from McPAT power figures.
//!
//! Energy is power × cycles / clock frequency, with cycles merged over the
//! trials of one (bench, workload, tool). Bloom-filter energy comes from the
//! simulator itself; the McPAT totals already include the AIM cache, so AIM
//! energies are reported but not added to the total.

use super::merge::merge_value;
use super::result_set::{dict_filter, inflate};
use crate::keys;
use crate::parser::mcpat::{parse_detailed, parse_terse, McpatReport};
use crate::parser::schema::{probe, StatRecord, StatValue};
use crate::tools::{is_ce_with_aim, is_viser, only_ce_without_aim};
use crate::utils::config::{HardwareConfig, MCPAT_SUFFIX};
use crate::utils::error::{AggregateError, ParseError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Energy figures for one (bench, workload, tool)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyStats {
    pub bench: String,
    pub workload: String,
    pub tool: String,

    pub area: f64,
    pub static_power: f64,
    pub dynamic_power: f64,
    pub aim_static_power: f64,
    pub aim_dynamic_power: f64,

    /// Trial-merged bandwidth-driven cycles
    pub cycles: f64,

    /// Joules
    pub static_energy: f64,
    pub dynamic_energy: f64,
    pub bloom_filter_energy: f64,
    pub aim_static_energy: f64,
    pub aim_dynamic_energy: f64,
    pub total_energy: f64,
}

impl EnergyStats {
    /// Flatten into a stat record for tabulation
    pub fn to_record(&self) -> StatRecord {
        let mut record = probe(&[
            (keys::BENCH, self.bench.as_str()),
            (keys::WORKLOAD, self.workload.as_str()),
            (keys::TOOL, self.tool.as_str()),
        ]);

        let figures = [
            (keys::AREA, self.area),
            (keys::STATIC_POWER, self.static_power),
            (keys::DYNAMIC_POWER, self.dynamic_power),
            (keys::AIM_STATIC_POWER, self.aim_static_power),
            (keys::AIM_DYNAMIC_POWER, self.aim_dynamic_power),
            (keys::BANDWIDTH_CYCLE_COUNT, self.cycles),
            (keys::STATIC_ENERGY, self.static_energy),
            (keys::DYNAMIC_ENERGY, self.dynamic_energy),
            (keys::BLOOM_FILTER_ENERGY, self.bloom_filter_energy),
            (keys::AIM_STATIC_ENERGY, self.aim_static_energy),
            (keys::AIM_DYNAMIC_ENERGY, self.aim_dynamic_energy),
            (keys::TOTAL_ENERGY, self.total_energy),
        ];
        for (key, value) in figures {
            record.insert(key.to_string(), StatValue::Float(value));
        }
        record
    }
}

/// McPAT output file name of one run
pub fn mcpat_file_name(bench: &str, tool: &str, workload: &str) -> String {
    format!("{}-{}-{}.{}", bench, tool, workload, MCPAT_SUFFIX)
}

/// Parse the McPAT report of a tool
///
/// **Public** - picks the detailed parse for configurations with an AIM
/// cache (Viser, CE with AIM) and the terse parse for everything else
pub fn load_report(tool: &str, path: impl AsRef<Path>) -> Result<McpatReport, ParseError> {
    if is_viser(tool) || is_ce_with_aim(tool) {
        parse_detailed(path)
    } else {
        parse_terse(path)
    }
}

/// Joules consumed at `power` watts over `cycles`
pub fn energy(power: f64, cycles: f64, clk_frequency: f64) -> f64 {
    power * cycles / clk_frequency
}

/// Combine a McPAT report with the collected records of one configuration
///
/// **Public** - main entry point for energy aggregation
///
/// # Arguments
/// * `records` - Flattened simulator records of the whole run
/// * `(bench, workload, tool)` - Configuration to aggregate
/// * `tools` - Every tool of the run; bloom-filter energy is skipped when
///   all of them are MESI or CE-without-AIM configurations
/// * `report` - Parsed McPAT report for the configuration
/// * `hw` - Clock frequency and AIM accounting mode
///
/// # Errors
/// * `AggregateError::EmptySelection` - no record matches the configuration
/// * `AggregateError::NoData` - no trial reports cycles
pub fn energy_for<S: AsRef<str>>(
    records: &[StatRecord],
    (bench, workload, tool): (&str, &str, &str),
    tools: &[S],
    report: &McpatReport,
    hw: &HardwareConfig,
) -> Result<EnergyStats, AggregateError> {
    let selection = probe(&[
        (keys::BENCH, bench),
        (keys::WORKLOAD, workload),
        (keys::TOOL, tool),
    ]);
    let mut trials = dict_filter(records, &selection);
    if trials.is_empty() {
        return Err(AggregateError::EmptySelection {
            bench: bench.to_string(),
            workload: workload.to_string(),
            tool: tool.to_string(),
            key: keys::BANDWIDTH_CYCLE_COUNT.to_string(),
        });
    }

    let cycles = merge_value(&trials, keys::BANDWIDTH_CYCLE_COUNT)?;

    let bloom_filter_energy = if only_ce_without_aim(tools) {
        0.0
    } else {
        let bloom_key = keys::BLOOM_FILTER_TOTAL_ENERGY.to_string();
        inflate(&mut trials, [&bloom_key]);
        merge_value(&trials, &bloom_key)?
    };

    let clk = hw.clk_frequency;
    let (aim_static_power, aim_dynamic_power) = match report.aim {
        Some(aim) if hw.add_aim_mcpat => (aim.static_power, aim.dynamic_power),
        _ => (0.0, 0.0),
    };

    let static_energy = energy(report.static_power, cycles, clk);
    let dynamic_energy = energy(report.dynamic_power, cycles, clk);
    let stats = EnergyStats {
        bench: bench.to_string(),
        workload: workload.to_string(),
        tool: tool.to_string(),
        area: report.area,
        static_power: report.static_power,
        dynamic_power: report.dynamic_power,
        aim_static_power,
        aim_dynamic_power,
        cycles,
        static_energy,
        dynamic_energy,
        bloom_filter_energy,
        aim_static_energy: energy(aim_static_power, cycles, clk),
        aim_dynamic_energy: energy(aim_dynamic_power, cycles, clk),
        total_energy: static_energy + dynamic_energy + bloom_filter_energy,
    };

    debug!(
        "Energy {} {} {}: {:.6} J over {} cycles",
        bench, workload, tool, stats.total_energy, cycles
    );

    Ok(stats)
}
