//! Off-chip memory traffic estimation and bandwidth figures.
//!
//! The simulators count cache events but not memory transfers, so the number
//! of 64-byte memory reads and writes is reconstructed from LLC and AIM (or
//! L2) counters. How metadata travels differs by configuration:
//! - Viser: AIM lines move separately, each spanning ceil(aim / 64) transfers
//! - Viser ideal AIM: data and AIM share a line of ceil((aim + 64) / 64) transfers
//! - CE with AIM: as Viser, with the CE AIM line size
//! - CE without AIM: L2 misses/evictions carry the metadata
//! - MESI: data lines only

use super::merge::count_value;
use crate::keys;
use crate::parser::schema::{Experiment, StatRecord, StatValue};
use crate::tools::{memory_model, MemoryModel};
use crate::utils::config::{HardwareConfig, BYTES_PER_GB};
use crate::utils::error::AggregateError;
use log::debug;

/// Estimated 64-byte memory transfers of one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryTraffic {
    pub reads: f64,
    pub writes: f64,
}

impl MemoryTraffic {
    pub fn accesses(&self) -> f64 {
        self.reads + self.writes
    }
}

/// Numeric value of a required metric
///
/// **Public** - shared by the derived-metric stages
///
/// # Errors
/// * `AggregateError::MissingMetric` - key absent
/// * `AggregateError::NotNumeric` - key holds a string
pub fn require_metric(
    record: &StatRecord,
    key: &str,
    experiment: &Experiment,
) -> Result<f64, AggregateError> {
    let value = record
        .get(key)
        .ok_or_else(|| AggregateError::MissingMetric {
            key: key.to_string(),
            bench: experiment.bench.clone(),
            tool: experiment.tool.clone(),
        })?;
    value.as_f64().ok_or_else(|| AggregateError::NotNumeric {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Global record of an experiment
///
/// # Errors
/// * `AggregateError::MissingGlobal` - no sentinel-core record
pub fn global_of(experiment: &Experiment) -> Result<&StatRecord, AggregateError> {
    experiment.global().ok_or_else(|| AggregateError::MissingGlobal {
        bench: experiment.bench.clone(),
        tool: experiment.tool.clone(),
    })
}

/// **Private** - ceil(bytes / line); `line` is non-zero in a validated config
fn lines_spanned(bytes: u64, line: u64) -> f64 {
    bytes.div_ceil(line) as f64
}

/// Estimate memory transfers for a simulator experiment
///
/// **Public** - main entry point for traffic estimation
///
/// # Errors
/// * `AggregateError::UnknownConfig` - tool has no traffic model
/// * `AggregateError::UnhandledCoreCount` - AIM configuration without a core count
/// * `AggregateError::MissingMetric` - a required counter is absent
pub fn estimate_memory_traffic(
    experiment: &Experiment,
    hw: &HardwareConfig,
) -> Result<MemoryTraffic, AggregateError> {
    let model = memory_model(&experiment.tool)?;
    let global = global_of(experiment)?;
    let get = |key: &str| require_metric(global, key, experiment);

    let llc_misses = get(keys::L3_READ_MISSES)? + get(keys::L3_WRITE_MISSES)?;
    let line = hw.data_line_size;

    let traffic = match model {
        MemoryModel::Viser {
            aim_line_bytes,
            ideal_aim: true,
        } => {
            let combined = lines_spanned(aim_line_bytes + line, line);
            MemoryTraffic {
                reads: llc_misses * combined,
                writes: get(keys::L3_LINE_EVICTIONS)? * combined,
            }
        }
        MemoryModel::Viser { aim_line_bytes, .. } | MemoryModel::CeWithAim { aim_line_bytes } => {
            let aim_lines = lines_spanned(aim_line_bytes, line);
            let aim_misses = get(keys::AIM_READ_MISSES)? + get(keys::AIM_WRITE_MISSES)?;
            MemoryTraffic {
                reads: llc_misses + aim_misses * aim_lines,
                writes: get(keys::L3_DIRTY_LINE_EVICTIONS)?
                    + get(keys::AIM_LINE_EVICTIONS)? * aim_lines,
            }
        }
        MemoryModel::CeWithoutAim { aim_line_bytes } => {
            let aim_lines = lines_spanned(aim_line_bytes, line);
            let l2_misses = get(keys::L2_READ_MISSES)? + get(keys::L2_WRITE_MISSES)?;
            MemoryTraffic {
                reads: llc_misses + l2_misses * aim_lines,
                writes: get(keys::L3_DIRTY_LINE_EVICTIONS)?
                    + get(keys::L2_LINE_EVICTIONS)? * aim_lines,
            }
        }
        MemoryModel::Mesi => MemoryTraffic {
            reads: llc_misses,
            writes: get(keys::L3_DIRTY_LINE_EVICTIONS)?,
        },
    };

    debug!(
        "{} {}: {:?} -> {} memory reads, {} writes",
        experiment.bench, experiment.tool, model, traffic.reads, traffic.writes
    );

    Ok(traffic)
}

/// Estimate memory transfers and store them in the global record
///
/// Writes `g_Memory64BytesReads`, `g_Memory64BytesWrites` and
/// `g_Memory64BytesAccesses`.
pub fn apply_memory_traffic(
    experiment: &mut Experiment,
    hw: &HardwareConfig,
) -> Result<MemoryTraffic, AggregateError> {
    let traffic = estimate_memory_traffic(experiment, hw)?;
    let global = global_mut_of(experiment)?;
    global.insert(keys::MEM_64BYTES_READS.to_string(), count_value(traffic.reads));
    global.insert(keys::MEM_64BYTES_WRITES.to_string(), count_value(traffic.writes));
    global.insert(
        keys::MEM_64BYTES_ACCESSES.to_string(),
        count_value(traffic.accesses()),
    );
    Ok(traffic)
}

/// Bandwidth in GB/s (GB = 2^30 bytes) needed to move `bytes` in `cycles`
pub fn bandwidth_gb(bytes: f64, cycles: f64, clk_frequency: f64) -> f64 {
    let seconds = cycles / clk_frequency;
    bytes / (seconds * BYTES_PER_GB)
}

/// Bandwidth-driven cycle count, which bandwidth figures divide by
///
/// # Errors
/// * `AggregateError::InvalidCycleCount` - count is zero, negative or not finite
pub fn require_cycles(record: &StatRecord, experiment: &Experiment) -> Result<f64, AggregateError> {
    let cycles = require_metric(record, keys::BANDWIDTH_CYCLE_COUNT, experiment)?;
    if !cycles.is_finite() || cycles <= 0.0 {
        return Err(AggregateError::InvalidCycleCount {
            key: keys::BANDWIDTH_CYCLE_COUNT.to_string(),
            value: cycles,
            bench: experiment.bench.clone(),
            tool: experiment.tool.clone(),
        });
    }
    Ok(cycles)
}

/// Compute and store the on-chip bandwidth of an experiment
///
/// Uses the 16-byte flit count of the on-chip network.
///
/// # Errors
/// * `AggregateError::InvalidCycleCount` - no positive cycle count to divide by
pub fn record_onchip_bandwidth(
    experiment: &mut Experiment,
    hw: &HardwareConfig,
) -> Result<f64, AggregateError> {
    let global = global_of(experiment)?;
    let flits = require_metric(global, keys::ONCHIP_NETWORK_16BYTES_FLITS, experiment)?;
    let cycles = require_cycles(global, experiment)?;
    let bw = bandwidth_gb(flits * hw.flit_bytes as f64, cycles, hw.clk_frequency);

    global_mut_of(experiment)?.insert(keys::SUM_REQD_ONCHIP_BW.to_string(), StatValue::Float(bw));
    Ok(bw)
}

/// Compute and store the off-chip bandwidth of an experiment
///
/// Needs the memory accesses written by [`apply_memory_traffic`].
///
/// # Errors
/// * `AggregateError::InvalidCycleCount` - no positive cycle count to divide by
pub fn record_offchip_bandwidth(
    experiment: &mut Experiment,
    hw: &HardwareConfig,
) -> Result<f64, AggregateError> {
    let global = global_of(experiment)?;
    let accesses = require_metric(global, keys::MEM_64BYTES_ACCESSES, experiment)?;
    let cycles = require_cycles(global, experiment)?;
    let bw = bandwidth_gb(accesses * hw.mem_flit_bytes as f64, cycles, hw.clk_frequency);

    global_mut_of(experiment)?.insert(keys::SUM_REQD_OFFCHIP_BW.to_string(), StatValue::Float(bw));
    Ok(bw)
}

/// Mutable global record
pub(crate) fn global_mut_of(experiment: &mut Experiment) -> Result<&mut StatRecord, AggregateError> {
    let (bench, tool) = (experiment.bench.clone(), experiment.tool.clone());
    experiment
        .global_mut()
        .ok_or(AggregateError::MissingGlobal { bench, tool })
}
