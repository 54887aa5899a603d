//! Bandwidth-exceedance correction of cycle counts.
//!
//! When a run needs more on-chip or off-chip bandwidth than the modelled
//! hardware provides, its bandwidth-driven cycle count is stretched by the
//! excess ratio. The named phase counters are stretched with it and must
//! still add up to the total: every phase but the last is scaled and rounded
//! half to even, the last phase takes the remainder.
//!
//! The on-chip correction runs first; the off-chip check then uses the
//! possibly updated cycle count.

use super::merge::count_value;
use super::traffic::{global_mut_of, global_of, require_metric};
use crate::keys;
use crate::parser::schema::{Experiment, StatRecord, StatValue};
use crate::tools::is_viser;
use crate::utils::config::HardwareConfig;
use crate::utils::error::AggregateError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

const VISER_PHASES: &[&str] = &[
    keys::VISER_REG_EXEC_BW_CYCLES,
    keys::VISER_PRE_COMMIT_BW_CYCLES,
    keys::VISER_READ_VALIDATION_BW_CYCLES,
    keys::VISER_POST_COMMIT_BW_CYCLES,
];

const MESI_PHASES: &[&str] = &[keys::MESI_COHERENCE_EXEC_CYCLES, keys::MESI_MEM_EXEC_CYCLES];

/// Which ceiling was exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Link {
    OnChip,
    OffChip,
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::OnChip => f.write_str("on-chip"),
            Link::OffChip => f.write_str("off-chip"),
        }
    }
}

/// One applied cycle correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub bench: String,
    pub trial: String,
    pub workload: String,
    pub tool: String,
    pub link: Link,
    /// Required bandwidth divided by the ceiling
    pub factor: f64,
    pub old_cycles: i64,
    pub new_cycles: i64,
}

/// Phase counters of a configuration, remainder phase last
pub fn phase_keys(tool: &str) -> &'static [&'static str] {
    if is_viser(tool) {
        VISER_PHASES
    } else {
        MESI_PHASES
    }
}

/// Stretch the cycle count and its phases by `factor`
///
/// **Public** - core of the correction, usable on its own
///
/// # Returns
/// `(old_cycles, new_cycles)`
///
/// # Errors
/// * `AggregateError::InvalidScaleFactor` - factor is not a positive finite number
/// * `AggregateError::InvalidCycleCount` - total or a phase is not a whole number
/// * `AggregateError::PhaseSumMismatch` - phases do not add up to the total
///   before scaling
/// * `AggregateError::MissingMetric` - total or a phase counter is absent
pub fn scale_cycles(
    experiment: &mut Experiment,
    factor: f64,
) -> Result<(i64, i64), AggregateError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(AggregateError::InvalidScaleFactor {
            factor,
            bench: experiment.bench.clone(),
            tool: experiment.tool.clone(),
        });
    }

    let phase_names = phase_keys(&experiment.tool);

    let global = global_of(experiment)?;
    let total = require_count(global, keys::BANDWIDTH_CYCLE_COUNT, experiment)?;
    let phases = phase_names
        .iter()
        .map(|key| require_count(global, key, experiment))
        .collect::<Result<Vec<i64>, _>>()?;

    check_phase_sum(&experiment.tool, &phases, total)?;

    let new_total = (factor * total as f64).round_ties_even() as i64;
    let mut scaled: Vec<i64> = phases[..phases.len() - 1]
        .iter()
        .map(|&p| (p as f64 * factor).round_ties_even() as i64)
        .collect();
    let remainder = new_total - scaled.iter().sum::<i64>();
    scaled.push(remainder);

    check_phase_sum(&experiment.tool, &scaled, new_total)?;

    let global = global_mut_of(experiment)?;
    for (key, value) in phase_names.iter().zip(&scaled) {
        global.insert(key.to_string(), StatValue::Int(*value));
    }
    global.insert(
        keys::BANDWIDTH_CYCLE_COUNT.to_string(),
        count_value(new_total as f64),
    );

    debug!(
        "{} {}: phases {:?} -> {:?}",
        experiment.bench, experiment.tool, phases, scaled
    );

    Ok((total, new_total))
}

/// **Private** - a cycle counter holding a whole number
fn require_count(
    record: &StatRecord,
    key: &str,
    experiment: &Experiment,
) -> Result<i64, AggregateError> {
    let value = require_metric(record, key, experiment)?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(AggregateError::InvalidCycleCount {
            key: key.to_string(),
            value,
            bench: experiment.bench.clone(),
            tool: experiment.tool.clone(),
        });
    }
    Ok(value as i64)
}

/// **Private** - phases must add up exactly to the total
fn check_phase_sum(tool: &str, phases: &[i64], total: i64) -> Result<(), AggregateError> {
    let sum: i64 = phases.iter().sum();
    if sum != total {
        return Err(AggregateError::PhaseSumMismatch {
            tool: tool.to_string(),
            phases: sum,
            total,
        });
    }
    Ok(())
}

/// Apply on-chip then off-chip correction to one experiment
///
/// **Public** - main entry point for bandwidth correction
///
/// Needs both bandwidth figures in the global record.
///
/// # Returns
/// The corrections applied (zero, one or two)
///
/// # Errors
/// * `AggregateError::InvalidScaleFactor` - a recorded bandwidth is not finite
pub fn correct_bandwidth(
    experiment: &mut Experiment,
    hw: &HardwareConfig,
) -> Result<Vec<Adjustment>, AggregateError> {
    let global = global_of(experiment)?;
    let onchip = require_metric(global, keys::SUM_REQD_ONCHIP_BW, experiment)?;
    let offchip = require_metric(global, keys::SUM_REQD_OFFCHIP_BW, experiment)?;

    if onchip > hw.onchip_bw_gb || offchip > hw.offchip_bw_gb {
        warn!(
            "Benchmark: {} Tool: {} OnChipBW: {:.3} OffChipBW: {:.3}",
            experiment.bench, experiment.tool, onchip, offchip
        );
    }

    let mut adjustments = Vec::new();
    for (link, required, ceiling) in [
        (Link::OnChip, onchip, hw.onchip_bw_gb),
        (Link::OffChip, offchip, hw.offchip_bw_gb),
    ] {
        if required <= ceiling {
            continue;
        }

        let factor = required / ceiling;
        let (old_cycles, new_cycles) = scale_cycles(experiment, factor)?;
        warn!(
            "Scaling cycles for [{}, {}] by {:.4} because {} bandwidth exceeds available limit ({} -> {})",
            experiment.bench, experiment.tool, factor, link, old_cycles, new_cycles
        );

        adjustments.push(Adjustment {
            bench: experiment.bench.clone(),
            trial: experiment.trial.clone(),
            workload: experiment.workload.clone(),
            tool: experiment.tool.clone(),
            link,
            factor,
            old_cycles,
            new_cycles,
        });
    }

    Ok(adjustments)
}
