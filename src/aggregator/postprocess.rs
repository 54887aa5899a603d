//! Derived-metric pass over a collected result set.
//!
//! Simulator experiments get their memory traffic, off-chip bandwidth and
//! bandwidth-corrected cycle counts. Pintool experiments pass through.

use super::bandwidth::{correct_bandwidth, Adjustment};
use super::traffic::{apply_memory_traffic, record_offchip_bandwidth};
use crate::parser::schema::Experiment;
use crate::tools::is_pintool;
use crate::utils::config::HardwareConfig;
use crate::utils::error::AggregateError;
use log::{debug, info};

/// Compute derived metrics for every simulator experiment in place
///
/// **Public** - runs after collection, before tabulation
///
/// # Arguments
/// * `experiments` - Collected result set, on-chip bandwidth already recorded
/// * `hw` - Hardware parameters
///
/// # Returns
/// Every cycle correction applied, in result-set order
///
/// # Errors
/// The first failing experiment aborts the pass.
pub fn post_process(
    experiments: &mut [Experiment],
    hw: &HardwareConfig,
) -> Result<Vec<Adjustment>, AggregateError> {
    let mut adjustments = Vec::new();

    for experiment in experiments.iter_mut().filter(|e| !is_pintool(&e.tool)) {
        let traffic = apply_memory_traffic(experiment, hw)?;
        let offchip = record_offchip_bandwidth(experiment, hw)?;
        debug!(
            "{} {} trial {}: {} memory accesses, {:.3} GB/s off-chip",
            experiment.bench,
            experiment.tool,
            experiment.trial,
            traffic.accesses(),
            offchip
        );

        adjustments.extend(correct_bandwidth(experiment, hw)?);
    }

    if !adjustments.is_empty() {
        info!("Bandwidth correction applied {} time(s)", adjustments.len());
    }

    Ok(adjustments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use crate::parser::schema::{StatRecord, StatValue};
    use crate::utils::config::GLOBAL_CPUID;

    fn mesi_run(cycles: i64) -> Experiment {
        let mut exp = Experiment::new("canneal", 1, "simsmall", "mesi8");
        let global: StatRecord = [
            (keys::L3_READ_MISSES, 1000),
            (keys::L3_WRITE_MISSES, 0),
            (keys::L3_DIRTY_LINE_EVICTIONS, 0),
            (keys::BANDWIDTH_CYCLE_COUNT, cycles),
            (keys::MESI_COHERENCE_EXEC_CYCLES, cycles / 2),
            (keys::MESI_MEM_EXEC_CYCLES, cycles - cycles / 2),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), StatValue::Int(*v)))
        .chain([(keys::SUM_REQD_ONCHIP_BW.to_string(), StatValue::Float(1.0))])
        .collect();
        exp.cores.insert(GLOBAL_CPUID, global);
        exp
    }

    #[test]
    fn test_pintool_untouched() {
        let mut exp = Experiment::new("canneal", 1, "simsmall", "pintool");
        exp.cores.insert(GLOBAL_CPUID, StatRecord::new());
        let mut set = vec![exp.clone()];

        let adjustments = post_process(&mut set, &HardwareConfig::default()).unwrap();

        assert!(adjustments.is_empty());
        assert_eq!(set[0], exp);
    }

    #[test]
    fn test_offchip_excess_is_corrected() {
        // 64000 bytes in 1 cycle at 1.6 GHz is far above 48 GB/s
        let mut set = vec![mesi_run(1), mesi_run(1_000_000_000)];

        let adjustments = post_process(&mut set, &HardwareConfig::default()).unwrap();

        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].old_cycles, 1);
        let global = set[0].global().unwrap();
        assert!(global[keys::SUM_REQD_OFFCHIP_BW].as_f64().unwrap() > 48.0);
        assert_eq!(
            global[keys::BANDWIDTH_CYCLE_COUNT],
            StatValue::Int(adjustments[0].new_cycles)
        );
        assert_eq!(global[keys::MEM_64BYTES_READS], StatValue::Int(1000));
    }

    #[test]
    fn test_zero_cycle_run_aborts() {
        let mut set = vec![mesi_run(1_000_000_000), mesi_run(0)];

        assert!(matches!(
            post_process(&mut set, &HardwareConfig::default()),
            Err(AggregateError::InvalidCycleCount { .. })
        ));
        assert!(!set[1]
            .global()
            .unwrap()
            .contains_key(keys::SUM_REQD_OFFCHIP_BW));
    }

    #[test]
    fn test_unknown_config_aborts() {
        let mut exp = mesi_run(100);
        exp.tool = "rccsi8".to_string();

        assert!(matches!(
            post_process(&mut [exp], &HardwareConfig::default()),
            Err(AggregateError::UnknownConfig(_))
        ));
    }
}
