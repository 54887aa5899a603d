//! Metric key names shared by the parsers, the aggregator and the reports.
//!
//! Simulator keys use the backends' own naming (`g_` global counters,
//! `dep_` phase breakdowns, `max_`/`sum_` derived totals). Pintool keys are
//! camel-cased forms of the labels printed by the instrumentation tool.

use crate::tools::SimulatorFamily;

// Reserved metadata keys
pub const BENCH: &str = "bench";
pub const TRIAL: &str = "trial";
pub const WORKLOAD: &str = "workload";
pub const TOOL: &str = "tool";
pub const CPUID: &str = "cpuid";

pub const METADATA_KEYS: &[&str] = &[BENCH, TRIAL, WORKLOAD, TOOL];

// Cache hierarchy
pub const L1_READ_HITS: &str = "g_Data_L1ReadHits";
pub const L1_READ_MISSES: &str = "g_Data_L1ReadMisses";
pub const L1_WRITE_HITS: &str = "g_Data_L1WriteHits";
pub const L1_WRITE_MISSES: &str = "g_Data_L1WriteMisses";
pub const L1_LINE_EVICTIONS: &str = "g_Data_L1LineEvictions";
pub const L1_DIRTY_LINE_EVICTIONS: &str = "g_Data_L1DirtyLineEvictions";

pub const L2_READ_HITS: &str = "g_Data_L2ReadHits";
pub const L2_READ_MISSES: &str = "g_Data_L2ReadMisses";
pub const L2_WRITE_HITS: &str = "g_Data_L2WriteHits";
pub const L2_WRITE_MISSES: &str = "g_Data_L2WriteMisses";
pub const L2_LINE_EVICTIONS: &str = "g_Data_L2LineEvictions";
pub const L2_DIRTY_LINE_EVICTIONS: &str = "g_Data_L2DirtyLineEvictions";

pub const L3_READ_HITS: &str = "g_Data_L3ReadHits";
pub const L3_READ_MISSES: &str = "g_Data_L3ReadMisses";
pub const L3_WRITE_HITS: &str = "g_Data_L3WriteHits";
pub const L3_WRITE_MISSES: &str = "g_Data_L3WriteMisses";
pub const L3_LINE_EVICTIONS: &str = "g_Data_L3LineEvictions";
pub const L3_DIRTY_LINE_EVICTIONS: &str = "g_Data_L3DirtyLineEvictions";

pub const TOTAL_READS: &str = "g_TotalDataReads";
pub const TOTAL_WRITES: &str = "g_TotalDataWrites";
pub const TOTAL_MEMORY_ACCESSES: &str = "g_TotalMemoryAccesses";
pub const TOTAL_ATOMIC_READS: &str = "g_TotalAtomicReads";
pub const TOTAL_ATOMIC_WRITES: &str = "g_TotalAtomicWrites";
pub const TOTAL_LOCK_READS: &str = "g_TotalLockReads";
pub const TOTAL_LOCK_WRITES: &str = "g_TotalLockWrites";

pub const REGION_BOUNDARIES: &str = "g_RegionBoundaries";
pub const REGION_SIZE: &str = "AverageRegionSize";
pub const INSTRUCTIONS: &str = "Instructions";
pub const RUNNING_TIME: &str = "SimulationRunningTimeMins";
pub const MEMORY_USAGE: &str = "MemUsageGB";

/// Bandwidth-driven execution time of the whole run
pub const BANDWIDTH_CYCLE_COUNT: &str = "max_BandwidthDrivenCycleCount";

pub const ONCHIP_NETWORK_MSGS: &str = "g_OnChipNetworkMessages";
pub const ONCHIP_NETWORK_16BYTES_FLITS: &str = "g_OnChipNetworkMessageSize16BytesFlits";

// Derived during post-processing
pub const MEM_64BYTES_READS: &str = "g_Memory64BytesReads";
pub const MEM_64BYTES_WRITES: &str = "g_Memory64BytesWrites";
pub const MEM_64BYTES_ACCESSES: &str = "g_Memory64BytesAccesses";
pub const SUM_REQD_ONCHIP_BW: &str = "sum_reqdOnChipBWInGBWith16BytesFlits";
pub const SUM_REQD_OFFCHIP_BW: &str = "sum_reqdOffChipBWInGBWith64BytesFlits";

// MESI
pub const MESI_REMOTE_READ_HITS: &str = "g_MESIReadRemoteHits";
pub const MESI_REMOTE_WRITE_HITS: &str = "g_MESIWriteRemoteHits";
pub const MESI_UPGRADE_MISSES: &str = "g_MESIUpgradeMisses";
pub const MESI_MEM_EXEC_CYCLES: &str = "dep_MESIMemSystemExecDrivenCycleCount";
pub const MESI_COHERENCE_EXEC_CYCLES: &str = "dep_MESICoherenceExecDrivenCycleCount";

// Viser and the AIM metadata cache
pub const VISER_WAR_UPGRADES: &str = "g_ViserWARUpgrades";
pub const AIM_READ_HITS: &str = "g_AIMCacheReadHits";
pub const AIM_READ_MISSES: &str = "g_AIMCacheReadMisses";
pub const AIM_WRITE_HITS: &str = "g_AIMCacheWriteHits";
pub const AIM_WRITE_MISSES: &str = "g_AIMCacheWriteMisses";
pub const AIM_LINE_EVICTIONS: &str = "g_AIMCacheLineEvictions";
pub const VISER_REG_EXEC_BW_CYCLES: &str = "dep_ViserRegExecBWDrivenCycleCount";
pub const VISER_PRE_COMMIT_BW_CYCLES: &str = "dep_ViserPreCommitBWDrivenCycleCount";
pub const VISER_READ_VALIDATION_BW_CYCLES: &str = "dep_ViserReadValidationBWDrivenCycleCount";
pub const VISER_POST_COMMIT_BW_CYCLES: &str = "dep_ViserPostCommitBWDrivenCycleCount";
pub const BLOOM_FILTER_TOTAL_ENERGY: &str = "g_BloomFilterTotalEnergy";

// Pause/restart
pub const PAUSE_BW_CYCLES: &str = "dep_ViserPauseBWDrivenCycleCount";
pub const RESTART_BW_CYCLES: &str = "dep_ViserRestartBWDrivenCycleCount";
pub const WHOLE_APP_RESTARTS: &str = "g_TotalWholeAppRestarts";
pub const REGION_RESTARTS: &str = "g_TotalRegionRestarts";

// RCC-SI
pub const RCCSI_REG_EXEC_BW_CYCLES: &str = "dep_RCCSIRegExecBWDrivenCycleCount";
pub const RCCSI_PRE_COMMIT_BW_CYCLES: &str = "dep_RCCSIPreCommitBWDrivenCycleCount";
pub const RCCSI_READ_VALIDATION_BW_CYCLES: &str = "dep_RCCSIReadValidationBWDrivenCycleCount";
pub const RCCSI_STALL_BW_CYCLES: &str = "dep_RCCSIStallBWDrivenCycleCount";
pub const RCCSI_COMMIT_BW_CYCLES: &str = "dep_RCCSICommitBWDrivenCycleCount";
pub const RCCSI_POST_COMMIT_BW_CYCLES: &str = "dep_RCCSIPostCommitBWDrivenCycleCount";

// Energy report
pub const AREA: &str = "Area";
pub const STATIC_POWER: &str = "StaticPower";
pub const DYNAMIC_POWER: &str = "DynamicPower";
pub const STATIC_ENERGY: &str = "StaticEnergy";
pub const DYNAMIC_ENERGY: &str = "DynamicEnergy";
pub const BLOOM_FILTER_ENERGY: &str = "BloomFilterEnergy";
pub const AIM_STATIC_POWER: &str = "AIMStaticPower";
pub const AIM_DYNAMIC_POWER: &str = "AIMDynamicPower";
pub const AIM_STATIC_ENERGY: &str = "AIMStaticEnergy";
pub const AIM_DYNAMIC_ENERGY: &str = "AIMDynamicEnergy";
pub const TOTAL_ENERGY: &str = "TotalEnergy";

/// Pintool output labels and the keys they are stored under
pub const PINTOOL_LABELS: &[(&str, &str)] = &[
    ("total events", "totalEvents"),
    ("roi start", "roiStart"),
    ("roi end", "roiEnd"),
    ("thread begin", "threadBegins"),
    ("thread end", "threadEnd"),
    ("memory events", "memoryEvents"),
    ("reads", "readEvents"),
    ("writes", "writeEvents"),
    ("basic blocks", "basicBlocks"),
    ("lock acquires", "lockAcqs"),
    ("lock releases", "lockRels"),
    ("lock acquire reads", "lockAcqReads"),
    ("lock acquire writes", "lockAcqWrites"),
    ("lock release writes", "lockRelWrites"),
    ("atomic reads", "atomicReads"),
    ("atomic writes", "atomicWrites"),
    ("thread spawns", "threadSpawns"),
    ("thread joins", "threadJoins"),
];

/// Look up the key for a pintool label
pub fn pintool_key(label: &str) -> Option<&'static str> {
    PINTOOL_LABELS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, key)| *key)
}

/// Rows of the pintool statistics table
pub const PINTOOL_TABLE_KEYS: &[&str] = &[
    "totalEvents",
    "roiStart",
    "roiEnd",
    "threadBegins",
    "threadEnd",
    "memoryEvents",
    "readEvents",
    "writeEvents",
    "atomicReads",
    "atomicWrites",
    "lockAcqs",
    "lockRels",
    "lockAcqReads",
    "lockAcqWrites",
    "lockRelWrites",
    "threadSpawns",
    "threadJoins",
    "basicBlocks",
];

/// Rows of the simulator statistics table common to every family
pub const SIM_TABLE_KEYS: &[&str] = &[
    BANDWIDTH_CYCLE_COUNT,
    L1_READ_HITS,
    L1_READ_MISSES,
    L1_WRITE_HITS,
    L1_WRITE_MISSES,
    L1_LINE_EVICTIONS,
    L1_DIRTY_LINE_EVICTIONS,
    L2_READ_HITS,
    L2_READ_MISSES,
    L2_WRITE_HITS,
    L2_WRITE_MISSES,
    L2_LINE_EVICTIONS,
    L2_DIRTY_LINE_EVICTIONS,
    L3_READ_HITS,
    L3_READ_MISSES,
    L3_WRITE_HITS,
    L3_WRITE_MISSES,
    L3_LINE_EVICTIONS,
    L3_DIRTY_LINE_EVICTIONS,
    TOTAL_READS,
    TOTAL_WRITES,
    TOTAL_MEMORY_ACCESSES,
    TOTAL_ATOMIC_READS,
    TOTAL_ATOMIC_WRITES,
    TOTAL_LOCK_READS,
    TOTAL_LOCK_WRITES,
    INSTRUCTIONS,
    REGION_BOUNDARIES,
    REGION_SIZE,
    ONCHIP_NETWORK_MSGS,
    ONCHIP_NETWORK_16BYTES_FLITS,
    MEM_64BYTES_ACCESSES,
    MEM_64BYTES_READS,
    MEM_64BYTES_WRITES,
    RUNNING_TIME,
    MEMORY_USAGE,
    SUM_REQD_ONCHIP_BW,
    SUM_REQD_OFFCHIP_BW,
];

const MESI_TABLE_KEYS: &[&str] = &[
    MESI_REMOTE_READ_HITS,
    MESI_REMOTE_WRITE_HITS,
    MESI_UPGRADE_MISSES,
    MESI_MEM_EXEC_CYCLES,
    MESI_COHERENCE_EXEC_CYCLES,
];

const VISER_TABLE_KEYS: &[&str] = &[
    VISER_WAR_UPGRADES,
    AIM_READ_HITS,
    AIM_READ_MISSES,
    AIM_WRITE_HITS,
    AIM_WRITE_MISSES,
    AIM_LINE_EVICTIONS,
    VISER_REG_EXEC_BW_CYCLES,
    VISER_PRE_COMMIT_BW_CYCLES,
    VISER_READ_VALIDATION_BW_CYCLES,
    VISER_POST_COMMIT_BW_CYCLES,
    BLOOM_FILTER_TOTAL_ENERGY,
];

const RCCSI_TABLE_KEYS: &[&str] = &[
    RCCSI_REG_EXEC_BW_CYCLES,
    RCCSI_PRE_COMMIT_BW_CYCLES,
    RCCSI_READ_VALIDATION_BW_CYCLES,
    RCCSI_STALL_BW_CYCLES,
    RCCSI_COMMIT_BW_CYCLES,
    RCCSI_POST_COMMIT_BW_CYCLES,
];

const PAUSE_TABLE_KEYS: &[&str] = &[
    VISER_REG_EXEC_BW_CYCLES,
    VISER_PRE_COMMIT_BW_CYCLES,
    VISER_READ_VALIDATION_BW_CYCLES,
    VISER_POST_COMMIT_BW_CYCLES,
    PAUSE_BW_CYCLES,
    RESTART_BW_CYCLES,
    WHOLE_APP_RESTARTS,
    REGION_RESTARTS,
];

/// Rows of the energy statistics table
pub const ENERGY_TABLE_KEYS: &[&str] = &[
    AREA,
    STATIC_POWER,
    DYNAMIC_POWER,
    BANDWIDTH_CYCLE_COUNT,
    STATIC_ENERGY,
    DYNAMIC_ENERGY,
    BLOOM_FILTER_ENERGY,
    AIM_STATIC_ENERGY,
    AIM_DYNAMIC_ENERGY,
    TOTAL_ENERGY,
];

/// Family-specific table rows
pub fn family_table_keys(family: SimulatorFamily) -> &'static [&'static str] {
    match family {
        SimulatorFamily::Mesi => MESI_TABLE_KEYS,
        SimulatorFamily::Viser => VISER_TABLE_KEYS,
        SimulatorFamily::RccSi => RCCSI_TABLE_KEYS,
        SimulatorFamily::Pause => PAUSE_TABLE_KEYS,
    }
}

/// Rows of the simulator statistics table for a set of families
///
/// Common rows first, then each present family's rows in family order.
/// A key listed by several families appears once.
pub fn sim_table_keys(families: &[SimulatorFamily]) -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = SIM_TABLE_KEYS.to_vec();
    for family in SimulatorFamily::ALL {
        if !families.contains(&family) {
            continue;
        }
        for key in family_table_keys(family) {
            if !keys.contains(key) {
                keys.push(key);
            }
        }
    }
    keys
}

/// A metric broken down into per-family constituents
#[derive(Debug, Clone, PartialEq)]
pub struct StackedKey {
    /// Metric the constituents add up to
    pub metric: &'static str,

    /// Constituent keys, indexed in `SimulatorFamily::ALL` order
    pub constituents: [Vec<&'static str>; 4],
}

impl StackedKey {
    /// Constituents reported by one family
    pub fn for_family(&self, family: SimulatorFamily) -> &[&'static str] {
        &self.constituents[family.index()]
    }
}

/// Cycle breakdowns, in display order
pub fn stacked_keys() -> Vec<StackedKey> {
    vec![StackedKey {
        metric: BANDWIDTH_CYCLE_COUNT,
        constituents: [
            vec![MESI_MEM_EXEC_CYCLES, MESI_COHERENCE_EXEC_CYCLES],
            vec![
                VISER_REG_EXEC_BW_CYCLES,
                VISER_PRE_COMMIT_BW_CYCLES,
                VISER_READ_VALIDATION_BW_CYCLES,
                VISER_POST_COMMIT_BW_CYCLES,
            ],
            vec![
                RCCSI_REG_EXEC_BW_CYCLES,
                RCCSI_PRE_COMMIT_BW_CYCLES,
                RCCSI_READ_VALIDATION_BW_CYCLES,
                RCCSI_STALL_BW_CYCLES,
                RCCSI_COMMIT_BW_CYCLES,
                RCCSI_POST_COMMIT_BW_CYCLES,
            ],
            vec![
                VISER_REG_EXEC_BW_CYCLES,
                VISER_PRE_COMMIT_BW_CYCLES,
                VISER_READ_VALIDATION_BW_CYCLES,
                VISER_POST_COMMIT_BW_CYCLES,
                PAUSE_BW_CYCLES,
                RESTART_BW_CYCLES,
            ],
        ],
    }]
}

/// Energy breakdown
///
/// When AIM energy is not folded into the McPAT totals it is stacked
/// separately for Viser.
pub fn energy_stacked_keys(add_aim_mcpat: bool) -> Vec<StackedKey> {
    let mut viser = vec![STATIC_ENERGY, DYNAMIC_ENERGY, BLOOM_FILTER_ENERGY];
    if !add_aim_mcpat {
        viser.push(AIM_STATIC_ENERGY);
        viser.push(AIM_DYNAMIC_ENERGY);
    }

    vec![StackedKey {
        metric: TOTAL_ENERGY,
        constituents: [
            vec![STATIC_ENERGY, DYNAMIC_ENERGY, BLOOM_FILTER_ENERGY],
            viser,
            Vec::new(),
            Vec::new(),
        ],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pintool_key_lookup() {
        assert_eq!(pintool_key("total events"), Some("totalEvents"));
        assert_eq!(pintool_key("lock acquire reads"), Some("lockAcqReads"));
        assert_eq!(pintool_key("bogus"), None);
    }

    #[test]
    fn test_sim_table_keys_deduplicates() {
        let keys = sim_table_keys(&[SimulatorFamily::Viser, SimulatorFamily::Pause]);
        let reg = keys
            .iter()
            .filter(|k| **k == VISER_REG_EXEC_BW_CYCLES)
            .count();
        assert_eq!(reg, 1);
        assert!(keys.contains(&RESTART_BW_CYCLES));
        assert!(!keys.contains(&MESI_UPGRADE_MISSES));
        assert_eq!(keys[0], BANDWIDTH_CYCLE_COUNT);
    }

    #[test]
    fn test_stacked_keys_order() {
        let stacked = stacked_keys();
        assert_eq!(stacked.len(), 1);
        let viser = stacked[0].for_family(SimulatorFamily::Viser);
        assert_eq!(viser.last(), Some(&VISER_POST_COMMIT_BW_CYCLES));
        assert_eq!(stacked[0].for_family(SimulatorFamily::RccSi).len(), 6);
    }

    #[test]
    fn test_energy_stacked_keys_aim() {
        let folded = energy_stacked_keys(true);
        assert_eq!(folded[0].for_family(SimulatorFamily::Viser).len(), 3);

        let separate = energy_stacked_keys(false);
        assert!(separate[0]
            .for_family(SimulatorFamily::Viser)
            .contains(&AIM_DYNAMIC_ENERGY));
        assert!(separate[0].for_family(SimulatorFamily::Pause).is_empty());
    }
}
