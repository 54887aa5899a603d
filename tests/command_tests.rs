use simstats::aggregator::{EnergyStats, OutputTable, StatsTable};
use simstats::commands::{execute_collect, execute_energy, CollectArgs, EnergyArgs};
use simstats::keys;
use simstats::output::{read_report, Report};
use simstats::parser::{Experiment, StatValue};
use simstats::utils::config::{
    ENERGY_FILE, ENERGY_STATS_TABLE_FILE, OUTPUT_TABLE_FILE, PINTOOL_STATS_TABLE_FILE,
    RESULTS_FILE, SIM_STATS_TABLE_FILE,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CYCLES: i64 = 1_600_000_000;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn mesi_stats(trial: i64) -> String {
    let cycles = CYCLES * trial;
    format!(
        "# MESI run\n\
         {{'cpuid': 0, 'g_Data_L1ReadHits': 7}}\n\
         {{'g_Data_L3ReadMisses': 100, 'g_Data_L3WriteMisses': 50, \
         'g_Data_L3DirtyLineEvictions': 30, 'max_BandwidthDrivenCycleCount': {}, \
         'dep_MESICoherenceExecDrivenCycleCount': {}, \
         'dep_MESIMemSystemExecDrivenCycleCount': {}, \
         'g_OnChipNetworkMessageSize16BytesFlits': 1000, 'g_MESIUpgradeMisses': {}}}\n",
        cycles,
        cycles / 4,
        cycles - cycles / 4,
        trial
    )
}

fn viser_stats(trial: i64) -> String {
    let cycles = CYCLES * trial;
    format!(
        "{{'g_Data_L3ReadMisses': 100, 'g_Data_L3WriteMisses': 50, \
         'g_Data_L3DirtyLineEvictions': 30, 'g_AIMCacheReadMisses': 10, \
         'g_AIMCacheWriteMisses': 0, 'g_AIMCacheLineEvictions': 5, \
         'max_BandwidthDrivenCycleCount': {}, \
         'dep_ViserRegExecBWDrivenCycleCount': {}, \
         'dep_ViserPreCommitBWDrivenCycleCount': 0, \
         'dep_ViserReadValidationBWDrivenCycleCount': 0, \
         'dep_ViserPostCommitBWDrivenCycleCount': 0, \
         'g_OnChipNetworkMessageSize16BytesFlits': 2000, \
         'g_BloomFilterTotalEnergy': {}}}\n",
        cycles, cycles, trial as f64
    )
}

/// `<out>/simsmall/<trial>/x264/<tool>-stats.*` for two trials
fn build_run_tree(out: &Path) {
    for trial in 1..=2i64 {
        let run = out.join("simsmall").join(trial.to_string()).join("x264");
        fs::create_dir_all(&run).unwrap();
        fs::write(
            run.join("pintool-stats.output"),
            format!("total events: {}\nreads: 40\n", 100 * trial),
        )
        .unwrap();
        fs::write(run.join("mesi8-stats.py"), mesi_stats(trial)).unwrap();
        fs::write(run.join("viser8-stats.py"), viser_stats(trial)).unwrap();
    }
}

fn collect_args(out: &Path) -> CollectArgs {
    CollectArgs {
        output_dir: out.to_path_buf(),
        tools: names(&["pintool", "mesi8", "viser8", "sniper"]),
        benches: names(&["x264"]),
        workloads: names(&["simsmall"]),
        trials: 2,
        ..Default::default()
    }
}

#[test]
fn test_collect_end_to_end() {
    let dir = TempDir::new().unwrap();
    build_run_tree(dir.path());

    execute_collect(collect_args(dir.path())).unwrap();

    let results: Report<Vec<Experiment>> = read_report(dir.path().join(RESULTS_FILE)).unwrap();
    // sniper is skipped
    assert_eq!(results.data.len(), 6);
    let viser = results
        .data
        .iter()
        .find(|e| e.tool == "viser8" && e.trial == "1")
        .unwrap();
    let global = viser.global().unwrap();
    assert_eq!(global[keys::MEM_64BYTES_ACCESSES], StatValue::Int(210));
    assert!(global.contains_key(keys::SUM_REQD_OFFCHIP_BW));

    let sim: Report<StatsTable> = read_report(dir.path().join(SIM_STATS_TABLE_FILE)).unwrap();
    assert_eq!(sim.data.columns.len(), 2);
    assert_eq!(
        sim.data.cell(keys::BANDWIDTH_CYCLE_COUNT, "x264", "simsmall", "mesi8"),
        Some(2_400_000_000.0)
    );
    assert_eq!(
        sim.data.cell(keys::MESI_UPGRADE_MISSES, "x264", "simsmall", "mesi8"),
        Some(1.5)
    );
    // Viser never reports the MESI counter; inflated to 0
    assert_eq!(
        sim.data.cell(keys::MESI_UPGRADE_MISSES, "x264", "simsmall", "viser8"),
        Some(0.0)
    );

    let pintool: Report<StatsTable> =
        read_report(dir.path().join(PINTOOL_STATS_TABLE_FILE)).unwrap();
    assert_eq!(
        pintool.data.cell("totalEvents", "x264", "simsmall", "pintool"),
        Some(150.0)
    );

    let outputs: Report<OutputTable> = read_report(dir.path().join(OUTPUT_TABLE_FILE)).unwrap();
    assert_eq!(outputs.data.rows.len(), 1);
    assert_eq!(outputs.data.columns.len(), 6);
}

#[test]
fn test_collect_missing_stats_file_writes_nothing() {
    let dir = TempDir::new().unwrap();
    build_run_tree(dir.path());
    fs::remove_file(dir.path().join("simsmall/2/x264/viser8-stats.py")).unwrap();

    let err = execute_collect(collect_args(dir.path())).unwrap_err();

    assert!(err.to_string().contains("Viser simulator stats file not present"));
    assert!(!dir.path().join(RESULTS_FILE).exists());
}

#[test]
fn test_collect_zero_cycle_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    build_run_tree(dir.path());
    fs::write(dir.path().join("simsmall/2/x264/mesi8-stats.py"), mesi_stats(0)).unwrap();

    let err = execute_collect(collect_args(dir.path())).unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("Invalid cycle count max_BandwidthDrivenCycleCount = 0"));
    assert!(!dir.path().join(RESULTS_FILE).exists());
}

#[test]
fn test_energy_end_to_end() {
    let dir = TempDir::new().unwrap();
    build_run_tree(dir.path());
    execute_collect(collect_args(dir.path())).unwrap();

    let mcpat = dir.path().join("mcpat");
    fs::create_dir_all(&mcpat).unwrap();
    fs::write(
        mcpat.join("x264-mesi8-simsmall.mcpat"),
        "Processor:\n  Area = 100.0 mm^2\n  Subthreshold Leakage with power gating = 4.0 W\n  \
         Runtime Dynamic = 8.0 W\n  Total Cores: 8 cores\n",
    )
    .unwrap();
    fs::write(
        mcpat.join("x264-viser8-simsmall.mcpat"),
        "Processor:\n  Area = 110.0 mm^2\n  Subthreshold Leakage with power gating = 5.0 W\n  \
         Runtime Dynamic = 10.0 W\nTotal L3s:\nShared L3\nAIM L3\n  \
         Subthreshold Leakage with power gating = 1.0 W\n  Runtime Dynamic = 2.0 W\n",
    )
    .unwrap();

    execute_energy(EnergyArgs {
        products_dir: dir.path().to_path_buf(),
        mcpat_dir: mcpat,
        tools: names(&["pintool", "mesi8", "viser8"]),
        benches: names(&["x264"]),
        workloads: names(&["simsmall"]),
        config: None,
        print_summary: false,
    })
    .unwrap();

    let energy: Report<Vec<EnergyStats>> = read_report(dir.path().join(ENERGY_FILE)).unwrap();
    assert_eq!(energy.data.len(), 2);

    // 2.4e9 merged cycles at 1.6 GHz is 1.5 s
    let mesi = &energy.data[0];
    assert_eq!(mesi.tool, "mesi8");
    assert_eq!(mesi.static_energy, 6.0);
    assert_eq!(mesi.dynamic_energy, 12.0);

    let viser = &energy.data[1];
    assert_eq!(viser.bloom_filter_energy, 1.5);
    assert_eq!(viser.aim_dynamic_energy, 3.0);
    assert_eq!(viser.total_energy, 7.5 + 15.0 + 1.5);

    let table: Report<StatsTable> =
        read_report(dir.path().join(ENERGY_STATS_TABLE_FILE)).unwrap();
    assert_eq!(
        table.data.cell(keys::TOTAL_ENERGY, "x264", "simsmall", "viser8"),
        Some(24.0)
    );
}
