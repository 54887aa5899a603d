use pretty_assertions::assert_eq;
use simstats::aggregator::{
    correct_bandwidth, dict_filter, estimate_memory_traffic, extract_global, inflate, key_filter,
    key_union, merge, prepare_tabulation, Link,
};
use simstats::keys;
use simstats::parser::{probe, Experiment, StatRecord, StatValue};
use simstats::utils::config::{HardwareConfig, GLOBAL_CPUID};
use simstats::utils::AggregateError;

fn record(pairs: &[(&str, StatValue)]) -> StatRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn experiment(tool: &str, global: StatRecord) -> Experiment {
    let mut exp = Experiment::new("x264", 1, "simsmall", tool);
    exp.cores.insert(GLOBAL_CPUID, global);
    exp
}

#[test]
fn test_merge_skips_records_without_key() {
    let records = vec![
        record(&[("cycles", StatValue::Int(10))]),
        record(&[("other", StatValue::Int(99))]),
        record(&[("cycles", StatValue::Float(20.0))]),
    ];

    let merged = merge(&records, "cycles").unwrap();

    assert_eq!(merged.len(), 1);
    assert_eq!(merged["cycles"], StatValue::Float(15.0));
}

#[test]
fn test_merge_without_data_is_an_error() {
    let records = vec![record(&[("other", StatValue::Int(1))])];
    assert!(matches!(
        merge(&records, "cycles"),
        Err(AggregateError::NoData(key)) if key == "cycles"
    ));
}

#[test]
fn test_inflate_keeps_existing_values() {
    let mut records = vec![
        record(&[("a", StatValue::Int(1))]),
        record(&[("b", StatValue::Int(2))]),
    ];
    let keys = key_union(&records);

    inflate(&mut records, &keys);

    assert_eq!(records[0]["a"], StatValue::Int(1));
    assert_eq!(records[0]["b"], StatValue::Float(0.0));
    assert_eq!(records[1]["a"], StatValue::Float(0.0));
    assert_eq!(records[1]["b"], StatValue::Int(2));
}

#[test]
fn test_dict_filter_returns_copies() {
    let source = vec![
        probe(&[("bench", "x264"), ("tool", "mesi8")]),
        probe(&[("bench", "x264"), ("tool", "viser8")]),
        probe(&[("bench", "canneal"), ("tool", "mesi8")]),
    ];

    let mut selected = dict_filter(&source, &probe(&[("tool", "mesi8")]));
    assert_eq!(selected.len(), 2);

    selected[0].insert("bench".to_string(), StatValue::from("changed"));
    assert_eq!(source[0]["bench"], StatValue::from("x264"));
    assert_eq!(key_filter(&source, "tool").len(), 3);
}

#[test]
fn test_extract_global_drops_per_core_detail() {
    let mut exp = experiment("mesi8", record(&[("g", StatValue::Int(1))]));
    exp.cores.insert(0, record(&[("core_only", StatValue::Int(5))]));

    let flat = extract_global(&exp).unwrap();

    let mut expected = exp.metadata();
    expected.insert("g".to_string(), StatValue::Int(1));
    assert_eq!(flat, expected);
}

#[test]
fn test_prepare_tabulation_uniform_schema() {
    let experiments = vec![
        experiment("mesi8", record(&[(keys::MESI_UPGRADE_MISSES, StatValue::Int(4))])),
        experiment("viser8", record(&[(keys::VISER_WAR_UPGRADES, StatValue::Int(7))])),
        experiment("pintool", record(&[("totalEvents", StatValue::Int(100))])),
    ];

    let records = prepare_tabulation(&experiments).unwrap();

    assert_eq!(records.len(), 3);
    let simulators: Vec<&StatRecord> = records
        .iter()
        .filter(|r| r[keys::TOOL] != StatValue::from("pintool"))
        .collect();
    for r in &simulators {
        assert!(r.contains_key(keys::MESI_UPGRADE_MISSES));
        assert!(r.contains_key(keys::VISER_WAR_UPGRADES));
        assert!(!r.contains_key("totalEvents"));
    }
}

#[test]
fn test_viser_memory_traffic() {
    let exp = experiment(
        "viser8-opt",
        record(&[
            (keys::L3_READ_MISSES, StatValue::Int(100)),
            (keys::L3_WRITE_MISSES, StatValue::Int(50)),
            (keys::L3_DIRTY_LINE_EVICTIONS, StatValue::Int(30)),
            (keys::AIM_READ_MISSES, StatValue::Int(10)),
            (keys::AIM_WRITE_MISSES, StatValue::Int(0)),
            (keys::AIM_LINE_EVICTIONS, StatValue::Int(5)),
        ]),
    );

    let traffic = estimate_memory_traffic(&exp, &HardwareConfig::default()).unwrap();

    assert_eq!(traffic.reads, 170.0);
    assert_eq!(traffic.writes, 40.0);
    assert_eq!(traffic.accesses(), 210.0);
}

#[test]
fn test_onchip_excess_scales_viser_phases() {
    let mut exp = experiment(
        "viser8-opt",
        record(&[
            (keys::BANDWIDTH_CYCLE_COUNT, StatValue::Int(1_000_000)),
            (keys::VISER_REG_EXEC_BW_CYCLES, StatValue::Int(400_000)),
            (keys::VISER_PRE_COMMIT_BW_CYCLES, StatValue::Int(300_000)),
            (keys::VISER_READ_VALIDATION_BW_CYCLES, StatValue::Int(200_000)),
            (keys::VISER_POST_COMMIT_BW_CYCLES, StatValue::Int(100_000)),
            (keys::SUM_REQD_ONCHIP_BW, StatValue::Float(120.0)),
            (keys::SUM_REQD_OFFCHIP_BW, StatValue::Float(1.0)),
        ]),
    );

    let adjustments = correct_bandwidth(&mut exp, &HardwareConfig::default()).unwrap();

    assert_eq!(adjustments.len(), 1);
    assert_eq!(adjustments[0].link, Link::OnChip);
    let global = exp.global().unwrap();
    let phases: Vec<StatValue> = [
        keys::VISER_REG_EXEC_BW_CYCLES,
        keys::VISER_PRE_COMMIT_BW_CYCLES,
        keys::VISER_READ_VALIDATION_BW_CYCLES,
        keys::VISER_POST_COMMIT_BW_CYCLES,
    ]
    .iter()
    .map(|k| global[*k].clone())
    .collect();
    assert_eq!(
        phases,
        vec![
            StatValue::Int(480_000),
            StatValue::Int(360_000),
            StatValue::Int(240_000),
            StatValue::Int(120_000),
        ]
    );
    assert_eq!(global[keys::BANDWIDTH_CYCLE_COUNT], StatValue::Int(1_200_000));
}
