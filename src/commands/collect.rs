//! Collect command implementation.
//!
//! The collect command:
//! 1. Reads every stats file of the run matrix
//! 2. Computes derived traffic, bandwidth and corrected cycles
//! 3. Flattens the result set for tabulation
//! 4. Builds the pintool, simulator and output tables
//! 5. Writes the reports

use super::models::CollectArgs;
use crate::aggregator::{
    output_table, pintool_table, post_process, prepare_tabulation, record_onchip_bandwidth,
    sim_stats_table,
};
use crate::output::{render_output_table, render_table, write_report};
use crate::parser::{parse_pintool_stats, parse_stats, Experiment, StatRecord};
use crate::tools::{classify, is_pintool, is_simulator, is_sniper, stats_file_name, ToolKind};
use crate::utils::config::{
    load_hardware_config, HardwareConfig, GLOBAL_CPUID, OUTPUT_TABLE_FILE,
    PINTOOL_STATS_TABLE_FILE, RESULTS_FILE, SIM_STATS_TABLE_FILE,
};
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use std::path::Path;
use std::time::Instant;

/// Execute the collect command
///
/// **Public** - main entry point called from main.rs
///
/// Nothing is written unless every step succeeds.
///
/// # Errors
/// * Missing run directory or stats file
/// * Malformed stats file
/// * Derived-metric failure (unknown configuration, phase mismatch)
/// * File write errors
pub fn execute_collect(args: CollectArgs) -> Result<()> {
    let start_time = Instant::now();
    let hw = hardware_config(args.config.as_deref())?;

    info!(
        "Collecting {} tool(s) x {} bench(es) x {} workload(s) x {} trial(s) from {}",
        args.tools.len(),
        args.benches.len(),
        args.workloads.len(),
        args.trials,
        args.output_dir.display()
    );

    info!("Step 1/5: Reading stats files...");
    let mut experiments = collect_experiments(&args, &hw)?;
    debug!("Collected {} experiments", experiments.len());

    info!("Step 2/5: Computing derived metrics...");
    let adjustments =
        post_process(&mut experiments, &hw).context("Failed to post-process results")?;

    info!("Step 3/5: Preparing tabulation...");
    let records = prepare_tabulation(&experiments).context("Failed to flatten results")?;

    info!("Step 4/5: Building tables...");
    let pintool = if args.tools.iter().any(|t| is_pintool(t)) {
        Some(
            pintool_table(&records, &args.benches, &args.workloads, &hw)
                .context("Failed to build pintool stats table")?,
        )
    } else {
        None
    };
    let simulator = if args.tools.iter().any(|t| is_simulator(t)) {
        Some(
            sim_stats_table(&records, &args.benches, &args.workloads, &args.tools, &hw)
                .context("Failed to build simulator stats table")?,
        )
    } else {
        None
    };
    let outputs = output_table(&experiments);

    info!("Step 5/5: Writing reports...");
    let products = args.products_dir();
    write_report(&experiments, products.join(RESULTS_FILE))
        .context("Failed to write collected results")?;
    write_report(&outputs, products.join(OUTPUT_TABLE_FILE))
        .context("Failed to write output table")?;
    if let Some(table) = &pintool {
        write_report(table, products.join(PINTOOL_STATS_TABLE_FILE))
            .context("Failed to write pintool stats table")?;
    }
    if let Some(table) = &simulator {
        write_report(table, products.join(SIM_STATS_TABLE_FILE))
            .context("Failed to write simulator stats table")?;
    }
    info!("✓ Reports written to: {}", products.display());

    if !adjustments.is_empty() {
        warn!(
            "{} experiment(s) exceeded a bandwidth ceiling; cycles were corrected",
            adjustments.len()
        );
    }

    if args.print_summary {
        println!("\n{}", render_output_table(&outputs));
        for table in pintool.iter().chain(simulator.iter()) {
            println!("\n{}", render_table(table));
        }
    }

    info!(
        "Collect completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Read every stats file of the run matrix
///
/// **Public** - usable without post-processing or report writing
///
/// Simulator experiments get their on-chip bandwidth right after parsing.
/// Tools that are neither pintool nor simulator configurations are skipped.
///
/// # Errors
/// * A run directory or stats file is missing
/// * A stats file cannot be parsed
pub fn collect_experiments(args: &CollectArgs, hw: &HardwareConfig) -> Result<Vec<Experiment>> {
    let mut experiments = Vec::new();

    for workload in &args.workloads {
        for trial in 1..=args.trials {
            for bench in &args.benches {
                let run_dir = args
                    .output_dir
                    .join(workload)
                    .join(trial.to_string())
                    .join(bench);
                if !run_dir.is_dir() {
                    bail!("Output directory not present: {}", run_dir.display());
                }

                for tool in &args.tools {
                    if let Some(exp) = read_experiment(&run_dir, bench, trial, workload, tool, hw)? {
                        experiments.push(exp);
                    }
                }
            }
        }
    }

    if experiments.is_empty() {
        bail!("No experiments collected; check --tools");
    }

    Ok(experiments)
}

/// **Private** - one tool's stats file in a run directory
fn read_experiment(
    run_dir: &Path,
    bench: &str,
    trial: u32,
    workload: &str,
    tool: &str,
    hw: &HardwareConfig,
) -> Result<Option<Experiment>> {
    let label = match classify(tool) {
        ToolKind::Pintool => "Pintool".to_string(),
        ToolKind::Simulator(family) => format!("{} simulator", family),
        ToolKind::Unsupported if is_sniper(tool) => {
            warn!("Skipping Sniper configuration {}: its stats are not aggregated", tool);
            return Ok(None);
        }
        ToolKind::Unsupported => {
            warn!("Skipping unsupported tool: {}", tool);
            return Ok(None);
        }
    };

    let path = run_dir.join(stats_file_name(tool));
    if !path.is_file() {
        bail!("{} stats file not present: {}", label, path.display());
    }
    debug!("Reading {}", path.display());

    let mut exp = Experiment::new(bench, trial, workload, tool);
    if is_pintool(tool) {
        let mut record = StatRecord::new();
        parse_pintool_stats(&path, &mut record)?;
        exp.cores.insert(GLOBAL_CPUID, record);
    } else {
        parse_stats(&path, &mut exp.cores)?;
        record_onchip_bandwidth(&mut exp, hw)
            .with_context(|| format!("Failed to compute on-chip bandwidth for {}", path.display()))?;
    }

    Ok(Some(exp))
}

/// Load hardware parameters, or the defaults when no file is given
///
/// **Public** - shared with the energy command
pub fn hardware_config(path: Option<&Path>) -> Result<HardwareConfig> {
    match path {
        Some(path) => load_hardware_config(path)
            .with_context(|| format!("Failed to load hardware config {}", path.display())),
        None => Ok(HardwareConfig::default()),
    }
}

/// Validate collect arguments
///
/// **Public** - can be called before execute_collect for early validation
pub fn validate_args(args: &CollectArgs) -> Result<()> {
    if args.tools.is_empty() {
        bail!("At least one tool is required");
    }
    if args.benches.is_empty() {
        bail!("At least one benchmark is required");
    }
    if args.workloads.is_empty() {
        bail!("At least one workload is required");
    }
    if args.trials == 0 {
        bail!("trials must be greater than 0");
    }
    if !args.output_dir.is_dir() {
        bail!(
            "Output directory does not exist: {}",
            args.output_dir.display()
        );
    }
    Ok(())
}

/// Split a comma-separated CLI list
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: &Path) -> CollectArgs {
        CollectArgs {
            output_dir: dir.to_path_buf(),
            tools: vec!["mesi8".to_string()],
            benches: vec!["x264".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_args_valid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_args(&args(dir.path())).is_ok());
    }

    #[test]
    fn test_validate_args_empty_tools() {
        let dir = tempfile::tempdir().unwrap();
        let a = CollectArgs {
            tools: Vec::new(),
            ..args(dir.path())
        };
        assert!(validate_args(&a).is_err());
    }

    #[test]
    fn test_validate_args_zero_trials() {
        let dir = tempfile::tempdir().unwrap();
        let a = CollectArgs {
            trials: 0,
            ..args(dir.path())
        };
        assert!(validate_args(&a).is_err());
    }

    #[test]
    fn test_missing_run_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_experiments(&args(dir.path()), &HardwareConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Output directory not present"));
    }

    #[test]
    fn test_missing_stats_file_names_family() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("simsmall/1/x264")).unwrap();

        let err = collect_experiments(&args(dir.path()), &HardwareConfig::default()).unwrap_err();
        assert!(err.to_string().contains("MESI simulator stats file not present"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("mesi8, viser8,,"), vec!["mesi8", "viser8"]);
    }
}
