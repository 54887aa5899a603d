//! Energy command implementation.
//!
//! Reads the collected results, combines them with the McPAT report of every
//! (bench, tool, workload) and writes the energy table.

use super::collect::hardware_config;
use super::models::EnergyArgs;
use crate::aggregator::{
    energy_for, energy_stats_table, load_report, mcpat_file_name, prepare_tabulation, EnergyStats,
};
use crate::output::{read_report, render_table, write_report, Report};
use crate::parser::{Experiment, StatRecord};
use crate::tools::is_simulator;
use crate::utils::config::{HardwareConfig, ENERGY_FILE, ENERGY_STATS_TABLE_FILE, RESULTS_FILE};
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::path::Path;

/// Execute the energy command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * `results.json` missing or unreadable
/// * A McPAT report is missing or malformed
/// * No collected trial for a configuration
pub fn execute_energy(args: EnergyArgs) -> Result<()> {
    let hw = hardware_config(args.config.as_deref())?;

    info!("Step 1/3: Loading collected results...");
    let results_path = args.products_dir.join(RESULTS_FILE);
    let report: Report<Vec<Experiment>> = read_report(&results_path)
        .with_context(|| format!("Failed to read {}", results_path.display()))?;
    let records = prepare_tabulation(&report.data).context("Failed to flatten results")?;

    info!("Step 2/3: Combining McPAT reports...");
    let stats = collect_energy(
        &records,
        &args.mcpat_dir,
        &args.tools,
        &args.benches,
        &args.workloads,
        &hw,
    )?;
    let energy_records: Vec<StatRecord> = stats.iter().map(EnergyStats::to_record).collect();
    let table = energy_stats_table(
        &energy_records,
        &args.benches,
        &args.workloads,
        &args.tools,
        &hw,
    )
    .context("Failed to build energy stats table")?;

    info!("Step 3/3: Writing reports...");
    write_report(&stats, args.products_dir.join(ENERGY_FILE))
        .context("Failed to write energy results")?;
    write_report(&table, args.products_dir.join(ENERGY_STATS_TABLE_FILE))
        .context("Failed to write energy stats table")?;
    info!("✓ Energy reports written to: {}", args.products_dir.display());

    if args.print_summary {
        println!("\n{}", render_table(&table));
    }

    Ok(())
}

/// Energy figures for every workload × bench × simulator tool
///
/// **Public** - usable on any flattened result set
///
/// # Errors
/// * `<bench>-<tool>-<workload>.mcpat` missing from `mcpat_dir`
/// * Report parse or aggregation failure
pub fn collect_energy(
    records: &[StatRecord],
    mcpat_dir: &Path,
    tools: &[String],
    benches: &[String],
    workloads: &[String],
    hw: &HardwareConfig,
) -> Result<Vec<EnergyStats>> {
    let mut stats = Vec::new();

    for workload in workloads {
        for bench in benches {
            for tool in tools.iter().filter(|t| is_simulator(t)) {
                let path = mcpat_dir.join(mcpat_file_name(bench, tool, workload));
                if !path.is_file() {
                    bail!("McPAT output file not present: {}", path.display());
                }

                let report = load_report(tool, &path)?;
                debug!("{}: {:?}", path.display(), report);

                let energy = energy_for(
                    records,
                    (bench.as_str(), workload.as_str(), tool.as_str()),
                    tools,
                    &report,
                    hw,
                )
                .with_context(|| format!("Failed to compute energy for {}", path.display()))?;
                stats.push(energy);
            }
        }
    }

    Ok(stats)
}

/// Validate energy arguments
pub fn validate_args(args: &EnergyArgs) -> Result<()> {
    if args.tools.iter().all(|t| !is_simulator(t)) {
        bail!("At least one simulator tool is required");
    }
    if args.benches.is_empty() || args.workloads.is_empty() {
        bail!("At least one benchmark and one workload are required");
    }
    if !args.mcpat_dir.is_dir() {
        bail!("McPAT directory does not exist: {}", args.mcpat_dir.display());
    }
    Ok(())
}
