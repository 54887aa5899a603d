use crate::keys::{self, stacked_keys, energy_stacked_keys};
use crate::parser::{parse_pintool_stats, parse_stats, CorePartition, StatRecord};
use crate::tools::{is_pintool, SimulatorFamily};
use crate::utils::config::{ToolPaths, GLOBAL_CPUID, OPTIONAL_ENV_VARS, REQUIRED_ENV_VARS, SCHEMA_VERSION};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Parse one stats file and print its global partition
///
/// Files named `pintool-stats.output` are read as pintool counters.
pub fn inspect_stats_file(file_path: PathBuf) -> Result<()> {
    println!("Inspecting stats file: {}", file_path.display());

    let name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut cores = CorePartition::new();
    if is_pintool(&name) {
        let mut record = StatRecord::new();
        parse_pintool_stats(&file_path, &mut record)?;
        cores.insert(GLOBAL_CPUID, record);
    } else {
        parse_stats(&file_path, &mut cores)
            .with_context(|| format!("Failed to parse {}", file_path.display()))?;
    }

    println!("✓ Parsed {} partition(s)", cores.len());
    let per_core = cores.keys().filter(|id| **id != GLOBAL_CPUID).count();
    println!("  Per-core records: {}", per_core);

    match cores.get(&GLOBAL_CPUID) {
        Some(global) => {
            println!("  Global statistics ({}):", global.len());
            for (key, value) in global {
                println!("    {:<48} {}", key, value);
            }
        }
        None => println!("  No global partition"),
    }

    Ok(())
}

/// List the stacked-key breakdowns and table rows
pub fn display_keys() {
    println!("Stacked metrics (MESI / Viser / RCC-SI / Pause):");
    for stacked in stacked_keys().iter().chain(energy_stacked_keys(true).iter()) {
        println!("  {}", stacked.metric);
        for family in SimulatorFamily::ALL {
            println!(
                "    {:<8} {}",
                family.to_string(),
                stacked.for_family(family).join(" + ")
            );
        }
    }

    println!();
    println!("Simulator table rows:");
    for key in keys::sim_table_keys(&SimulatorFamily::ALL) {
        println!("  {}", key);
    }

    println!();
    println!("Pintool table rows:");
    for key in keys::PINTOOL_TABLE_KEYS {
        println!("  {}", key);
    }
}

/// Report the external tool roots taken from the environment
pub fn display_env() -> Result<()> {
    for name in REQUIRED_ENV_VARS.iter().chain(OPTIONAL_ENV_VARS) {
        let value = std::env::var(name).unwrap_or_default();
        let shown = if value.is_empty() { "<unset>" } else { value.as_str() };
        println!("  {:<14} {}", name, shown);
    }

    let paths = ToolPaths::from_env().context("Environment is incomplete")?;
    println!("✓ All required tool roots are set");
    if paths.rccsisim_root.is_none() {
        println!("  RCC-SI simulator root not set; rccsi tools cannot run");
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("simstats v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Collects and aggregates cache-coherence simulator statistics.");
}
