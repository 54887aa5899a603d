//! simstats CLI
//!
//! Collects per-trial simulator statistics, derives bandwidth and energy
//! figures and writes summary tables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use simstats::commands::{
    display_env, display_keys, display_version, execute_collect, execute_energy,
    inspect_stats_file, split_list, validate_args, CollectArgs, EnergyArgs,
};

/// simstats - result aggregation for cache-coherence simulators
#[derive(Parser, Debug)]
#[command(name = "simstats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Collect stats files into results and tables
    Collect {
        /// Root of the run directories
        #[arg(short, long, env = "SIMSTATS_OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Where reports are written (defaults to the output directory)
        #[arg(short, long, env = "SIMSTATS_PRODUCTS_DIR")]
        products_dir: Option<PathBuf>,

        /// Comma-separated tool configurations
        #[arg(short, long)]
        tools: String,

        /// Comma-separated benchmarks
        #[arg(short, long)]
        bench: String,

        /// Comma-separated workloads
        #[arg(short, long, default_value = "simsmall")]
        workload: String,

        /// Number of trials
        #[arg(long, default_value = "1")]
        trials: u32,

        /// TOML file overriding hardware parameters
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print tables to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Compute energy from McPAT reports and collected results
    Energy {
        /// Directory holding results.json
        #[arg(short, long, env = "SIMSTATS_PRODUCTS_DIR")]
        products_dir: PathBuf,

        /// Directory holding the .mcpat reports
        #[arg(short, long)]
        mcpat_dir: PathBuf,

        /// Comma-separated tool configurations
        #[arg(short, long)]
        tools: String,

        /// Comma-separated benchmarks
        #[arg(short, long)]
        bench: String,

        /// Comma-separated workloads
        #[arg(short, long, default_value = "simsmall")]
        workload: String,

        /// TOML file overriding hardware parameters
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the energy table to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Inspect stats files, keys and environment
    Inspect {
        #[command(subcommand)]
        target: InspectTarget,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand, Debug)]
enum InspectTarget {
    /// Parse one stats file and print its global statistics
    Stats {
        /// Path to a stats file
        file: PathBuf,
    },

    /// List stacked metrics and table rows
    Keys,

    /// Check the external tool roots in the environment
    Env,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Collect {
            output_dir,
            products_dir,
            tools,
            bench,
            workload,
            trials,
            config,
            summary,
        } => {
            let args = CollectArgs {
                output_dir,
                products_dir,
                tools: split_list(&tools),
                benches: split_list(&bench),
                workloads: split_list(&workload),
                trials,
                config,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_collect(args)?;
        }

        Commands::Energy {
            products_dir,
            mcpat_dir,
            tools,
            bench,
            workload,
            config,
            summary,
        } => {
            let args = EnergyArgs {
                products_dir,
                mcpat_dir,
                tools: split_list(&tools),
                benches: split_list(&bench),
                workloads: split_list(&workload),
                config,
                print_summary: summary,
            };

            simstats::commands::energy::validate_args(&args)?;

            execute_energy(args)?;
        }

        Commands::Inspect { target } => match target {
            InspectTarget::Stats { file } => inspect_stats_file(file)?,
            InspectTarget::Keys => display_keys(),
            InspectTarget::Env => display_env()?,
        },

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
