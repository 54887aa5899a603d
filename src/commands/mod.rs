//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod collect;
pub mod energy;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use collect::{collect_experiments, execute_collect, split_list, validate_args};
pub use energy::{collect_energy, execute_energy};
pub use models::{CollectArgs, EnergyArgs};
pub use utils::{display_env, display_keys, display_version, inspect_stats_file};
