//! Aggregation of collected statistics into derived metrics and tables.
//!
//! This module transforms parsed experiments into:
//! - Trial-merged means (merge)
//! - Filtered and schema-uniform record lists (result_set)
//! - Memory traffic and bandwidth figures, with cycle correction
//! - Energy estimates from McPAT power figures
//! - Summary tables

pub mod bandwidth;
pub mod energy;
pub mod merge;
pub mod postprocess;
pub mod result_set;
pub mod table;
pub mod traffic;

// Re-export main types and functions
pub use bandwidth::{correct_bandwidth, phase_keys, scale_cycles, Adjustment, Link};
pub use energy::{energy_for, load_report, mcpat_file_name, EnergyStats};
pub use merge::{merge, merge_value, round_to};
pub use postprocess::post_process;
pub use result_set::{
    dict_filter, extract_global, inflate, key_filter, key_union, prepare_tabulation,
};
pub use table::{
    energy_stats_table, output_table, pintool_table, sim_stats_table, OutputTable, StatsTable,
};
pub use traffic::{
    estimate_memory_traffic, record_offchip_bandwidth, record_onchip_bandwidth, MemoryTraffic,
};
