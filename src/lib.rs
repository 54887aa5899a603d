//! simstats
//!
//! Result aggregation for cache-coherence simulator experiments.
//!
//! Reads the per-trial statistics written by the pintool frontend and the
//! MESI, Viser, RCC-SI and Pause/Restart backends, derives memory traffic,
//! bandwidth-corrected cycle counts and McPAT-based energy, and writes
//! trial-merged summary tables.
//!
//! ## Getting Started
//!
//! ```bash
//! simstats collect --output-dir exp-output --tools pintool,mesi8,viser8 \
//!     --bench x264,canneal --workload simsmall --trials 3 --summary
//! simstats energy --products-dir exp-output --mcpat-dir exp-output/mcpat \
//!     --tools mesi8,viser8 --bench x264,canneal
//! ```

pub mod aggregator;
pub mod commands;
pub mod keys;
pub mod output;
pub mod parser;
pub mod tools;
pub mod utils;
