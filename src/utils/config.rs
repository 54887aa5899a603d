//! Configuration and constants for the aggregation pipeline.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Simulated hardware
pub const CLK_FREQUENCY: f64 = 1.6e9;
pub const ONCHIP_BW_GB: f64 = 100.0;
pub const OFFCHIP_BW_GB: f64 = 48.0;
pub const NUM_BYTES_FLIT: u64 = 16;
pub const DATA_LINE_SIZE: u64 = 64;
pub const NUM_BYTES_MEM_FLIT: u64 = DATA_LINE_SIZE;

/// Bandwidth figures are in GiB, i.e. 2^30 bytes
pub const BYTES_PER_GB: f64 = (1u64 << 30) as f64;

/// Digits kept when reporting merged values
pub const PRECISION_DIGITS: u32 = 3;

/// Core id of the aggregate record in a stats file
pub const GLOBAL_CPUID: i32 = -1;
/// Exclusive upper bound on per-core ids
pub const MAX_CORES: i32 = 32;

/// Default name of the tool that produces pintool statistics
pub const PINTOOL: &str = "pintool";

// File naming inside a run directory
pub const PINTOOL_STATS_SUFFIX: &str = "-stats.output";
pub const SIM_STATS_SUFFIX: &str = "-stats.py";
pub const MCPAT_SUFFIX: &str = "mcpat";

// Report file names
pub const RESULTS_FILE: &str = "results.json";
pub const SIM_STATS_TABLE_FILE: &str = "sim_stats_table.json";
pub const PINTOOL_STATS_TABLE_FILE: &str = "pintool_stats_table.json";
pub const OUTPUT_TABLE_FILE: &str = "output_table.json";
pub const ENERGY_STATS_TABLE_FILE: &str = "energy_stats_table.json";
pub const ENERGY_FILE: &str = "energy.json";

/// Environment variables that must be set before results can be attributed
/// to a tool installation
pub const REQUIRED_ENV_VARS: &[&str] = &[
    "PIN_ROOT",
    "PINTOOL_ROOT",
    "MESISIM_ROOT",
    "VISERSIM_ROOT",
    "VISER_EXP",
    "MCPAT_ROOT",
];

/// Optional environment variables (empty when unset)
pub const OPTIONAL_ENV_VARS: &[&str] = &["RCCSISIM_ROOT", "PARSEC_ROOT"];

/// Simulated hardware parameters used by the derived-metric formulas
///
/// Every field falls back to the built-in constant, so a TOML file only
/// needs to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HardwareConfig {
    /// Core clock in Hz
    pub clk_frequency: f64,

    /// On-chip bandwidth ceiling in GB/s
    pub onchip_bw_gb: f64,

    /// Off-chip bandwidth ceiling in GB/s
    pub offchip_bw_gb: f64,

    /// On-chip network flit size in bytes
    pub flit_bytes: u64,

    /// Data line size in bytes
    pub data_line_size: u64,

    /// Off-chip memory flit size in bytes
    pub mem_flit_bytes: u64,

    /// Fold AIM energy from McPAT into the reported power
    pub add_aim_mcpat: bool,

    /// Digits kept in merged table cells
    pub precision_digits: u32,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            clk_frequency: CLK_FREQUENCY,
            onchip_bw_gb: ONCHIP_BW_GB,
            offchip_bw_gb: OFFCHIP_BW_GB,
            flit_bytes: NUM_BYTES_FLIT,
            data_line_size: DATA_LINE_SIZE,
            mem_flit_bytes: NUM_BYTES_MEM_FLIT,
            add_aim_mcpat: true,
            precision_digits: PRECISION_DIGITS,
        }
    }
}

impl HardwareConfig {
    /// Reject parameters the bandwidth and traffic formulas cannot divide by
    ///
    /// # Errors
    /// * `ConfigError::Invalid` - a size, frequency or ceiling is not positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("clk_frequency", self.clk_frequency),
            ("onchip_bw_gb", self.onchip_bw_gb),
            ("offchip_bw_gb", self.offchip_bw_gb),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("flit_bytes", self.flit_bytes),
            ("data_line_size", self.data_line_size),
            ("mem_flit_bytes", self.mem_flit_bytes),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be non-zero", name)));
            }
        }

        Ok(())
    }
}

/// Load hardware parameters from a TOML file
///
/// # Arguments
/// * `path` - Path to the TOML configuration file
///
/// # Returns
/// Parsed HardwareConfig, with defaults for any field not present
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Toml` - If TOML is invalid
/// * `ConfigError::Invalid` - If a parameter fails [`HardwareConfig::validate`]
///
/// # Example
/// ```ignore
/// let hw = load_hardware_config("hardware.toml")?;
/// ```
pub fn load_hardware_config(path: impl AsRef<Path>) -> Result<HardwareConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: HardwareConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

/// Root directories of the external tools, taken from the environment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolPaths {
    pub pin_root: PathBuf,
    pub pintool_root: PathBuf,
    pub mesisim_root: PathBuf,
    pub visersim_root: PathBuf,
    pub viser_exp: PathBuf,
    pub mcpat_root: PathBuf,
    pub rccsisim_root: Option<PathBuf>,
    pub parsec_root: Option<PathBuf>,
}

impl ToolPaths {
    /// Read tool roots from the process environment
    ///
    /// **Public** - checked once at startup
    ///
    /// # Errors
    /// * `ConfigError::MissingEnv` - lists every required variable that is unset or empty
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build tool roots from an arbitrary variable lookup
    ///
    /// **Public** - lets callers and tests supply variables without touching
    /// the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing: Vec<String> = REQUIRED_ENV_VARS
            .iter()
            .filter(|&&name| get(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingEnv(missing));
        }

        let required = |name: &str| PathBuf::from(get(name).unwrap_or_default());

        Ok(Self {
            pin_root: required("PIN_ROOT"),
            pintool_root: required("PINTOOL_ROOT"),
            mesisim_root: required("MESISIM_ROOT"),
            visersim_root: required("VISERSIM_ROOT"),
            viser_exp: required("VISER_EXP"),
            mcpat_root: required("MCPAT_ROOT"),
            rccsisim_root: get("RCCSISIM_ROOT").map(PathBuf::from),
            parsec_root: get("PARSEC_ROOT").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_matches_constants() {
        let hw = HardwareConfig::default();
        assert_eq!(hw.clk_frequency, 1.6e9);
        assert_eq!(hw.onchip_bw_gb, 100.0);
        assert_eq!(hw.offchip_bw_gb, 48.0);
        assert_eq!(hw.flit_bytes, 16);
        assert_eq!(hw.mem_flit_bytes, 64);
        assert!(hw.add_aim_mcpat);
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "offchip_bw_gb = 24.0").unwrap();
        writeln!(file, "add_aim_mcpat = false").unwrap();

        let hw = load_hardware_config(file.path()).unwrap();
        assert_eq!(hw.offchip_bw_gb, 24.0);
        assert!(!hw.add_aim_mcpat);
        assert_eq!(hw.onchip_bw_gb, ONCHIP_BW_GB);
    }

    #[test]
    fn test_load_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "onchip_bw_gb = \"fast\"").unwrap();

        let result = load_hardware_config(file.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_zero_line_size_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_line_size = 0").unwrap();

        match load_hardware_config(file.path()) {
            Err(ConfigError::Invalid(reason)) => assert!(reason.contains("data_line_size")),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_non_positive_rates() {
        assert!(HardwareConfig::default().validate().is_ok());

        let zero_clock = HardwareConfig {
            clk_frequency: 0.0,
            ..HardwareConfig::default()
        };
        assert!(matches!(zero_clock.validate(), Err(ConfigError::Invalid(_))));

        let negative_ceiling = HardwareConfig {
            offchip_bw_gb: -48.0,
            ..HardwareConfig::default()
        };
        assert!(matches!(negative_ceiling.validate(), Err(ConfigError::Invalid(_))));

        let zero_flit = HardwareConfig {
            flit_bytes: 0,
            ..HardwareConfig::default()
        };
        assert!(matches!(zero_flit.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_env_lists_every_variable() {
        let lookup = lookup_from(&[("PIN_ROOT", "/opt/pin"), ("MCPAT_ROOT", "")]);

        match ToolPaths::from_lookup(lookup) {
            Err(ConfigError::MissingEnv(missing)) => {
                assert!(!missing.contains(&"PIN_ROOT".to_string()));
                assert!(missing.contains(&"MCPAT_ROOT".to_string()));
                assert!(missing.contains(&"VISER_EXP".to_string()));
                assert_eq!(missing.len(), REQUIRED_ENV_VARS.len() - 1);
            }
            other => panic!("expected MissingEnv, got {:?}", other),
        }
    }

    #[test]
    fn test_complete_env() {
        let lookup = lookup_from(&[
            ("PIN_ROOT", "/opt/pin"),
            ("PINTOOL_ROOT", "/opt/pintool"),
            ("MESISIM_ROOT", "/opt/mesi"),
            ("VISERSIM_ROOT", "/opt/viser"),
            ("VISER_EXP", "/opt/exp"),
            ("MCPAT_ROOT", "/opt/mcpat"),
        ]);

        let paths = ToolPaths::from_lookup(lookup).unwrap();
        assert_eq!(paths.mcpat_root, PathBuf::from("/opt/mcpat"));
        assert!(paths.rccsisim_root.is_none());
    }
}
