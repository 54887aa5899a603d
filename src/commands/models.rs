use std::path::PathBuf;

/// Arguments for the collect command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct CollectArgs {
    /// Root of the run directories (`<workload>/<trial>/<bench>`)
    pub output_dir: PathBuf,

    /// Where reports are written (defaults to the output directory)
    pub products_dir: Option<PathBuf>,

    /// Tool configurations, in column order
    pub tools: Vec<String>,

    pub benches: Vec<String>,

    pub workloads: Vec<String>,

    /// Number of trials, numbered from 1
    pub trials: u32,

    /// Optional TOML file overriding hardware parameters
    pub config: Option<PathBuf>,

    /// Print tables to stdout
    pub print_summary: bool,
}

impl Default for CollectArgs {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exp-output"),
            products_dir: None,
            tools: Vec::new(),
            benches: Vec::new(),
            workloads: vec!["simsmall".to_string()],
            trials: 1,
            config: None,
            print_summary: false,
        }
    }
}

impl CollectArgs {
    /// Directory reports go to
    pub fn products_dir(&self) -> PathBuf {
        self.products_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.clone())
    }
}

/// Arguments for the energy command
#[derive(Debug, Clone)]
pub struct EnergyArgs {
    /// Directory holding `results.json`; energy reports go here too
    pub products_dir: PathBuf,

    /// Directory holding `<bench>-<tool>-<workload>.mcpat` files
    pub mcpat_dir: PathBuf,

    pub tools: Vec<String>,

    pub benches: Vec<String>,

    pub workloads: Vec<String>,

    pub config: Option<PathBuf>,

    pub print_summary: bool,
}

impl Default for EnergyArgs {
    fn default() -> Self {
        Self {
            products_dir: PathBuf::from("exp-products"),
            mcpat_dir: PathBuf::from("exp-products/mcpat"),
            tools: Vec::new(),
            benches: Vec::new(),
            workloads: vec!["simsmall".to_string()],
            config: None,
            print_summary: false,
        }
    }
}
