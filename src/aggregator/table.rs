//! Summary tables of trial-merged statistics.
//!
//! A table has one row per metric key and one column per
//! (bench, workload, tool). Each cell is the mean over the trials of that
//! column, rounded to the configured precision.

use super::merge::round_to;
use super::result_set::dict_filter;
use crate::keys;
use crate::parser::schema::{probe, Experiment, StatRecord};
use crate::tools::{families_present, is_pintool, is_simulator, stats_file_path};
use crate::utils::config::{HardwareConfig, PINTOOL};
use crate::utils::error::AggregateError;
use serde::{Deserialize, Serialize};

/// One column of a stats table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub bench: String,
    pub workload: String,
    pub tool: String,
}

/// One metric across every column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub key: String,
    pub cells: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsTable {
    pub title: String,
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

impl StatsTable {
    /// Look up a cell by key and column
    pub fn cell(&self, key: &str, bench: &str, workload: &str, tool: &str) -> Option<f64> {
        let col = self
            .columns
            .iter()
            .position(|c| c.bench == bench && c.workload == workload && c.tool == tool)?;
        let row = self.rows.iter().find(|r| r.key == key)?;
        row.cells.get(col).copied()
    }
}

/// Build a table over the given rows and columns
///
/// **Public** - shared by the simulator, pintool and energy tables
///
/// A trial that lacks a row key counts as 0 for that cell.
///
/// # Errors
/// * `AggregateError::EmptySelection` - no record matches a column
/// * `AggregateError::NotNumeric` - a cell value is a string
pub fn build_table(
    title: &str,
    records: &[StatRecord],
    row_keys: &[&str],
    columns: Vec<Column>,
    digits: u32,
) -> Result<StatsTable, AggregateError> {
    let mut rows: Vec<TableRow> = row_keys
        .iter()
        .map(|key| TableRow {
            key: key.to_string(),
            cells: Vec::with_capacity(columns.len()),
        })
        .collect();

    for column in &columns {
        let selection = probe(&[
            (keys::BENCH, column.bench.as_str()),
            (keys::WORKLOAD, column.workload.as_str()),
            (keys::TOOL, column.tool.as_str()),
        ]);
        let trials = dict_filter(records, &selection);

        for row in rows.iter_mut() {
            if trials.is_empty() {
                return Err(AggregateError::EmptySelection {
                    bench: column.bench.clone(),
                    workload: column.workload.clone(),
                    tool: column.tool.clone(),
                    key: row.key.clone(),
                });
            }
            let mean = mean_or_zero(&trials, &row.key)?;
            row.cells.push(round_to(mean, digits));
        }
    }

    Ok(StatsTable {
        title: title.to_string(),
        columns,
        rows,
    })
}

/// **Private** - trial mean with absent keys counted as 0
fn mean_or_zero(trials: &[StatRecord], key: &str) -> Result<f64, AggregateError> {
    let mut sum = 0.0;
    for trial in trials {
        if let Some(value) = trial.get(key) {
            sum += value.as_f64().ok_or_else(|| AggregateError::NotNumeric {
                key: key.to_string(),
                value: value.to_string(),
            })?;
        }
    }
    Ok(sum / trials.len() as f64)
}

/// Columns ordered bench-major, then workload, then tool
pub fn columns<B, W, T>(benches: &[B], workloads: &[W], tools: &[T]) -> Vec<Column>
where
    B: AsRef<str>,
    W: AsRef<str>,
    T: AsRef<str>,
{
    let mut columns = Vec::new();
    for bench in benches {
        for workload in workloads {
            for tool in tools {
                columns.push(Column {
                    bench: bench.as_ref().to_string(),
                    workload: workload.as_ref().to_string(),
                    tool: tool.as_ref().to_string(),
                });
            }
        }
    }
    columns
}

/// Pintool statistics table
///
/// One column per bench and workload.
pub fn pintool_table<S: AsRef<str>>(
    records: &[StatRecord],
    benches: &[S],
    workloads: &[S],
    hw: &HardwareConfig,
) -> Result<StatsTable, AggregateError> {
    build_table(
        "Pintool stats",
        records,
        keys::PINTOOL_TABLE_KEYS,
        columns(benches, workloads, &[PINTOOL]),
        hw.precision_digits,
    )
}

/// Simulator statistics table
///
/// Rows are the common simulator keys plus those of every family present in
/// `tools`. Non-simulator tools get no column.
pub fn sim_stats_table<S: AsRef<str>>(
    records: &[StatRecord],
    benches: &[S],
    workloads: &[S],
    tools: &[S],
    hw: &HardwareConfig,
) -> Result<StatsTable, AggregateError> {
    let simulators: Vec<&str> = tools
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| is_simulator(t))
        .collect();
    let row_keys = keys::sim_table_keys(&families_present(&simulators));

    build_table(
        "Simulator stats",
        records,
        &row_keys,
        columns(benches, workloads, &simulators),
        hw.precision_digits,
    )
}

/// Energy statistics table over flattened energy records
pub fn energy_stats_table<S: AsRef<str>>(
    records: &[StatRecord],
    benches: &[S],
    workloads: &[S],
    tools: &[S],
    hw: &HardwareConfig,
) -> Result<StatsTable, AggregateError> {
    let simulators: Vec<&str> = tools
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| !is_pintool(t))
        .collect();

    build_table(
        "Energy stats",
        records,
        keys::ENERGY_TABLE_KEYS,
        columns(benches, workloads, &simulators),
        hw.precision_digits,
    )
}

/// Column of the output table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunColumn {
    pub trial: String,
    pub tool: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub bench: String,
    pub workload: String,

    /// Stats file per column, empty where the run is absent
    pub files: Vec<String>,
}

/// Which stats file every run was read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTable {
    pub columns: Vec<RunColumn>,
    pub rows: Vec<OutputRow>,
}

/// Build the output table of a result set
///
/// Rows and columns appear in the order experiments were collected.
pub fn output_table(experiments: &[Experiment]) -> OutputTable {
    let mut columns: Vec<RunColumn> = Vec::new();
    let mut row_ids: Vec<(String, String)> = Vec::new();

    for exp in experiments {
        let column = RunColumn {
            trial: exp.trial.clone(),
            tool: exp.tool.clone(),
        };
        if !columns.contains(&column) {
            columns.push(column);
        }
        let row_id = (exp.bench.clone(), exp.workload.clone());
        if !row_ids.contains(&row_id) {
            row_ids.push(row_id);
        }
    }

    let rows = row_ids
        .into_iter()
        .map(|(bench, workload)| {
            let files = columns
                .iter()
                .map(|col| {
                    experiments
                        .iter()
                        .find(|e| {
                            e.bench == bench
                                && e.workload == workload
                                && e.trial == col.trial
                                && e.tool == col.tool
                        })
                        .map(|e| {
                            stats_file_path(&e.workload, &e.trial, &e.bench, &e.tool)
                                .display()
                                .to_string()
                        })
                        .unwrap_or_default()
                })
                .collect();
            OutputRow {
                bench,
                workload,
                files,
            }
        })
        .collect();

    OutputTable { columns, rows }
}
