//! Filtering, key union and back-filling over lists of stat records.
//!
//! All functions are pure: they return new records and never alias the
//! input, except `inflate`, which fills missing keys in place.

use crate::keys;
use crate::parser::schema::{Experiment, StatRecord, StatValue};
use crate::tools::{is_pintool, is_simulator};
use crate::utils::error::AggregateError;
use log::debug;
use std::collections::BTreeSet;

/// Records that contain `key`
pub fn key_filter(records: &[StatRecord], key: &str) -> Vec<StatRecord> {
    records
        .iter()
        .filter(|r| r.contains_key(key))
        .cloned()
        .collect()
}

/// Records whose fields include every entry of `probe`, as independent copies
///
/// # Example
/// ```ignore
/// let trials = dict_filter(&records, &probe(&[("bench", "x264"), ("tool", "viser8")]));
/// ```
pub fn dict_filter(records: &[StatRecord], probe: &StatRecord) -> Vec<StatRecord> {
    records
        .iter()
        .filter(|r| probe.iter().all(|(k, v)| r.get(k) == Some(v)))
        .cloned()
        .collect()
}

/// Every key that appears in at least one record
pub fn key_union(records: &[StatRecord]) -> BTreeSet<String> {
    records.iter().flat_map(|r| r.keys().cloned()).collect()
}

/// Give every record every key in `keys`, defaulting missing ones to 0.0
///
/// Existing values are left untouched.
pub fn inflate<'a, I>(records: &mut [StatRecord], keys: I)
where
    I: IntoIterator<Item = &'a String> + Clone,
{
    for record in records.iter_mut() {
        for key in keys.clone() {
            record
                .entry(key.clone())
                .or_insert(StatValue::Float(0.0));
        }
    }
}

/// Flatten an experiment to its metadata plus the global record
///
/// Per-core records are dropped. A global statistic takes precedence over
/// same-named metadata.
///
/// # Errors
/// * `AggregateError::MissingGlobal` - the experiment has no global record
pub fn extract_global(experiment: &Experiment) -> Result<StatRecord, AggregateError> {
    let global = experiment
        .global()
        .ok_or_else(|| AggregateError::MissingGlobal {
            bench: experiment.bench.clone(),
            tool: experiment.tool.clone(),
        })?;

    let mut flat = experiment.metadata();
    flat.extend(global.iter().map(|(k, v)| (k.clone(), v.clone())));
    Ok(flat)
}

/// Flatten and back-fill a collected run for tabulation
///
/// **Public** - bridges collection and the table/energy stages
///
/// Simulator experiments are flattened with [`extract_global`] and inflated
/// to the union of their keys. Pintool experiments are flattened without
/// inflation and come first. Other tools are dropped.
///
/// # Errors
/// * `AggregateError::MissingGlobal` - an experiment has no global record
pub fn prepare_tabulation(experiments: &[Experiment]) -> Result<Vec<StatRecord>, AggregateError> {
    let mut pintool = Vec::new();
    let mut simulator = Vec::new();

    for experiment in experiments {
        if is_pintool(&experiment.tool) {
            pintool.push(extract_global(experiment)?);
        } else if is_simulator(&experiment.tool) {
            simulator.push(extract_global(experiment)?);
        }
    }

    let all_keys = key_union(&simulator);
    debug!(
        "Inflating {} simulator records to {} keys",
        simulator.len(),
        all_keys.len()
    );
    inflate(&mut simulator, &all_keys);

    pintool.extend(simulator);
    Ok(pintool)
}

/// Metadata value of a flattened record
pub fn meta<'a>(record: &'a StatRecord, key: &str) -> &'a str {
    record.get(key).and_then(StatValue::as_str).unwrap_or("")
}

/// Tool name of a flattened record
pub fn tool_of(record: &StatRecord) -> &str {
    meta(record, keys::TOOL)
}
