//! Averaging of a metric across trials.

use crate::parser::schema::{StatRecord, StatValue};
use crate::utils::error::AggregateError;

/// Mean of `key` across the records that contain it
///
/// **Public** - main entry point for trial merging
///
/// Records without the key are not counted in the denominator.
///
/// # Arguments
/// * `records` - One record per trial
/// * `key` - Metric to average
///
/// # Returns
/// A single-entry record `{key: mean}`
///
/// # Errors
/// * `AggregateError::NoData` - no record contains `key`
/// * `AggregateError::NotNumeric` - a value is a string
pub fn merge(records: &[StatRecord], key: &str) -> Result<StatRecord, AggregateError> {
    let mean = merge_value(records, key)?;
    let mut merged = StatRecord::new();
    merged.insert(key.to_string(), StatValue::Float(mean));
    Ok(merged)
}

/// Same as [`merge`], returning the bare mean
pub fn merge_value(records: &[StatRecord], key: &str) -> Result<f64, AggregateError> {
    let mut sum = 0.0;
    let mut count = 0usize;

    for value in records.iter().filter_map(|r| r.get(key)) {
        let x = value.as_f64().ok_or_else(|| AggregateError::NotNumeric {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        sum += x;
        count += 1;
    }

    if count == 0 {
        return Err(AggregateError::NoData(key.to_string()));
    }

    Ok(sum / count as f64)
}

/// Round half to even at `digits` decimal places
pub fn round_to(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (value * scale).round_ties_even() / scale
}

/// Store a computed count as an integer when it has no fractional part
pub fn count_value(value: f64) -> StatValue {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        StatValue::Int(value as i64)
    } else {
        StatValue::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, StatValue)]) -> StatRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_merge_mean() {
        let records = vec![
            record(&[("cycles", StatValue::Int(100))]),
            record(&[("cycles", StatValue::Int(200))]),
            record(&[("cycles", StatValue::Float(300.0))]),
        ];
        let merged = merge(&records, "cycles").unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged["cycles"], StatValue::Float(200.0));
    }

    #[test]
    fn test_merge_ignores_records_without_key() {
        let records = vec![
            record(&[("cycles", StatValue::Int(10))]),
            record(&[("other", StatValue::Int(1000))]),
            record(&[("cycles", StatValue::Int(20))]),
        ];
        assert_eq!(merge_value(&records, "cycles").unwrap(), 15.0);
    }

    #[test]
    fn test_merge_no_data() {
        let records = vec![record(&[("other", StatValue::Int(1))])];
        assert!(matches!(
            merge_value(&records, "cycles"),
            Err(AggregateError::NoData(_))
        ));
        assert!(matches!(merge_value(&[], "cycles"), Err(AggregateError::NoData(_))));
    }

    #[test]
    fn test_merge_rejects_strings() {
        let records = vec![record(&[("tool", StatValue::from("mesi8"))])];
        assert!(matches!(
            merge_value(&records, "tool"),
            Err(AggregateError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(2.0, 3), 2.0);
        assert_eq!(round_to(-0.0004, 3), -0.0);
        assert_eq!(round_to(0.0625, 3), 0.062);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
    }

    #[test]
    fn test_count_value() {
        assert_eq!(count_value(170.0), StatValue::Int(170));
        assert_eq!(count_value(1.5), StatValue::Float(1.5));
    }
}
