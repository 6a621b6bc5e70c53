//! Summary statistics over a numeric field.

use serde::Serialize;

use crate::value::Value;

/// Summary of a numeric field's distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStats {
    /// Number of numeric values seen.
    pub count: usize,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median (mean of the two middle values for even counts).
    pub median: f64,
    /// Number of distinct values.
    pub unique_values: usize,
    /// 25th percentile.
    pub p25: f64,
    /// 75th percentile.
    pub p75: f64,
    /// 90th percentile.
    pub p90: f64,
    /// 95th percentile.
    pub p95: f64,
}

/// Computes statistics for the numeric values of `field`.
///
/// List values contribute every numeric element; NaN and non-numeric values
/// are skipped. Returns `None` when no numeric value is found.
pub fn field_stats<T, F>(items: &[T], field: &str, accessor: F) -> Option<FieldStats>
where
    for<'a> F: Fn(&'a T, &str) -> Value<'a>,
{
    let mut values: Vec<f64> = items
        .iter()
        .flat_map(|item| {
            accessor(item, field)
                .elements()
                .iter()
                .filter_map(|v| v.as_number())
                .map(|n| n.to_f64())
                .collect::<Vec<_>>()
        })
        .filter(|v| !v.is_nan())
        .collect();

    if values.is_empty() {
        return None;
    }

    values.sort_by(f64::total_cmp);
    let count = values.len();
    let median = if count % 2 == 1 {
        values[count / 2]
    } else {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    };
    let mut distinct = values.clone();
    distinct.dedup();

    // nearest rank: index floor(count * p), always < count for p < 1
    let percentile = |p: f64| values[((count as f64) * p) as usize];

    Some(FieldStats {
        count,
        min: values[0],
        max: values[count - 1],
        mean: values.iter().sum::<f64>() / count as f64,
        median,
        unique_values: distinct.len(),
        p25: percentile(0.25),
        p75: percentile(0.75),
        p90: percentile(0.90),
        p95: percentile(0.95),
    })
}
