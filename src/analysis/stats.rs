// src/analysis/stats.rs
use arrow::{array::Array, record_batch::RecordBatch};
use serde::Serialize;
use std::collections::HashMap;

use crate::error::CleanseError;
use crate::table::{cell_to_string, column_index, numeric_values};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub non_null: usize,
}

/// Per-column name, type and non-null count.
pub fn table_info(batch: &RecordBatch) -> Vec<ColumnInfo> {
    batch
        .schema()
        .fields()
        .iter()
        .zip(batch.columns())
        .map(|(f, col)| ColumnInfo {
            name: f.name().clone(),
            data_type: f.data_type().to_string(),
            non_null: col.len() - col.null_count(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
    /// Percentage of the non-null cells.
    pub share: f64,
}

/// Distinct values with their counts, most frequent first; ties by value.
pub fn value_counts(batch: &RecordBatch, column: &str) -> Result<Vec<ValueCount>, CleanseError> {
    let idx = column_index(batch, "value_counts", column)?;
    let arr = batch.column(idx);

    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in 0..arr.len() {
        if let Some(v) = cell_to_string(arr.as_ref(), row) {
            *counts.entry(v).or_default() += 1;
        }
    }

    let total: usize = counts.values().sum();
    let mut out: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount {
            value,
            count,
            share: 100.0 * count as f64 / total as f64,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub column: String,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation; absent below two values.
    pub std: Option<f64>,
}

fn present(batch: &RecordBatch, step: &str, column: &str) -> Result<Vec<f64>, CleanseError> {
    Ok(numeric_values(batch, step, column)?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

pub fn describe(batch: &RecordBatch, column: &str) -> Result<Summary, CleanseError> {
    let values = present(batch, "describe", column)?;
    if values.is_empty() {
        return Err(CleanseError::Analysis {
            column: column.to_string(),
            reason: "no values to describe".to_string(),
        });
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let std = (values.len() > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    });

    Ok(Summary {
        column: column.to_string(),
        count: values.len(),
        min,
        max,
        mean,
        std,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    /// `bins + 1` edges; every bin is half-open except the last.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Equal-width bins over the column's range. A constant column is centered
/// in a unit-wide range.
pub fn histogram(batch: &RecordBatch, column: &str, bins: usize) -> Result<Histogram, CleanseError> {
    let values = present(batch, "histogram", column)?;
    if values.is_empty() || bins == 0 {
        return Err(CleanseError::Analysis {
            column: column.to_string(),
            reason: "histogram needs values and at least one bin".to_string(),
        });
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut counts = vec![0usize; bins];
    for v in values {
        let bin = (((v - lo) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }

    Ok(Histogram {
        column: column.to_string(),
        edges,
        counts,
    })
}
