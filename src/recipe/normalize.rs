// src/recipe/normalize.rs
use arrow::{
    array::{Array, ArrayRef, Date32Array, Float64Array, Int64Array, StringArray},
    datatypes::DataType,
    record_batch::RecordBatch,
};
use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use super::{dates, Scalar};
use crate::error::CleanseError;
use crate::table::{
    append_column, column_index, date_column, float_column, int_column, replace_column,
    string_column,
};

/// Currency symbols, thousands separators and stray whitespace.
static CURRENCY_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[$£€,\s]").expect("valid currency pattern")
});

fn parse_error(column: &str, row: usize, value: &str, expected: &str) -> CleanseError {
    CleanseError::Parse {
        column: column.to_string(),
        row,
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

fn mismatch(step: &str, column: &str, expected: &str, found: &DataType) -> CleanseError {
    CleanseError::TypeMismatch {
        step: step.to_string(),
        column: column.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

/// Rewrite every present value of a Utf8 column with `f`; nulls stay null.
pub fn map_strings<F>(
    batch: &RecordBatch,
    step: &str,
    column: &str,
    f: F,
) -> Result<RecordBatch, CleanseError>
where
    F: Fn(&str) -> String,
{
    let idx = column_index(batch, step, column)?;
    let arr = string_column(batch, step, column)?;
    let mapped: StringArray = arr.iter().map(|opt| opt.map(&f)).collect();
    replace_column(batch, idx, Arc::new(mapped) as ArrayRef)
}

/// First character upper-case, everything after it lower-case.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Replace cells equal to `from` with `to`. Both literals must suit the column.
pub fn replace_value(
    batch: &RecordBatch,
    column: &str,
    from: &Scalar,
    to: &Scalar,
) -> Result<RecordBatch, CleanseError> {
    const STEP: &str = "replace_value";
    let idx = column_index(batch, STEP, column)?;
    let ty = batch.column(idx).data_type().clone();

    let out: ArrayRef = match (&ty, from, to) {
        (DataType::Int64, Scalar::Int(from), Scalar::Int(to)) => {
            let arr = int_column(batch, STEP, column)?;
            Arc::new(
                arr.iter()
                    .map(|v| v.map(|v| if v == *from { *to } else { v }))
                    .collect::<Int64Array>(),
            )
        }
        (DataType::Float64, _, _) => {
            let (from, to) = match (scalar_as_f64(from), scalar_as_f64(to)) {
                (Some(f), Some(t)) => (f, t),
                _ => return Err(mismatch(STEP, column, "numeric literals", &ty)),
            };
            let arr = float_column(batch, STEP, column)?;
            Arc::new(
                arr.iter()
                    .map(|v| v.map(|v| if v == from { to } else { v }))
                    .collect::<Float64Array>(),
            )
        }
        (DataType::Utf8, Scalar::Text(from), Scalar::Text(to)) => {
            let arr = string_column(batch, STEP, column)?;
            Arc::new(
                arr.iter()
                    .map(|v| v.map(|v| if v == from { to.as_str() } else { v }))
                    .collect::<StringArray>(),
            )
        }
        _ => {
            return Err(mismatch(
                STEP,
                column,
                &format!("a column matching {from} -> {to}"),
                &ty,
            ))
        }
    };
    replace_column(batch, idx, out)
}

fn scalar_as_f64(s: &Scalar) -> Option<f64> {
    match s {
        Scalar::Int(v) => Some(*v as f64),
        Scalar::Float(v) => Some(*v),
        Scalar::Text(_) => None,
    }
}

/// Strictly coerce a Utf8 column to Int64. Int64 columns pass through.
pub fn to_integer(batch: &RecordBatch, column: &str) -> Result<RecordBatch, CleanseError> {
    const STEP: &str = "to_integer";
    let idx = column_index(batch, STEP, column)?;
    match batch.column(idx).data_type() {
        DataType::Int64 => return Ok(batch.clone()),
        DataType::Utf8 => {}
        other => return Err(mismatch(STEP, column, "Utf8 or Int64", other)),
    }

    let arr = string_column(batch, STEP, column)?;
    let mut values = Vec::with_capacity(arr.len());
    for (row, opt) in arr.iter().enumerate() {
        values.push(match opt {
            Some(s) => Some(
                s.trim()
                    .parse::<i64>()
                    .map_err(|_| parse_error(column, row, s, "Int64"))?,
            ),
            None => None,
        });
    }
    replace_column(batch, idx, Arc::new(Int64Array::from(values)))
}

/// Strictly coerce a Utf8 or Int64 column to Float64.
pub fn to_float(batch: &RecordBatch, column: &str) -> Result<RecordBatch, CleanseError> {
    const STEP: &str = "to_float";
    let idx = column_index(batch, STEP, column)?;
    let values: Vec<Option<f64>> = match batch.column(idx).data_type() {
        DataType::Float64 => return Ok(batch.clone()),
        DataType::Int64 => int_column(batch, STEP, column)?
            .iter()
            .map(|v| v.map(|v| v as f64))
            .collect(),
        DataType::Utf8 => {
            let arr = string_column(batch, STEP, column)?;
            let mut values = Vec::with_capacity(arr.len());
            for (row, opt) in arr.iter().enumerate() {
                values.push(match opt {
                    Some(s) => Some(
                        s.trim()
                            .parse::<f64>()
                            .map_err(|_| parse_error(column, row, s, "Float64"))?,
                    ),
                    None => None,
                });
            }
            values
        }
        other => return Err(mismatch(STEP, column, "Utf8, Int64 or Float64", other)),
    };
    replace_column(batch, idx, Arc::new(Float64Array::from(values)))
}

/// Parse one currency-formatted cell, e.g. `"$1,234.50"`.
pub fn parse_currency_str(s: &str) -> Option<f64> {
    let cleaned = CURRENCY_NOISE.replace_all(s, "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert a currency column to numbers in base units. The result is Int64
/// when every scaled value is whole, otherwise Float64.
pub fn parse_currency(
    batch: &RecordBatch,
    column: &str,
    scale: i64,
) -> Result<RecordBatch, CleanseError> {
    const STEP: &str = "parse_currency";
    let idx = column_index(batch, STEP, column)?;
    let unscaled: Vec<Option<f64>> = match batch.column(idx).data_type() {
        DataType::Utf8 => {
            let arr = string_column(batch, STEP, column)?;
            let mut values = Vec::with_capacity(arr.len());
            for (row, opt) in arr.iter().enumerate() {
                values.push(match opt {
                    Some(s) => Some(
                        parse_currency_str(s)
                            .ok_or_else(|| parse_error(column, row, s, "currency"))?,
                    ),
                    None => None,
                });
            }
            values
        }
        DataType::Int64 => int_column(batch, STEP, column)?
            .iter()
            .map(|v| v.map(|v| v as f64))
            .collect(),
        DataType::Float64 => float_column(batch, STEP, column)?.iter().collect(),
        other => return Err(mismatch(STEP, column, "Utf8 or a numeric type", other)),
    };

    let scaled: Vec<Option<f64>> = unscaled
        .into_iter()
        .map(|v| v.map(|v| v * scale as f64))
        .collect();
    let whole = scaled
        .iter()
        .flatten()
        .all(|v| (v - v.round()).abs() < 1e-6 && v.abs() < i64::MAX as f64);

    let out: ArrayRef = if whole {
        Arc::new(
            scaled
                .into_iter()
                .map(|v| v.map(|v| v.round() as i64))
                .collect::<Int64Array>(),
        )
    } else {
        Arc::new(Float64Array::from(scaled))
    };
    replace_column(batch, idx, out)
}

/// Parse a Utf8 column under `format` into Date32.
pub fn parse_date(
    batch: &RecordBatch,
    column: &str,
    format: &str,
) -> Result<RecordBatch, CleanseError> {
    const STEP: &str = "parse_date";
    let idx = column_index(batch, STEP, column)?;
    let arr = string_column(batch, STEP, column)?;

    let mut values = Vec::with_capacity(arr.len());
    for (row, opt) in arr.iter().enumerate() {
        values.push(match opt {
            Some(s) => {
                let date = dates::parse_date(s, format)
                    .ok_or_else(|| parse_error(column, row, s, &format!("date `{format}`")))?;
                Some(dates::to_date32(date))
            }
            None => None,
        });
    }
    replace_column(batch, idx, Arc::new(Date32Array::from(values)))
}

/// Append `target` holding the calendar year of the Date32 column `source`.
pub fn derive_year(
    batch: &RecordBatch,
    source: &str,
    target: &str,
) -> Result<RecordBatch, CleanseError> {
    let arr = date_column(batch, "derive_year", source)?;
    let years: Int64Array = (0..arr.len())
        .map(|i| {
            if arr.is_null(i) {
                None
            } else {
                arr.value_as_date(i).map(|d| i64::from(d.year()))
            }
        })
        .collect();
    append_column(batch, target, Arc::new(years))
}
