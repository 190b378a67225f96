// src/recipe/filter.rs
use arrow::{
    array::{Array, BooleanArray, Float64Array},
    compute::filter_record_batch,
    datatypes::DataType,
    record_batch::RecordBatch,
};

use super::{Predicate, Scalar};
use crate::error::CleanseError;
use crate::table::{column_index, float_column, int_column, string_column};

const STEP: &str = "drop_rows";

fn keep_rows(batch: &RecordBatch, keep: Vec<bool>) -> Result<RecordBatch, CleanseError> {
    let mask = BooleanArray::from(keep);
    Ok(filter_record_batch(batch, &mask)?)
}

/// Drop every row that is missing a value in any column. A float NaN counts
/// as missing.
pub fn drop_missing(batch: &RecordBatch) -> Result<RecordBatch, CleanseError> {
    let mut keep = vec![true; batch.num_rows()];
    for col in batch.columns() {
        if let Some(floats) = col.as_any().downcast_ref::<Float64Array>() {
            for (k, v) in keep.iter_mut().zip(floats.iter()) {
                if v.map_or(true, f64::is_nan) {
                    *k = false;
                }
            }
            continue;
        }
        if col.null_count() == 0 {
            continue;
        }
        for (row, k) in keep.iter_mut().enumerate() {
            if col.is_null(row) {
                *k = false;
            }
        }
    }
    keep_rows(batch, keep)
}

fn mismatch(column: &str, expected: &Scalar, found: &DataType) -> CleanseError {
    CleanseError::TypeMismatch {
        step: STEP.to_string(),
        column: column.to_string(),
        expected: format!("a column comparable with {expected}"),
        found: found.to_string(),
    }
}

/// Which rows of `column` match `value`. Null cells never match.
fn equals_mask(
    batch: &RecordBatch,
    column: &str,
    value: &Scalar,
) -> Result<Vec<bool>, CleanseError> {
    let idx = column_index(batch, STEP, column)?;
    let ty = batch.column(idx).data_type().clone();
    let mask = match (&ty, value) {
        (DataType::Int64, Scalar::Int(v)) => int_column(batch, STEP, column)?
            .iter()
            .map(|c| c == Some(*v))
            .collect(),
        (DataType::Float64, Scalar::Float(v)) => float_column(batch, STEP, column)?
            .iter()
            .map(|c| c == Some(*v))
            .collect(),
        (DataType::Float64, Scalar::Int(v)) => float_column(batch, STEP, column)?
            .iter()
            .map(|c| c == Some(*v as f64))
            .collect(),
        (DataType::Utf8, Scalar::Text(v)) => string_column(batch, STEP, column)?
            .iter()
            .map(|c| c == Some(v.as_str()))
            .collect(),
        _ => return Err(mismatch(column, value, &ty)),
    };
    Ok(mask)
}

fn max_mask(batch: &RecordBatch, column: &str) -> Result<Vec<bool>, CleanseError> {
    let idx = column_index(batch, STEP, column)?;
    let mask = match batch.column(idx).data_type() {
        DataType::Int64 => {
            let arr = int_column(batch, STEP, column)?;
            let max = arr.iter().flatten().max();
            arr.iter().map(|c| c.is_some() && c == max).collect()
        }
        DataType::Float64 => {
            let arr = float_column(batch, STEP, column)?;
            let max = arr.iter().flatten().fold(None, |acc: Option<f64>, v| {
                Some(acc.map_or(v, |a| a.max(v)))
            });
            arr.iter().map(|c| c.is_some() && c == max).collect()
        }
        other => {
            return Err(CleanseError::TypeMismatch {
                step: STEP.to_string(),
                column: column.to_string(),
                expected: "a numeric type".to_string(),
                found: other.to_string(),
            })
        }
    };
    Ok(mask)
}

/// Drop the rows where `column` satisfies `when`.
pub fn drop_rows(
    batch: &RecordBatch,
    column: &str,
    when: &Predicate,
) -> Result<RecordBatch, CleanseError> {
    let matches = match when {
        Predicate::Equals(value) => equals_mask(batch, column, value)?,
        Predicate::IsMax => max_mask(batch, column)?,
    };
    keep_rows(batch, matches.into_iter().map(|m| !m).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::{
        array::{Int64Array, StringArray},
        datatypes::{Field, Schema},
    };
    use std::sync::Arc;

    fn sample() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("vehicle_type", DataType::Utf8, true),
            Field::new("range", DataType::Int64, true),
            Field::new("base_msrp", DataType::Float64, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![
                    Some("Battery Electric Vehicle (BEV)"),
                    Some("Plug-in Hybrid Electric Vehicle (PHEV)"),
                    Some("Battery Electric Vehicle (BEV)"),
                    None,
                ])),
                Arc::new(Int64Array::from(vec![Some(291), Some(25), Some(0), Some(84)])),
                Arc::new(Float64Array::from(vec![
                    Some(0.0),
                    Some(845000.0),
                    Some(59900.0),
                    Some(31950.0),
                ])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn missing_value_disqualifies_row() {
        let out = drop_missing(&sample()).unwrap();
        assert_eq!(out.num_rows(), 3);
        assert_eq!(out.column(0).null_count(), 0);
    }

    #[test]
    fn nan_counts_as_missing() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("a", DataType::Utf8, true),
            Field::new("b", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["x", "y", "z"])),
                Arc::new(Float64Array::from(vec![Some(1.5), Some(f64::NAN), None])),
            ],
        )
        .unwrap();
        let out = drop_missing(&batch).unwrap();
        assert_eq!(out.num_rows(), 1);
        let b = out.column(1).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(b.value(0), 1.5);
    }

    #[test]
    fn drops_matching_category() {
        let out = drop_rows(
            &sample(),
            "vehicle_type",
            &Predicate::Equals(Scalar::Text(
                "Plug-in Hybrid Electric Vehicle (PHEV)".into(),
            )),
        )
        .unwrap();
        assert_eq!(out.num_rows(), 3);
        // null category is kept, it does not equal anything
        assert!(out.column(0).is_null(2));
    }

    #[test]
    fn drops_zero_and_max_sentinels() {
        let out = drop_rows(&sample(), "range", &Predicate::Equals(Scalar::Int(0))).unwrap();
        let out = drop_rows(&out, "base_msrp", &Predicate::IsMax).unwrap();
        let out = drop_rows(&out, "base_msrp", &Predicate::Equals(Scalar::Int(0))).unwrap();
        let range = out.column(1).as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(range.values().to_vec(), vec![84]);
    }

    #[test]
    fn incompatible_literal_is_type_mismatch() {
        let err = drop_rows(&sample(), "range", &Predicate::Equals(Scalar::Text("0".into())));
        assert!(matches!(err, Err(CleanseError::TypeMismatch { .. })));
        let err = drop_rows(&sample(), "vehicle_type", &Predicate::IsMax);
        assert!(matches!(err, Err(CleanseError::TypeMismatch { .. })));
    }
}
