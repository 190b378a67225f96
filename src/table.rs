// src/table.rs
//! Name-based access to the columns of a `RecordBatch`.

use arrow::{
    array::{Array, ArrayRef, Date32Array, Float64Array, Int64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use crate::error::CleanseError;

/// Index of `column`, or a `MissingColumn` error attributed to `step`.
pub fn column_index(batch: &RecordBatch, step: &str, column: &str) -> Result<usize, CleanseError> {
    batch
        .schema()
        .index_of(column)
        .map_err(|_| CleanseError::MissingColumn {
            step: step.to_string(),
            column: column.to_string(),
        })
}

fn mismatch(step: &str, column: &str, expected: &str, found: &DataType) -> CleanseError {
    CleanseError::TypeMismatch {
        step: step.to_string(),
        column: column.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

macro_rules! typed_column {
    ($name:ident, $arr:ty, $label:literal) => {
        pub fn $name<'a>(
            batch: &'a RecordBatch,
            step: &str,
            column: &str,
        ) -> Result<&'a $arr, CleanseError> {
            let idx = column_index(batch, step, column)?;
            let arr = batch.column(idx);
            arr.as_any()
                .downcast_ref::<$arr>()
                .ok_or_else(|| mismatch(step, column, $label, arr.data_type()))
        }
    };
}

typed_column!(string_column, StringArray, "Utf8");
typed_column!(int_column, Int64Array, "Int64");
typed_column!(float_column, Float64Array, "Float64");
typed_column!(date_column, Date32Array, "Date32");

/// Read a numeric column (Int64 or Float64) as `f64` values.
pub fn numeric_values(
    batch: &RecordBatch,
    step: &str,
    column: &str,
) -> Result<Vec<Option<f64>>, CleanseError> {
    let idx = column_index(batch, step, column)?;
    let arr = batch.column(idx);
    match arr.data_type() {
        DataType::Int64 => Ok(int_column(batch, step, column)?
            .iter()
            .map(|v| v.map(|i| i as f64))
            .collect()),
        DataType::Float64 => Ok(float_column(batch, step, column)?.iter().collect()),
        other => Err(mismatch(step, column, "a numeric type", other)),
    }
}

/// Swap column `idx` for `array`, taking the new type from the array itself.
pub fn replace_column(
    batch: &RecordBatch,
    idx: usize,
    array: ArrayRef,
) -> Result<RecordBatch, CleanseError> {
    let schema = batch.schema();
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    fields[idx] = Field::new(schema.field(idx).name(), array.data_type().clone(), true);

    let mut columns = batch.columns().to_vec();
    columns[idx] = array;
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Add `array` as a new trailing column named `name`.
pub fn append_column(
    batch: &RecordBatch,
    name: &str,
    array: ArrayRef,
) -> Result<RecordBatch, CleanseError> {
    let schema = batch.schema();
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    fields.push(Field::new(name, array.data_type().clone(), true));

    let mut columns = batch.columns().to_vec();
    columns.push(array);
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Render one cell for grouping and reports. Nulls render as `None`.
pub fn cell_to_string(arr: &dyn Array, row: usize) -> Option<String> {
    if arr.is_null(row) {
        return None;
    }
    let any = arr.as_any();
    if let Some(a) = any.downcast_ref::<StringArray>() {
        Some(a.value(row).to_string())
    } else if let Some(a) = any.downcast_ref::<Int64Array>() {
        Some(a.value(row).to_string())
    } else if let Some(a) = any.downcast_ref::<Float64Array>() {
        Some(a.value(row).to_string())
    } else if let Some(a) = any.downcast_ref::<Date32Array>() {
        a.value_as_date(row).map(|d| d.to_string())
    } else {
        arrow::util::display::array_value_to_string(arr, row).ok()
    }
}
