// src/recipe/dedup.rs
use arrow::{
    array::BooleanArray,
    compute::filter_record_batch,
    row::{RowConverter, SortField},
    record_batch::RecordBatch,
};
use std::collections::HashSet;

use crate::error::CleanseError;

/// Keep the first occurrence of every distinct row, in original order.
pub fn deduplicate(batch: &RecordBatch) -> Result<RecordBatch, CleanseError> {
    if batch.num_columns() == 0 || batch.num_rows() == 0 {
        return Ok(batch.clone());
    }

    let fields = batch
        .schema()
        .fields()
        .iter()
        .map(|f| SortField::new(f.data_type().clone()))
        .collect();
    let converter = RowConverter::new(fields)?;
    let rows = converter.convert_columns(batch.columns())?;

    let mut seen = HashSet::with_capacity(rows.num_rows());
    let keep: BooleanArray = rows.iter().map(|row| Some(seen.insert(row))).collect();

    Ok(filter_record_batch(batch, &keep)?)
}
