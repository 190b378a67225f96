// src/recipe/rename.rs
use arrow::{
    array::ArrayRef,
    datatypes::{Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use super::ColumnMapping;
use crate::error::CleanseError;
use crate::table::column_index;

/// Project onto the mapped columns, in mapping order, under their canonical
/// names. Columns without a mapping do not survive.
pub fn rename(batch: &RecordBatch, mapping: &[ColumnMapping]) -> Result<RecordBatch, CleanseError> {
    let schema = batch.schema();
    let mut fields = Vec::with_capacity(mapping.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(mapping.len());

    for m in mapping {
        let idx = column_index(batch, "rename", &m.from)?;
        let src = schema.field(idx);
        fields.push(Field::new(&m.to, src.data_type().clone(), src.is_nullable()));
        columns.push(batch.column(idx).clone());
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}
