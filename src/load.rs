// src/load.rs
use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Float64Array, Int64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path, sync::Arc};
use tracing::debug;

use crate::error::CleanseError;

#[derive(Debug)]
pub struct RawTable {
    /// Column names, from the header row of the source file.
    pub headers: Vec<String>,
    /// One entry per data row; `None` where the cell was blank or an NA token.
    pub rows: Vec<Vec<Option<String>>>,
}

/// Tokens read as a missing value, in addition to blank cells.
pub const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Trim whitespace. Blank cells and NA tokens are missing.
pub fn clean_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || NA_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Pick the most specific type every present value agrees on.
pub fn infer_column_type<'a, I>(values: I) -> DataType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = false;
    let mut all_int = true;
    let mut all_float = true;
    for v in values {
        seen = true;
        if all_int && v.parse::<i64>().is_err() {
            all_int = false;
        }
        if all_float && v.parse::<f64>().is_err() {
            all_float = false;
            break;
        }
    }
    match (seen, all_int, all_float) {
        (false, _, _) => DataType::Utf8,
        (true, true, _) => DataType::Int64,
        (true, false, true) => DataType::Float64,
        _ => DataType::Utf8,
    }
}

/// Read a headed, comma-delimited source into memory. Every record must carry
/// exactly as many fields as the header.
pub fn read_raw<R: Read>(reader: R) -> std::result::Result<RawTable, CleanseError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|source| CleanseError::Malformed { record: 0, source })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|source| CleanseError::Malformed {
            record: idx + 1,
            source,
        })?;
        rows.push(record.iter().map(clean_cell).collect());
    }

    Ok(RawTable { headers, rows })
}

#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_raw_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open source file: {:?}", path.as_ref()))?;
    let table = read_raw(file)
        .with_context(|| format!("Failed to parse source file: {:?}", path.as_ref()))?;
    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "read raw table"
    );
    Ok(table)
}

impl RawTable {
    fn column_values(&self, idx: usize) -> impl Iterator<Item = Option<&str>> + Clone {
        self.rows.iter().map(move |r| r[idx].as_deref())
    }

    /// Build the typed table, one inferred type per column.
    pub fn into_record_batch(self) -> std::result::Result<RecordBatch, CleanseError> {
        let mut fields = Vec::with_capacity(self.headers.len());
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(self.headers.len());

        for (i, name) in self.headers.iter().enumerate() {
            let ty = infer_column_type(self.column_values(i).flatten());
            let col: ArrayRef = match ty {
                DataType::Int64 => Arc::new(
                    self.column_values(i)
                        .map(|v| v.and_then(|s| s.parse::<i64>().ok()))
                        .collect::<Int64Array>(),
                ),
                DataType::Float64 => Arc::new(
                    self.column_values(i)
                        .map(|v| v.and_then(|s| s.parse::<f64>().ok()))
                        .collect::<Float64Array>(),
                ),
                _ => Arc::new(self.column_values(i).collect::<StringArray>()),
            };
            fields.push(Field::new(name, ty, true));
            columns.push(col);
        }

        let schema = Arc::new(Schema::new(fields));
        Ok(RecordBatch::try_new(schema, columns)?)
    }
}

/// Load a source file straight into a typed table.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<RecordBatch> {
    let raw = read_raw_csv(&path)?;
    raw.into_record_batch()
        .with_context(|| format!("Failed to type source file: {:?}", path.as_ref()))
}
