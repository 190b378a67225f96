// src/error.rs

use thiserror::Error;

/// Everything that can go wrong while turning a raw table into a cleansed one.
///
/// I/O failures are not listed here; they travel as `anyhow::Error` with
/// context attached at the call site.
#[derive(Debug, Error)]
pub enum CleanseError {
    /// A step referenced a column that the table does not have.
    #[error("missing column `{column}` (step `{step}`)")]
    MissingColumn { step: String, column: String },

    /// A step was pointed at a column of the wrong type.
    #[error("column `{column}` has type {found}, step `{step}` expects {expected}")]
    TypeMismatch {
        step: String,
        column: String,
        expected: String,
        found: String,
    },

    /// A value could not be coerced to its target type.
    #[error("cannot parse `{value}` as {expected} in column `{column}` at row {row}")]
    Parse {
        column: String,
        row: usize,
        value: String,
        expected: String,
    },

    /// The source file does not follow the header's shape.
    #[error("malformed source record {record}: {source}")]
    Malformed {
        record: usize,
        #[source]
        source: csv::Error,
    },

    /// Not enough usable data for an analysis.
    #[error("analysis on `{column}`: {reason}")]
    Analysis { column: String, reason: String },

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
}
