// src/recipe/mod.rs
//! Cleansing recipes: an ordered list of named table → table steps.

pub mod dates;
pub mod dedup;
pub mod filter;
pub mod normalize;
pub mod rename;

use arrow::{datatypes::Schema, record_batch::RecordBatch};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::CleanseError;

/// A literal used by filter and correction rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Text(v) => write!(f, "{v:?}"),
        }
    }
}

/// Row predicate for `Step::DropRows`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// The cell equals this value.
    Equals(Scalar),
    /// The cell holds the column's maximum (a placeholder sentinel).
    IsMax,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub from: String,
    pub to: String,
}

impl ColumnMapping {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Keep exactly the mapped columns, in mapping order, under their new names.
    Rename { columns: Vec<ColumnMapping> },
    /// Drop every row holding a null in any column.
    DropMissing,
    DropRows { column: String, when: Predicate },
    StripSuffix { column: String, suffix: String },
    StripPrefix { column: String, prefix: String },
    /// First character upper-case, the rest lower-case.
    Capitalize { column: String },
    ReplaceSubstring { column: String, from: String, to: String },
    ReplaceValue { column: String, from: Scalar, to: Scalar },
    ToInteger { column: String },
    ToFloat { column: String },
    /// Strip currency symbols and separators, then multiply by `scale`.
    ParseCurrency { column: String, scale: i64 },
    /// Parse with a chrono strftime format into a calendar date.
    ParseDate { column: String, format: String },
    DeriveYear { source: String, target: String },
    /// Remove rows equal to an earlier row in every column.
    Deduplicate,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Rename { .. } => "rename",
            Step::DropMissing => "drop_missing",
            Step::DropRows { .. } => "drop_rows",
            Step::StripSuffix { .. } => "strip_suffix",
            Step::StripPrefix { .. } => "strip_prefix",
            Step::Capitalize { .. } => "capitalize",
            Step::ReplaceSubstring { .. } => "replace_substring",
            Step::ReplaceValue { .. } => "replace_value",
            Step::ToInteger { .. } => "to_integer",
            Step::ToFloat { .. } => "to_float",
            Step::ParseCurrency { .. } => "parse_currency",
            Step::ParseDate { .. } => "parse_date",
            Step::DeriveYear { .. } => "derive_year",
            Step::Deduplicate => "deduplicate",
        }
    }

    /// The column this step reads, if it targets a single one.
    fn target_column(&self) -> Option<&str> {
        match self {
            Step::DropRows { column, .. }
            | Step::StripSuffix { column, .. }
            | Step::StripPrefix { column, .. }
            | Step::Capitalize { column }
            | Step::ReplaceSubstring { column, .. }
            | Step::ReplaceValue { column, .. }
            | Step::ToInteger { column }
            | Step::ToFloat { column }
            | Step::ParseCurrency { column, .. }
            | Step::ParseDate { column, .. } => Some(column.as_str()),
            Step::DeriveYear { source, .. } => Some(source.as_str()),
            Step::Rename { .. } | Step::DropMissing | Step::Deduplicate => None,
        }
    }

    /// Track column names through this step without touching data.
    fn columns_after(&self, mut columns: Vec<String>) -> Result<Vec<String>, CleanseError> {
        let missing = |column: &str| CleanseError::MissingColumn {
            step: self.name().to_string(),
            column: column.to_string(),
        };

        if let Step::Rename { columns: mapping } = self {
            if let Some(m) = mapping.iter().find(|m| !columns.contains(&m.from)) {
                return Err(missing(&m.from));
            }
            return Ok(mapping.iter().map(|m| m.to.clone()).collect());
        }

        if let Some(column) = self.target_column() {
            if !columns.iter().any(|c| c == column) {
                return Err(missing(column));
            }
        }
        if let Step::DeriveYear { target, .. } = self {
            columns.push(target.clone());
        }
        Ok(columns)
    }

    pub fn apply(&self, batch: &RecordBatch) -> Result<RecordBatch, CleanseError> {
        let step = self.name();
        match self {
            Step::Rename { columns } => rename::rename(batch, columns),
            Step::DropMissing => filter::drop_missing(batch),
            Step::DropRows { column, when } => filter::drop_rows(batch, column, when),
            Step::StripSuffix { column, suffix } => {
                normalize::map_strings(batch, step, column, |s| {
                    s.strip_suffix(suffix.as_str()).unwrap_or(s).to_string()
                })
            }
            Step::StripPrefix { column, prefix } => {
                normalize::map_strings(batch, step, column, |s| {
                    s.strip_prefix(prefix.as_str()).unwrap_or(s).to_string()
                })
            }
            Step::Capitalize { column } => {
                normalize::map_strings(batch, step, column, normalize::capitalize)
            }
            Step::ReplaceSubstring { column, from, to } => {
                normalize::map_strings(batch, step, column, |s| s.replace(from.as_str(), to))
            }
            Step::ReplaceValue { column, from, to } => {
                normalize::replace_value(batch, column, from, to)
            }
            Step::ToInteger { column } => normalize::to_integer(batch, column),
            Step::ToFloat { column } => normalize::to_float(batch, column),
            Step::ParseCurrency { column, scale } => {
                normalize::parse_currency(batch, column, *scale)
            }
            Step::ParseDate { column, format } => normalize::parse_date(batch, column, format),
            Step::DeriveYear { source, target } => normalize::derive_year(batch, source, target),
            Step::Deduplicate => dedup::deduplicate(batch),
        }
    }
}

/// A named, fixed sequence of steps for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Recipe {
    pub fn new(name: &str, steps: Vec<Step>) -> Self {
        Self {
            name: name.to_string(),
            steps,
        }
    }

    /// Check every column reference against `schema` before any data moves.
    pub fn validate(&self, schema: &Schema) -> Result<(), CleanseError> {
        let mut columns: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
        for step in &self.steps {
            columns = step.columns_after(columns)?;
        }
        Ok(())
    }

    pub fn apply(&self, batch: RecordBatch) -> Result<RecordBatch, CleanseError> {
        self.validate(&batch.schema())?;

        let mut current = batch;
        for step in &self.steps {
            let rows_before = current.num_rows();
            current = step.apply(&current)?;
            debug!(
                recipe = %self.name,
                step = step.name(),
                rows_before,
                rows_after = current.num_rows(),
                "applied step"
            );
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::{
        array::{Int64Array, StringArray},
        datatypes::{DataType, Field},
    };
    use std::sync::Arc;

    fn raw() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Make", DataType::Utf8, true),
            Field::new("Electric Utility", DataType::Utf8, true),
            Field::new("Electric Range", DataType::Int64, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![
                    Some("TESLA"),
                    Some("TESLA"),
                    None,
                ])),
                Arc::new(StringArray::from(vec![
                    Some("FooCorp - (WA)"),
                    Some("FooCorp - (WA)"),
                    Some("BarCorp - (WA)"),
                ])),
                Arc::new(Int64Array::from(vec![Some(291), Some(291), Some(0)])),
            ],
        )
        .unwrap()
    }

    fn recipe() -> Recipe {
        Recipe::new(
            "test",
            vec![
                Step::Rename {
                    columns: vec![
                        ColumnMapping::new("Make", "make"),
                        ColumnMapping::new("Electric Utility", "electric_utility"),
                        ColumnMapping::new("Electric Range", "range"),
                    ],
                },
                Step::DropMissing,
                Step::StripSuffix {
                    column: "electric_utility".into(),
                    suffix: " - (WA)".into(),
                },
                Step::Deduplicate,
            ],
        )
    }

    #[test]
    fn runs_steps_in_order() {
        let out = recipe().apply(raw()).unwrap();
        assert_eq!(out.num_rows(), 1);
        let utility = out
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(utility.value(0), "FooCorp");
        assert_eq!(out.schema().field(0).name(), "make");
    }

    #[test]
    fn validation_catches_stale_name_after_rename() {
        let mut r = recipe();
        r.steps.push(Step::Capitalize {
            column: "Make".into(),
        });
        match r.validate(&raw().schema()) {
            Err(CleanseError::MissingColumn { step, column }) => {
                assert_eq!(step, "capitalize");
                assert_eq!(column, "Make");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn validation_catches_absent_source_column() {
        let mut r = recipe();
        if let Step::Rename { columns } = &mut r.steps[0] {
            columns.push(ColumnMapping::new("VIN (1-10)", "vin"));
        }
        assert!(matches!(
            r.apply(raw()),
            Err(CleanseError::MissingColumn { .. })
        ));
    }

    #[test]
    fn derived_columns_are_visible_to_later_steps() {
        let schema = Schema::new(vec![Field::new("released", DataType::Utf8, true)]);
        let r = Recipe::new(
            "dates",
            vec![
                Step::DeriveYear {
                    source: "released".into(),
                    target: "year".into(),
                },
                Step::ToFloat {
                    column: "year".into(),
                },
            ],
        );
        assert!(r.validate(&schema).is_ok());
    }

    #[test]
    fn recipe_serializes_with_step_tags() {
        let yaml = serde_yaml::to_string(&recipe()).unwrap();
        assert!(yaml.contains("step: rename"));
        assert!(yaml.contains("step: drop_missing"));
        let back: Recipe = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, recipe());
    }
}
