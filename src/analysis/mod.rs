// src/analysis/mod.rs
//! Read-only analysis of a cleansed table.

pub mod regression;
pub mod stats;

use arrow::record_batch::RecordBatch;
use serde::Serialize;
use tracing::info;

pub use regression::{fit_columns, linear_regression, LinearFit};
pub use stats::{
    describe, histogram, table_info, value_counts, ColumnInfo, Histogram, Summary, ValueCount,
};

use crate::error::CleanseError;
use crate::recipe::Recipe;

pub const DEFAULT_BINS: usize = 10;

/// Regression of `y` on `x`, over a table prepared by its own recipe.
#[derive(Debug, Clone)]
pub struct RegressionPlan {
    pub x: String,
    pub y: String,
    /// Projection and row filters applied to a copy of the cleansed table.
    pub prepare: Recipe,
}

/// What to compute for one dataset.
#[derive(Debug, Clone, Default)]
pub struct AnalysisPlan {
    pub value_counts: Vec<String>,
    pub describe: Vec<String>,
    pub histograms: Vec<String>,
    pub regression: Option<RegressionPlan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountsReport {
    pub column: String,
    pub counts: Vec<ValueCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub dataset: String,
    pub rows: usize,
    pub info: Vec<ColumnInfo>,
    pub value_counts: Vec<CountsReport>,
    pub summaries: Vec<Summary>,
    pub histograms: Vec<Histogram>,
    pub regression: Option<LinearFit>,
}

impl AnalysisPlan {
    pub fn run(&self, dataset: &str, table: &RecordBatch) -> Result<Report, CleanseError> {
        let value_counts = self
            .value_counts
            .iter()
            .map(|c| {
                Ok(CountsReport {
                    column: c.clone(),
                    counts: value_counts(table, c)?,
                })
            })
            .collect::<Result<Vec<_>, CleanseError>>()?;
        let summaries = self
            .describe
            .iter()
            .map(|c| describe(table, c))
            .collect::<Result<Vec<_>, _>>()?;
        let histograms = self
            .histograms
            .iter()
            .map(|c| histogram(table, c, DEFAULT_BINS))
            .collect::<Result<Vec<_>, _>>()?;

        let regression = match &self.regression {
            Some(plan) => {
                let prepared = plan.prepare.apply(table.clone())?;
                let fit = fit_columns(&prepared, &plan.x, &plan.y)?;
                info!(
                    dataset,
                    n = fit.n,
                    r_squared = %format!("{:.2}", fit.r_squared),
                    equation = %fit.equation(),
                    "fitted regression"
                );
                Some(fit)
            }
            None => None,
        };

        Ok(Report {
            dataset: dataset.to_string(),
            rows: table.num_rows(),
            info: table_info(table),
            value_counts,
            summaries,
            histograms,
            regression,
        })
    }
}
