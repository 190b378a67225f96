// src/pipeline.rs
use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use std::{
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::info;

use crate::{load, recipe::Recipe, store};

/// Where the returned table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Built from the raw source on this run and written out.
    Computed,
    /// Read back from an earlier run's output; the source was not touched.
    Reused,
}

#[derive(Debug)]
pub struct Cleansed {
    pub table: RecordBatch,
    pub origin: Origin,
}

/// One dataset's cleansing: raw source, recipe, memoized output.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub recipe: Recipe,
    pub source: PathBuf,
    pub output: PathBuf,
}

impl Pipeline {
    pub fn new(recipe: Recipe, source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            recipe,
            source: source.into(),
            output: output.into(),
        }
    }

    /// Return the cleansed table, computing and persisting it only when no
    /// output exists yet.
    #[tracing::instrument(level = "info", skip(self), fields(recipe = %self.recipe.name))]
    pub fn run(&self) -> Result<Cleansed> {
        let exists = store::cleansed_exists(&self.output);
        self.run_with(exists)
    }

    /// Same as `run`, with the existence query answered by the caller.
    pub fn run_with(&self, output_exists: bool) -> Result<Cleansed> {
        if output_exists {
            let table = store::read_cleansed(&self.output)?;
            info!(
                output = %self.output.display(),
                rows = table.num_rows(),
                "reusing cleansed table"
            );
            return Ok(Cleansed {
                table,
                origin: Origin::Reused,
            });
        }

        let start = Instant::now();
        let table = cleanse(&self.recipe, &self.source)?;
        store::write_cleansed(&table, &self.output)?;
        info!(
            output = %self.output.display(),
            rows = table.num_rows(),
            elapsed = ?start.elapsed(),
            "wrote cleansed table"
        );
        Ok(Cleansed {
            table,
            origin: Origin::Computed,
        })
    }
}

/// Load `source` and run `recipe` over it. Nothing is written.
pub fn cleanse(recipe: &Recipe, source: &Path) -> Result<RecordBatch> {
    let raw = load::load_csv(source)?;
    let rows_in = raw.num_rows();
    let table = recipe
        .apply(raw)
        .with_context(|| format!("cleansing {} with recipe `{}`", source.display(), recipe.name))?;
    info!(rows_in, rows_out = table.num_rows(), "cleansed");
    Ok(table)
}
