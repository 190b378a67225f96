// src/datasets/mod.rs
//! The hard-coded datasets: where they live and how they are cleansed.

pub mod bond;
pub mod ev;

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::{
    analysis::{AnalysisPlan, Report},
    pipeline::Pipeline,
    recipe::Recipe,
};

pub struct Dataset {
    pub name: &'static str,
    pub source: &'static str,
    pub output: &'static str,
    pub recipe: fn() -> Recipe,
    pub analysis: fn() -> AnalysisPlan,
}

pub const ALL: &[Dataset] = &[ev::DATASET, bond::DATASET];

pub fn by_name(name: &str) -> Option<&'static Dataset> {
    ALL.iter().find(|d| d.name == name)
}

impl Dataset {
    /// Pipeline rooted at `base`; the fixed paths are relative to it.
    pub fn pipeline_in(&self, base: impl Into<PathBuf>) -> Pipeline {
        let base = base.into();
        Pipeline::new((self.recipe)(), base.join(self.source), base.join(self.output))
    }

    /// Cleanse (or reuse) the table, then analyse it.
    pub fn run_in(&self, base: impl Into<PathBuf>) -> Result<Report> {
        let cleansed = self.pipeline_in(base).run()?;
        info!(dataset = self.name, origin = ?cleansed.origin, "cleansed table ready");
        (self.analysis)()
            .run(self.name, &cleansed.table)
            .with_context(|| format!("analysing dataset `{}`", self.name))
    }

    pub fn run(&self) -> Result<Report> {
        self.run_in(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_resolvable() {
        for d in ALL {
            assert_eq!(by_name(d.name).map(|x| x.output), Some(d.output));
        }
        assert!(by_name("nope").is_none());
    }

    #[test]
    fn every_recipe_ends_in_deduplication() {
        for d in ALL {
            let recipe = (d.recipe)();
            assert!(matches!(
                recipe.steps.last(),
                Some(crate::recipe::Step::Deduplicate)
            ));
        }
    }
}
