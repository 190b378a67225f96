// src/datasets/bond.rs
//! James Bond film metadata.

use super::Dataset;
use crate::analysis::{AnalysisPlan, RegressionPlan};
use crate::recipe::{ColumnMapping, Recipe, Scalar, Step};

pub const SOURCE: &str = "james_bond_data.csv";
pub const OUTPUT: &str = "james_bond_data_cleansed.parquet";

/// Release strings look like `"June, 1962"`.
pub const RELEASE_FORMAT: &str = "%B, %Y";

pub const DATASET: Dataset = Dataset {
    name: "bond",
    source: SOURCE,
    output: OUTPUT,
    recipe,
    analysis,
};

const COLUMNS: &[(&str, &str)] = &[
    ("Release", "release_date"),
    ("Movie", "movie_title"),
    ("Bond", "bond_actor"),
    ("Bond_Car_MFG", "car_manufacturer"),
    ("US_Gross", "income_usa"),
    ("World_Gross", "income_world"),
    ("Budget ($ 000s)", "movie_budget"),
    ("Film_Length", "film_length"),
    ("Avg_User_IMDB", "imdb"),
    ("Avg_User_Rtn_Tom", "rotten_tomatoes"),
    ("Martinis", "martinis_consumed"),
    ("BJB_Kill_Count", "bond_kills"),
];

fn replace(column: &str, from: &str, to: &str) -> Step {
    Step::ReplaceSubstring {
        column: column.into(),
        from: from.into(),
        to: to.into(),
    }
}

pub fn recipe() -> Recipe {
    Recipe::new(
        "bond_films",
        vec![
            Step::Rename {
                columns: COLUMNS
                    .iter()
                    .map(|(from, to)| ColumnMapping::new(from, to))
                    .collect(),
            },
            Step::DropMissing,
            Step::ParseCurrency {
                column: "income_usa".into(),
                scale: 1,
            },
            Step::ParseCurrency {
                column: "income_world".into(),
                scale: 1,
            },
            // stored in thousands
            Step::ParseCurrency {
                column: "movie_budget".into(),
                scale: 1000,
            },
            Step::StripSuffix {
                column: "film_length".into(),
                suffix: "mins".into(),
            },
            Step::ToInteger {
                column: "film_length".into(),
            },
            Step::ReplaceValue {
                column: "film_length".into(),
                from: Scalar::Int(1200),
                to: Scalar::Int(120),
            },
            Step::ParseDate {
                column: "release_date".into(),
                format: RELEASE_FORMAT.into(),
            },
            Step::DeriveYear {
                source: "release_date".into(),
                target: "release_year".into(),
            },
            replace("bond_actor", "Shawn", "Sean"),
            replace("bond_actor", "MOORE", "Moore"),
            replace("car_manufacturer", "Astin", "Aston"),
            Step::ToInteger {
                column: "martinis_consumed".into(),
            },
            Step::ReplaceValue {
                column: "martinis_consumed".into(),
                from: Scalar::Int(-6),
                to: Scalar::Int(6),
            },
            Step::ToFloat {
                column: "imdb".into(),
            },
            Step::ToFloat {
                column: "rotten_tomatoes".into(),
            },
            Step::Deduplicate,
        ],
    )
}

pub fn analysis() -> AnalysisPlan {
    AnalysisPlan {
        value_counts: vec!["bond_actor".into()],
        describe: vec!["film_length".into(), "imdb".into(), "rotten_tomatoes".into()],
        histograms: vec!["imdb".into()],
        regression: Some(RegressionPlan {
            x: "imdb".into(),
            y: "rotten_tomatoes".into(),
            prepare: Recipe::new(
                "bond_imdb_vs_rotten_tomatoes",
                vec![Step::Rename {
                    columns: vec![
                        ColumnMapping::new("imdb", "imdb"),
                        ColumnMapping::new("rotten_tomatoes", "rotten_tomatoes"),
                    ],
                }],
            ),
        }),
    }
}
