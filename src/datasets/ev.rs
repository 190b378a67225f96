// src/datasets/ev.rs
//! Washington State electric vehicle registrations.

use super::Dataset;
use crate::analysis::{AnalysisPlan, RegressionPlan};
use crate::recipe::{ColumnMapping, Predicate, Recipe, Scalar, Step};

pub const SOURCE: &str = "ev_dataset_washington.csv";
pub const OUTPUT: &str = "ev_dataset_washington_cleansed.parquet";

pub const PHEV: &str = "Plug-in Hybrid Electric Vehicle (PHEV)";

pub const DATASET: Dataset = Dataset {
    name: "ev",
    source: SOURCE,
    output: OUTPUT,
    recipe,
    analysis,
};

const COLUMNS: &[(&str, &str)] = &[
    ("VIN (1-10)", "vin"),
    ("County", "county"),
    ("City", "city"),
    ("State", "state"),
    ("Postal Code", "postal_code"),
    ("Model Year", "year"),
    ("Make", "make"),
    ("Model", "model"),
    ("Electric Vehicle Type", "vehicle_type"),
    ("Electric Range", "range"),
    ("Base MSRP", "base_msrp"),
    ("DOL Vehicle ID", "vehicle_id"),
    ("Electric Utility", "electric_utility"),
];

pub fn recipe() -> Recipe {
    Recipe::new(
        "ev_registrations",
        vec![
            // every source field counts, including the ones the rename drops
            Step::DropMissing,
            Step::Rename {
                columns: COLUMNS
                    .iter()
                    .map(|(from, to)| ColumnMapping::new(from, to))
                    .collect(),
            },
            Step::StripSuffix {
                column: "electric_utility".into(),
                suffix: " - (WA)".into(),
            },
            Step::Capitalize {
                column: "model".into(),
            },
            Step::Deduplicate,
        ],
    )
}

/// MSRP against range for fully electric vehicles with a listed price.
fn regression() -> RegressionPlan {
    let keep = ["base_msrp", "range", "vehicle_type"];
    RegressionPlan {
        x: "base_msrp".into(),
        y: "range".into(),
        prepare: Recipe::new(
            "ev_msrp_vs_range",
            vec![
                Step::Rename {
                    columns: keep.iter().map(|c| ColumnMapping::new(c, c)).collect(),
                },
                Step::DropRows {
                    column: "vehicle_type".into(),
                    when: Predicate::Equals(Scalar::Text(PHEV.into())),
                },
                Step::DropRows {
                    column: "range".into(),
                    when: Predicate::Equals(Scalar::Int(0)),
                },
                Step::DropRows {
                    column: "base_msrp".into(),
                    when: Predicate::IsMax,
                },
                Step::DropRows {
                    column: "base_msrp".into(),
                    when: Predicate::Equals(Scalar::Int(0)),
                },
            ],
        ),
    }
}

pub fn analysis() -> AnalysisPlan {
    AnalysisPlan {
        value_counts: vec!["make".into(), "vehicle_type".into()],
        describe: vec!["base_msrp".into(), "range".into()],
        histograms: vec!["range".into()],
        regression: Some(regression()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const RAW: &str = "\
VIN (1-10),County,City,State,Postal Code,Model Year,Make,Model,Electric Vehicle Type,Clean Alternative Fuel Vehicle (CAFV) Eligibility,Electric Range,Base MSRP,Legislative District,DOL Vehicle ID,Vehicle Location,Electric Utility,2020 Census Tract
5YJSA1E26H,King,Bellevue,WA,98004,2017,TESLA,MODEL S,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible,210,69900,41,100000001,POINT (-122.2 47.6),PUGET SOUND ENERGY INC - (WA),53033023901
5YJSA1E26H,King,Bellevue,WA,98004,2017,TESLA,MODEL S,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible,210,69900,41,100000001,POINT (-122.2 47.6),PUGET SOUND ENERGY INC - (WA),53033023901
WP0AA2A72J,King,Seattle,WA,98109,2018,PORSCHE,PANAMERA,Plug-in Hybrid Electric Vehicle (PHEV),Not eligible due to low battery range,14,845000,36,100000002,POINT (-122.3 47.6),CITY OF SEATTLE - (WA),53033006700
1N4AZ0CP5F,King,Kent,WA,98031,2015,NISSAN,LEAF,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible,100,30000,47,100000003,POINT (-122.2 47.4),PUGET SOUND ENERGY INC - (WA),53033029206
5YJ3E1EB0K,King,Renton,WA,98055,2019,TESLA,MODEL 3,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible,220,0,11,100000004,POINT (-122.2 47.5),PUGET SOUND ENERGY INC - (WA),53033025301
KNDCC3LG5L,King,Auburn,WA,98001,2020,KIA,NIRO,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible,250,40000,30,100000005,POINT (-122.2 47.3),PUGET SOUND ENERGY INC - (WA),53033030003
KM8K33AG1L,King,Kirkland,WA,98033,2020,HYUNDAI,KONA,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible,160,35000,48,100000006,POINT (-122.2 47.7),PUGET SOUND ENERGY INC - (WA),53033022300
5YJXCBE29G,King,Redmond,WA,98052,2016,TESLA,MODEL X,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible,200,,45,100000007,POINT (-122.1 47.7),PUGET SOUND ENERGY INC - (WA),53033032320
1G1FY6S07K,King,Seattle,WA,98115,2019,CHEVROLET,BOLT EV,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible,238,36620,,100000008,POINT (-122.3 47.7),CITY OF SEATTLE - (WA),53033004101
";

    #[test]
    fn cleanses_and_fits_regression() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(SOURCE), RAW)?;

        let report = DATASET.run_in(dir.path())?;
        assert!(dir.path().join(OUTPUT).is_file());
        // duplicate MODEL S collapsed, MODEL X missing its MSRP dropped,
        // BOLT missing only its legislative district dropped
        assert_eq!(report.rows, 6);

        let makes = &report.value_counts[0];
        assert_eq!(makes.column, "make");
        assert_eq!(makes.counts[0].value, "TESLA");
        assert_eq!(makes.counts[0].count, 2);
        assert!(makes.counts.iter().all(|c| c.value != "CHEVROLET"));

        // PHEV first, then the max-price MODEL S and the $0 MODEL 3,
        // leaving (30000, 100), (35000, 160), (40000, 250)
        let fit = report.regression.expect("regression");
        assert_eq!(fit.n, 3);
        assert!((fit.slope - 0.015).abs() < 1e-12);
        assert!((fit.intercept + 355.0).abs() < 1e-6);
        // 1 - 150 / 11400
        assert!((fit.r_squared - 11250.0 / 11400.0).abs() < 1e-9);
        assert_eq!(fit.equation(), "y = 0.0150x-355.0000");
        Ok(())
    }

    #[test]
    fn unmapped_fields_count_toward_missing() -> anyhow::Result<()> {
        let raw = crate::load::read_raw(RAW.as_bytes())?.into_record_batch()?;
        let out = recipe().apply(raw)?;
        assert_eq!(out.num_columns(), COLUMNS.len());
        let makes = crate::table::string_column(&out, "t", "make")?;
        assert!(makes.iter().flatten().all(|m| m != "CHEVROLET"));
        Ok(())
    }

    #[test]
    fn regression_prep_leaves_cleansed_table_untouched() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(SOURCE), RAW)?;
        let first = DATASET.run_in(dir.path())?;
        let second = DATASET.run_in(dir.path())?;
        assert_eq!(first.rows, second.rows);
        assert_eq!(first.regression, second.regression);
        Ok(())
    }
}
