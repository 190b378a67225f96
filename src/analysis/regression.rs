// src/analysis/regression.rs
use arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::error::CleanseError;
use crate::table::numeric_values;

/// Ordinary least-squares fit of `y = slope * x + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearFit {
    pub x: String,
    pub y: String,
    pub n: usize,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    pub fn equation(&self) -> String {
        format!("y = {:.4}x{:+.4}", self.slope, self.intercept)
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

fn insufficient(column: &str, reason: &str) -> CleanseError {
    CleanseError::Analysis {
        column: column.to_string(),
        reason: reason.to_string(),
    }
}

/// Fit over paired samples.
pub fn linear_regression(
    x_name: &str,
    y_name: &str,
    xs: &[f64],
    ys: &[f64],
) -> Result<LinearFit, CleanseError> {
    if xs.len() != ys.len() {
        return Err(insufficient(x_name, "x and y differ in length"));
    }
    if xs.len() < 2 {
        return Err(insufficient(x_name, "need at least two points"));
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        sxx += (x - mean_x).powi(2);
        sxy += (x - mean_x) * (y - mean_y);
    }
    if sxx == 0.0 {
        return Err(insufficient(x_name, "x has zero variance"));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        ss_res += (y - (slope * x + intercept)).powi(2);
        ss_tot += (y - mean_y).powi(2);
    }
    // constant y: perfect when the fit has no residual, uninformative otherwise
    let r_squared = if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(LinearFit {
        x: x_name.to_string(),
        y: y_name.to_string(),
        n: xs.len(),
        slope,
        intercept,
        r_squared,
    })
}

/// Fit `y` against `x` over the rows where both are present and not NaN.
pub fn fit_columns(batch: &RecordBatch, x: &str, y: &str) -> Result<LinearFit, CleanseError> {
    let xv = numeric_values(batch, "regression", x)?;
    let yv = numeric_values(batch, "regression", y)?;
    let (xs, ys): (Vec<f64>, Vec<f64>) = xv
        .into_iter()
        .zip(yv)
        .filter_map(|pair| match pair {
            (Some(a), Some(b)) if !a.is_nan() && !b.is_nan() => Some((a, b)),
            _ => None,
        })
        .unzip();
    linear_regression(x, y, &xs, &ys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_line() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [3.0, 5.0, 7.0, 9.0];
        let fit = linear_regression("x", "y", &xs, &ys).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert_eq!(fit.equation(), "y = 2.0000x+1.0000");
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn noisy_fit_is_deterministic() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 4.0, 5.0, 4.0, 5.0];
        let a = linear_regression("x", "y", &xs, &ys).unwrap();
        let b = linear_regression("x", "y", &xs, &ys).unwrap();
        assert_eq!(a, b);
        // slope 6/10, intercept 4 - 0.6*3, r² = 1 - 2.4/6
        assert!((a.slope - 0.6).abs() < 1e-12);
        assert!((a.intercept - 2.2).abs() < 1e-12);
        assert!((a.r_squared - 0.6).abs() < 1e-12);
    }

    #[test]
    fn column_fit_skips_nan_and_null() {
        use arrow::{
            array::{Float64Array, Int64Array},
            datatypes::{DataType, Field, Schema},
        };
        use std::sync::Arc;

        let schema = Arc::new(Schema::new(vec![
            Field::new("msrp", DataType::Float64, true),
            Field::new("range", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float64Array::from(vec![
                    Some(1.0),
                    Some(2.0),
                    Some(f64::NAN),
                    Some(3.0),
                    None,
                ])),
                Arc::new(Int64Array::from(vec![Some(3), Some(5), Some(100), Some(7), Some(9)])),
            ],
        )
        .unwrap();
        let fit = fit_columns(&batch, "msrp", "range").unwrap();
        assert_eq!(fit.n, 3);
        assert_eq!(fit.equation(), "y = 2.0000x+1.0000");
    }

    #[test]
    fn degenerate_inputs_are_errors() {
        assert!(linear_regression("x", "y", &[1.0], &[1.0]).is_err());
        assert!(linear_regression("x", "y", &[2.0, 2.0], &[1.0, 3.0]).is_err());
        assert!(linear_regression("x", "y", &[1.0, 2.0], &[1.0]).is_err());
    }
}
