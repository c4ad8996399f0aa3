//! Covariance and correlation computations.
//!
//! ```text
//! Cov(X, Y) = (1/n) Σ (x_i - x̄)(y_i - ȳ)
//! ρ(X, Y)   = Cov(X, Y) / (σ_X σ_Y)
//! ```
//!
//! # Examples
//!
//! ```
//! use mpg_analysis::stats::{cov, corr};
//! use mpg_analysis::primitives::Vector;
//!
//! let x = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
//! let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0, 10.0]);
//!
//! let covariance = cov(&x, &y).expect("covariance should compute");
//! let correlation = corr(&x, &y).expect("correlation should compute");
//!
//! assert!(covariance > 0.0);
//! assert!((correlation - 1.0).abs() < 1e-12);
//! ```

use crate::error::{AnalysisError, Result};
use crate::primitives::{Matrix, Vector};

/// Computes the covariance between two vectors.
///
/// # Errors
///
/// Returns error if vectors have different lengths or are empty.
pub fn cov(x: &Vector<f64>, y: &Vector<f64>) -> Result<f64> {
    let n = check_pair(x, y)?;

    let x_mean = x.mean();
    let y_mean = y.mean();

    let cov_sum: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| (xi - x_mean) * (yi - y_mean))
        .sum();

    Ok(cov_sum / n as f64)
}

/// Computes the Pearson correlation coefficient between two vectors.
///
/// # Errors
///
/// Returns error if vectors have different lengths, are empty, or have zero variance.
pub fn corr(x: &Vector<f64>, y: &Vector<f64>) -> Result<f64> {
    check_pair(x, y)?;

    let x_mean = x.mean();
    let y_mean = y.mean();

    let mut cov_sum = 0.0;
    let mut x_var_sum = 0.0;
    let mut y_var_sum = 0.0;

    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let x_diff = xi - x_mean;
        let y_diff = yi - y_mean;
        cov_sum += x_diff * y_diff;
        x_var_sum += x_diff * x_diff;
        y_var_sum += y_diff * y_diff;
    }

    if x_var_sum < 1e-20 || y_var_sum < 1e-20 {
        return Err(AnalysisError::Other(
            "Cannot compute correlation when variance is zero".into(),
        ));
    }

    Ok(cov_sum / (x_var_sum.sqrt() * y_var_sum.sqrt()))
}

fn check_pair(x: &Vector<f64>, y: &Vector<f64>) -> Result<usize> {
    let n = x.len();
    if n != y.len() {
        return Err(AnalysisError::DimensionMismatch {
            expected: format!("{n} values in x"),
            actual: format!("{} values in y", y.len()),
        });
    }
    if n == 0 {
        return Err(AnalysisError::InsufficientData {
            needed: 1,
            actual: 0,
        });
    }
    Ok(n)
}

/// Computes the Pearson correlation matrix for a data matrix.
///
/// Entry (i, j) is the correlation between column i and column j; the
/// diagonal is exactly 1.0.
///
/// # Errors
///
/// Returns error if data is empty or any column has zero variance.
pub fn corr_matrix(data: &Matrix<f64>) -> Result<Matrix<f64>> {
    let (n, p) = data.shape();
    if n == 0 || p == 0 {
        return Err(AnalysisError::Other(
            "Cannot compute correlation matrix for empty data".into(),
        ));
    }

    let columns: Vec<Vector<f64>> = (0..p).map(|j| data.column(j)).collect();
    let mut out = Matrix::eye(p);
    for i in 0..p {
        for j in 0..i {
            let r = corr(&columns[i], &columns[j]).map_err(|_| {
                AnalysisError::Other(format!("Feature {} has zero variance", i.max(j)))
            })?;
            out.set(i, j, r);
            out.set(j, i, r);
        }
    }
    Ok(out)
}
