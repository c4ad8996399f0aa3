//! Core estimator trait.
//!
//! Every model fitted by the pipeline is a supervised regressor; the trait
//! is the seam that best-subset search and validation program against.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// Primary trait for supervised learning estimators.
///
/// Estimators implement fit/predict/score following sklearn conventions.
///
/// # Examples
///
/// ```
/// use mpg_analysis::prelude::*;
///
/// // Create training data: y = 2x + 1
/// let x_train = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("4x1");
/// let y_train = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// // Test data
/// let x_test = Matrix::from_vec(2, 1, vec![5.0, 6.0]).expect("2x1");
/// let y_test = Vector::from_slice(&[11.0, 13.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x_train, &y_train).expect("well-posed fit");
/// let predictions = model.predict(&x_test).expect("same width");
/// assert!((predictions[0] - 11.0).abs() < 1e-9);
/// let score = model.score(&x_test, &y_test).expect("same width");
/// assert!(score > 0.99);
/// ```
pub trait Estimator {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (dimension mismatch, singular matrix, etc.).
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()>;

    /// Predicts target values for input data.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted or `x` has the wrong width.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>>;

    /// Computes the R² score on `(x, y)`.
    ///
    /// # Errors
    ///
    /// Same as [`Estimator::predict`], plus a length mismatch with `y`.
    fn score(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<f64>;
}
