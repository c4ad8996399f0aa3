//! Linear models for regression.
//!
//! Ordinary Least Squares with the classical inference R's `summary.lm`
//! reports: standard errors, t-tests, R², adjusted R², residual standard
//! error and the overall F-test. Residual diagnostics live in
//! [`diagnostics`].

pub mod diagnostics;

pub use diagnostics::{Diagnostics, ObservationDiagnostics, ResidualPanels};

use crate::data::DataFrame;
use crate::error::{AnalysisError, Result};
use crate::metrics::r_squared;
use crate::primitives::{Matrix, Vector};
use crate::stats::distribution::{f_sf, student_t_quantile, student_t_two_sided};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Name given to the intercept term in summaries.
pub const INTERCEPT: &str = "(Intercept)";

/// Ordinary Least Squares (OLS) linear regression.
///
/// Fits a linear model by minimizing the residual sum of squares between
/// observed targets and predicted targets. The model equation is:
///
/// ```text
/// y = X β + ε
/// ```
///
/// where `β` is the coefficient vector and `ε` is random error.
///
/// # Solver
///
/// Uses normal equations: `β = (X^T X)^-1 X^T y` via Cholesky decomposition.
/// The inverse `(X^T X)^-1` is kept for standard errors and leverage.
///
/// # Examples
///
/// ```
/// use mpg_analysis::prelude::*;
///
/// // Simple linear regression: y = 2x + 1
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("4x1");
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).expect("well-posed fit");
///
/// assert!((model.coefficients()[0] - 2.0).abs() < 1e-9);
/// assert!((model.intercept() - 1.0).abs() < 1e-9);
/// ```
///
/// # Performance
///
/// - Time complexity: O(n²p + p³) where n = samples, p = features
/// - Space complexity: O(np)
#[derive(Debug, Clone)]
pub struct LinearRegression {
    /// Whether to fit an intercept.
    fit_intercept: bool,
    /// Response name used in summaries.
    response: String,
    /// Predictor names, one per column of `x`.
    feature_names: Option<Vec<String>>,
    /// Observation labels for diagnostics.
    labels: Option<Vec<String>>,
    fitted: Option<FitState>,
}

#[derive(Debug, Clone)]
struct FitState {
    /// Full parameter vector (intercept first when fitted).
    beta: Vector<f64>,
    /// Slopes only.
    coefficients: Vector<f64>,
    intercept: f64,
    /// Design matrix including the intercept column.
    design: Matrix<f64>,
    xtx_inv: Matrix<f64>,
    y: Vector<f64>,
    fitted_values: Vector<f64>,
    residuals: Vector<f64>,
    rss: f64,
    labels: Vec<String>,
    feature_names: Vec<String>,
}

/// One row of a coefficient table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRow {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_value: f64,
    /// Two-sided p-value on `df_residual` degrees of freedom.
    pub p_value: f64,
}

/// Inference summary of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Model formula, e.g. `gp100m ~ wt + wthp`.
    pub formula: String,
    pub n_observations: usize,
    pub terms: Vec<CoefficientRow>,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    /// `sqrt(RSS / df_residual)`
    pub residual_std_error: f64,
    pub df_residual: usize,
    /// Overall F-test against the intercept-only model; NaN without slopes.
    pub f_statistic: f64,
    pub f_p_value: f64,
}

impl ModelSummary {
    /// Looks up a term by name.
    #[must_use]
    pub fn term(&self, name: &str) -> Option<&CoefficientRow> {
        self.terms.iter().find(|t| t.name == name)
    }
}

/// Confidence interval for one coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Creates a new `LinearRegression` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fit_intercept: true,
            response: "y".to_string(),
            feature_names: None,
            labels: None,
            fitted: None,
        }
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Names the response and predictors used in summaries.
    #[must_use]
    pub fn with_names(mut self, response: &str, features: &[&str]) -> Self {
        self.response = response.to_string();
        self.feature_names = Some(features.iter().map(|s| (*s).to_string()).collect());
        self
    }

    /// Labels observations for diagnostics (defaults to `"1"..="n"`).
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Fits `response ~ predictors` from named frame columns, taking row labels
    /// from the frame.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or the fit fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpg_analysis::data::mtcars;
    /// use mpg_analysis::linear_model::LinearRegression;
    ///
    /// let cars = mtcars::frame().expect("bundled data");
    /// let mut model = LinearRegression::new();
    /// model.fit_frame(&cars, "gp100m", &["wt"]).expect("fit");
    /// assert!((model.coefficients()[0] - 1.494).abs() < 1e-3);
    /// ```
    pub fn fit_frame(&mut self, frame: &DataFrame, response: &str, predictors: &[&str]) -> Result<()> {
        let x = frame.design_matrix(predictors, false)?;
        let y = frame.column(response)?.clone();
        self.response = response.to_string();
        self.feature_names = Some(predictors.iter().map(|s| (*s).to_string()).collect());
        self.labels = Some(frame.labels().to_vec());
        self.fit(&x, &y)
    }

    /// Returns the coefficients (excluding intercept).
    ///
    /// # Panics
    ///
    /// Panics if model is not fitted.
    #[must_use]
    pub fn coefficients(&self) -> &Vector<f64> {
        &self
            .fitted
            .as_ref()
            .expect("Model not fitted. Call fit() first.")
            .coefficients
    }

    /// Returns the intercept term (0.0 when unfitted or fitted without one).
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.fitted.as_ref().map_or(0.0, |s| s.intercept)
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Whether the model carries an intercept.
    #[must_use]
    pub fn has_intercept(&self) -> bool {
        self.fit_intercept
    }

    /// Response name.
    #[must_use]
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Predictor names (`x1`, `x2`, ... when fitted from a bare matrix).
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        self.fitted.as_ref().map_or_else(
            || self.feature_names.clone().unwrap_or_default(),
            |s| s.feature_names.clone(),
        )
    }

    /// `response ~ a + b`
    #[must_use]
    pub fn formula(&self) -> String {
        let names = self.feature_names();
        let rhs = if names.is_empty() {
            "1".to_string()
        } else {
            names.join(" + ")
        };
        format!("{} ~ {rhs}", self.response)
    }

    fn state(&self) -> Result<&FitState> {
        self.fitted
            .as_ref()
            .ok_or_else(|| AnalysisError::Other("Model not fitted. Call fit() first.".into()))
    }

    /// Number of estimated parameters, intercept included.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted.
    pub fn n_params(&self) -> Result<usize> {
        Ok(self.state()?.beta.len())
    }

    /// Number of observations used in the fit.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted.
    pub fn n_observations(&self) -> Result<usize> {
        Ok(self.state()?.y.len())
    }

    /// Residual degrees of freedom `n - p`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted.
    pub fn df_residual(&self) -> Result<usize> {
        let state = self.state()?;
        Ok(state.y.len() - state.beta.len())
    }

    /// Residual sum of squares.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted.
    pub fn rss(&self) -> Result<f64> {
        Ok(self.state()?.rss)
    }

    /// Residual standard error `σ̂ = sqrt(RSS / (n - p))`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted.
    pub fn sigma(&self) -> Result<f64> {
        Ok((self.rss()? / self.df_residual()? as f64).sqrt())
    }

    /// In-sample residuals `y - ŷ`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted.
    pub fn residuals(&self) -> Result<&Vector<f64>> {
        Ok(&self.state()?.residuals)
    }

    /// In-sample fitted values.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted.
    pub fn fitted(&self) -> Result<&Vector<f64>> {
        Ok(&self.state()?.fitted_values)
    }

    /// Observation labels of the training rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted.
    pub fn labels(&self) -> Result<&[String]> {
        Ok(&self.state()?.labels)
    }

    /// Hat-matrix diagonal `hᵢ = xᵢᵀ (XᵀX)⁻¹ xᵢ` for the training rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted.
    pub fn leverage(&self) -> Result<Vector<f64>> {
        let state = self.state()?;
        Ok((0..state.design.n_rows())
            .map(|i| state.xtx_inv.quadratic_form(state.design.row(i).as_slice()))
            .collect())
    }

    /// Coefficient table and goodness-of-fit statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted.
    pub fn summary(&self) -> Result<ModelSummary> {
        let state = self.state()?;
        let n = state.y.len();
        let p = state.beta.len();
        let df = n - p;
        let sigma2 = state.rss / df as f64;

        let terms = self
            .term_names(state)
            .into_iter()
            .enumerate()
            .map(|(j, name)| {
                let estimate = state.beta[j];
                let std_error = (sigma2 * state.xtx_inv.get(j, j)).sqrt();
                let t_value = estimate / std_error;
                CoefficientRow {
                    name,
                    estimate,
                    std_error,
                    t_value,
                    p_value: student_t_two_sided(t_value, df as f64),
                }
            })
            .collect();

        let tss = if self.fit_intercept {
            let mean = state.y.mean();
            state.y.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        } else {
            state.y.sum_of_squares()
        };
        let r2 = if tss > 0.0 { 1.0 - state.rss / tss } else { 0.0 };
        let df_total = if self.fit_intercept { n - 1 } else { n };
        let adj_r2 = 1.0 - (1.0 - r2) * df_total as f64 / df as f64;

        let df_model = p - usize::from(self.fit_intercept);
        let (f_statistic, f_p_value) = if df_model == 0 {
            (f64::NAN, f64::NAN)
        } else {
            let f = ((tss - state.rss) / df_model as f64) / sigma2;
            (f, f_sf(f, df_model as f64, df as f64))
        };

        Ok(ModelSummary {
            formula: self.formula(),
            n_observations: n,
            terms,
            r_squared: r2,
            adj_r_squared: adj_r2,
            residual_std_error: sigma2.sqrt(),
            df_residual: df,
            f_statistic,
            f_p_value,
        })
    }

    /// Two-sided `level` confidence intervals for every coefficient.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted or `level` is outside (0, 1).
    pub fn confint(&self, level: f64) -> Result<Vec<ConfidenceInterval>> {
        if !(level > 0.0 && level < 1.0) {
            return Err(AnalysisError::InvalidValue {
                field: "level".into(),
                value: level.to_string(),
                reason: "confidence level must be in (0, 1)".into(),
            });
        }
        let summary = self.summary()?;
        let t_crit = student_t_quantile(0.5 + level / 2.0, summary.df_residual as f64);
        Ok(summary
            .terms
            .into_iter()
            .map(|t| ConfidenceInterval {
                lower: t.estimate - t_crit * t.std_error,
                upper: t.estimate + t_crit * t.std_error,
                name: t.name,
            })
            .collect())
    }

    /// Predicts from the named columns of `frame` (no refitting).
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted or a predictor column is
    /// missing from `frame`.
    pub fn predict_frame(&self, frame: &DataFrame) -> Result<Vector<f64>> {
        let names = self.state()?.feature_names.clone();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let x = frame.design_matrix(&refs, false)?;
        self.predict(&x)
    }

    fn term_names(&self, state: &FitState) -> Vec<String> {
        let mut names = Vec::with_capacity(state.beta.len());
        if self.fit_intercept {
            names.push(INTERCEPT.to_string());
        }
        names.extend(state.feature_names.iter().cloned());
        names
    }
}

impl Estimator for LinearRegression {
    /// Fits the linear regression model using normal equations.
    ///
    /// Solves: β = (X^T X)^-1 X^T y
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Input dimensions don't match
    /// - There are no residual degrees of freedom (n ≤ p)
    /// - X^T X is singular (collinear or constant predictors)
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples != y.len() {
            return Err(AnalysisError::DimensionMismatch {
                expected: format!("{n_samples} targets"),
                actual: format!("{} targets", y.len()),
            });
        }

        let n_params = n_features + usize::from(self.fit_intercept);
        if n_samples <= n_params {
            return Err(AnalysisError::InsufficientData {
                needed: n_params + 1,
                actual: n_samples,
            });
        }

        let feature_names = match &self.feature_names {
            Some(names) if names.len() == n_features => names.clone(),
            Some(names) => {
                return Err(AnalysisError::DimensionMismatch {
                    expected: format!("{} named predictors", names.len()),
                    actual: format!("{n_features} columns"),
                })
            }
            None => (1..=n_features).map(|j| format!("x{j}")).collect(),
        };
        let labels = match &self.labels {
            Some(labels) if labels.len() == n_samples => labels.clone(),
            _ => (1..=n_samples).map(|i| i.to_string()).collect(),
        };

        let design = if self.fit_intercept {
            x.prepend_ones()
        } else {
            x.clone()
        };

        let singular = |_: &'static str| AnalysisError::SingularMatrix {
            context: format!("{} ~ {}", self.response, feature_names.join(" + ")),
        };
        let xtx = design.gram();
        let xty = design.t_matvec(y)?;
        let beta = xtx.cholesky_solve(&xty).map_err(singular)?;
        let xtx_inv = xtx.spd_inverse().map_err(singular)?;

        let fitted_values = design.matvec(&beta)?;
        let residuals = y.sub(&fitted_values);
        let rss = residuals.sum_of_squares();

        let (intercept, coefficients) = if self.fit_intercept {
            (beta[0], beta.slice(1, n_features + 1))
        } else {
            (0.0, beta.clone())
        };

        tracing::debug!(
            formula = %format!("{} ~ {}", self.response, feature_names.join(" + ")),
            n = n_samples,
            rss,
            "fitted OLS"
        );

        self.fitted = Some(FitState {
            beta,
            coefficients,
            intercept,
            design,
            xtx_inv,
            y: y.clone(),
            fitted_values,
            residuals,
            rss,
            labels,
            feature_names,
        });
        Ok(())
    }

    /// Predicts target values for input data.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        let state = self.state()?;
        if x.n_cols() != state.coefficients.len() {
            return Err(AnalysisError::DimensionMismatch {
                expected: format!("{} predictor columns", state.coefficients.len()),
                actual: format!("{} columns", x.n_cols()),
            });
        }
        Ok(x.matvec(&state.coefficients)?.add_scalar(state.intercept))
    }

    /// Computes the R² score.
    fn score(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        if y_pred.len() != y.len() {
            return Err(AnalysisError::DimensionMismatch {
                expected: format!("{} targets", y_pred.len()),
                actual: format!("{} targets", y.len()),
            });
        }
        Ok(r_squared(&y_pred, y))
    }
}

#[cfg(test)]
#[path = "linear_model_tests.rs"]
mod tests;
