//! Regression diagnostics: leverage, standardized residuals, Cook's distance.
//!
//! ```text
//! hᵢ = xᵢᵀ (XᵀX)⁻¹ xᵢ
//! rᵢ = eᵢ / (σ̂ √(1 - hᵢ))
//! Dᵢ = rᵢ² hᵢ / (p (1 - hᵢ))
//! ```
//!
//! Flags are advisory; nothing here removes observations.

use super::LinearRegression;
use crate::error::Result;
use crate::stats::distribution::normal_quantile;
use crate::stats::normality::{shapiro_wilk, ShapiroWilkResult};
use serde::{Deserialize, Serialize};

/// Influence measures for one training observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationDiagnostics {
    pub label: String,
    pub fitted: f64,
    pub leverage: f64,
    pub residual: f64,
    pub standardized_residual: f64,
    pub cooks_distance: f64,
}

/// Per-observation diagnostics of a fitted model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
    pub observations: Vec<ObservationDiagnostics>,
    /// Parameters in the model, intercept included.
    pub n_params: usize,
}

impl Diagnostics {
    /// Computes diagnostics for every training row of `fit`.
    ///
    /// A row with leverage 1 gets infinite standardized residual and Cook's
    /// distance.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpg_analysis::data::mtcars;
    /// use mpg_analysis::linear_model::{Diagnostics, LinearRegression};
    ///
    /// let cars = mtcars::frame().expect("bundled data");
    /// let mut model = LinearRegression::new();
    /// model.fit_frame(&cars, "gp100m", &["wt", "wthp"]).expect("fit");
    ///
    /// let diagnostics = Diagnostics::compute(&model).expect("fitted");
    /// let worst = diagnostics.most_influential().expect("32 rows");
    /// assert_eq!(worst.label, "Chrysler Imperial");
    /// ```
    pub fn compute(fit: &LinearRegression) -> Result<Self> {
        let leverage = fit.leverage()?;
        let residuals = fit.residuals()?;
        let fitted = fit.fitted()?;
        let labels = fit.labels()?;
        let sigma = fit.sigma()?;
        let p = fit.n_params()?;

        let observations = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let h = leverage[i];
                let e = residuals[i];
                let standardized_residual = e / (sigma * (1.0 - h).sqrt());
                let cooks_distance = standardized_residual.powi(2) * h / (p as f64 * (1.0 - h));
                ObservationDiagnostics {
                    label: label.clone(),
                    fitted: fitted[i],
                    leverage: h,
                    residual: e,
                    standardized_residual,
                    cooks_distance,
                }
            })
            .collect();

        Ok(Self {
            observations,
            n_params: p,
        })
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True when there are no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Cook's distance cutoff `4 / n`.
    #[must_use]
    pub fn cooks_threshold(&self) -> f64 {
        4.0 / self.len() as f64
    }

    /// Leverage cutoff `2p / n`.
    #[must_use]
    pub fn leverage_threshold(&self) -> f64 {
        2.0 * self.n_params as f64 / self.len() as f64
    }

    /// Sum of leverages; equals the parameter count for a full-rank fit.
    #[must_use]
    pub fn hat_trace(&self) -> f64 {
        self.observations.iter().map(|o| o.leverage).sum()
    }

    /// Observations above either cutoff, largest Cook's distance first.
    #[must_use]
    pub fn flag_influential(&self) -> Vec<&ObservationDiagnostics> {
        let cooks = self.cooks_threshold();
        let leverage = self.leverage_threshold();
        let mut flagged: Vec<&ObservationDiagnostics> = self
            .observations
            .iter()
            .filter(|o| o.cooks_distance > cooks || o.leverage > leverage)
            .collect();
        flagged.sort_by(|a, b| b.cooks_distance.total_cmp(&a.cooks_distance));
        flagged
    }

    /// Observation with the largest Cook's distance.
    #[must_use]
    pub fn most_influential(&self) -> Option<&ObservationDiagnostics> {
        self.observations
            .iter()
            .max_by(|a, b| a.cooks_distance.total_cmp(&b.cooks_distance))
    }

    /// Diagnostics for the row labelled `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&ObservationDiagnostics> {
        self.observations.iter().find(|o| o.label == label)
    }

    /// Series behind the residual panels, in observation order.
    #[must_use]
    pub fn residual_panels(&self) -> ResidualPanels {
        let column = |f: fn(&ObservationDiagnostics) -> f64| -> Vec<f64> {
            self.observations.iter().map(f).collect()
        };
        let standardized_residuals = column(|o| o.standardized_residual);
        ResidualPanels {
            labels: self.observations.iter().map(|o| o.label.clone()).collect(),
            fitted: column(|o| o.fitted),
            residuals: column(|o| o.residual),
            theoretical_quantiles: normal_scores(&standardized_residuals),
            standardized_residuals,
            leverage: column(|o| o.leverage),
        }
    }

    /// Shapiro-Wilk test on the raw residuals.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 3 observations.
    pub fn residual_normality(&self) -> Result<ShapiroWilkResult> {
        let residuals: Vec<f64> = self.observations.iter().map(|o| o.residual).collect();
        shapiro_wilk(&residuals)
    }
}

/// Data for residuals vs fitted, normal Q-Q, scale-location and residuals
/// vs leverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidualPanels {
    pub labels: Vec<String>,
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
    pub standardized_residuals: Vec<f64>,
    /// Normal quantile matched to each standardized residual by rank.
    pub theoretical_quantiles: Vec<f64>,
    pub leverage: Vec<f64>,
}

impl ResidualPanels {
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `√|rᵢ|` for the scale-location panel.
    #[must_use]
    pub fn scale_location(&self) -> Vec<f64> {
        self.standardized_residuals
            .iter()
            .map(|r| r.abs().sqrt())
            .collect()
    }
}

/// Expected normal order statistics, `Φ⁻¹((i - a) / (n + 1 - 2a))` with
/// `a = 3/8` for n ≤ 10 and `1/2` otherwise, returned in input order.
fn normal_scores(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let a = if n <= 10 { 0.375 } else { 0.5 };
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));
    let mut scores = vec![0.0; n];
    for (rank, &i) in order.iter().enumerate() {
        let p = (rank as f64 + 1.0 - a) / (n as f64 + 1.0 - 2.0 * a);
        scores[i] = normal_quantile(p);
    }
    scores
}
