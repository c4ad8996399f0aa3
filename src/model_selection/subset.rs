//! Exhaustive best-subset regression.
//!
//! For every size `k` in `1..=max_size` all `C(m, k)` predictor subsets are
//! fitted with an intercept, in lexicographic order of candidate index, and
//! the minimum-RSS subset is kept (the first one found wins an exact tie).
//! Each winner is scored with R², adjusted R², BIC and Mallows' Cp:
//!
//! ```text
//! BIC = n ln(RSS / n) + (k + 1) ln n
//! Cp  = RSS / σ̂²_full - n + 2 (k + 1)
//! ```
//!
//! where `σ̂²_full` is the residual variance of the model on all candidates.

use crate::data::DataFrame;
use crate::error::{AnalysisError, Result};
use crate::linear_model::LinearRegression;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Best subset of one size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetResult {
    pub size: usize,
    /// Predictor names in candidate order.
    pub predictors: Vec<String>,
    pub rss: f64,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub bic: f64,
    /// Mallows' Cp; NaN when the all-candidates model cannot be fitted.
    pub cp: f64,
}

/// Outcome of a best-subset search, one [`SubsetResult`] per size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsetSearch {
    pub response: String,
    pub candidates: Vec<String>,
    pub n_observations: usize,
    /// Subsets fitted (singular ones excluded).
    pub models_evaluated: usize,
    pub results: Vec<SubsetResult>,
}

impl SubsetSearch {
    /// Winner of the given size, if that size was searched.
    #[must_use]
    pub fn best_of_size(&self, size: usize) -> Option<&SubsetResult> {
        self.results.iter().find(|r| r.size == size)
    }

    /// Size winner with the highest adjusted R².
    #[must_use]
    pub fn best_by_adj_r2(&self) -> Option<&SubsetResult> {
        self.results
            .iter()
            .reduce(|best, r| if r.adj_r_squared > best.adj_r_squared { r } else { best })
    }

    /// Size winner with the lowest BIC.
    #[must_use]
    pub fn best_by_bic(&self) -> Option<&SubsetResult> {
        self.results
            .iter()
            .reduce(|best, r| if r.bic < best.bic { r } else { best })
    }

    /// Size winner with the lowest Mallows' Cp.
    #[must_use]
    pub fn best_by_cp(&self) -> Option<&SubsetResult> {
        self.results
            .iter()
            .filter(|r| r.cp.is_finite())
            .reduce(|best, r| if r.cp < best.cp { r } else { best })
    }
}

/// Advances `indices` to the next `k`-combination of `0..n` in lexicographic
/// order. Returns false once the last combination has been passed.
fn next_combination(indices: &mut [usize], n: usize) -> bool {
    let k = indices.len();
    let Some(pos) = (0..k).rev().find(|&i| indices[i] < n - k + i) else {
        return false;
    };
    indices[pos] += 1;
    for i in pos + 1..k {
        indices[i] = indices[i - 1] + 1;
    }
    true
}

/// Runs the exhaustive search of `response` over `candidates`.
///
/// `max_size` is clamped to the number of candidates and to the largest size
/// that still leaves a residual degree of freedom. Subsets whose design
/// matrix is singular are skipped.
///
/// # Errors
///
/// Returns an error if a column is missing, the candidate list is empty or
/// has duplicates, `max_size` is zero, or no subset could be fitted.
///
/// # Examples
///
/// ```
/// use mpg_analysis::data::mtcars;
/// use mpg_analysis::model_selection::best_subset;
///
/// let cars = mtcars::frame().expect("bundled data");
/// let search = best_subset(&cars, "gp100m", &["hp", "wt", "qsec"], 2).expect("search");
/// assert_eq!(search.best_of_size(1).expect("size 1").predictors, vec!["wt"]);
/// ```
pub fn best_subset(
    frame: &DataFrame,
    response: &str,
    candidates: &[&str],
    max_size: usize,
) -> Result<SubsetSearch> {
    if candidates.is_empty() {
        return Err(AnalysisError::InvalidValue {
            field: "candidates".into(),
            value: "[]".into(),
            reason: "at least one candidate predictor is required".into(),
        });
    }
    if max_size == 0 {
        return Err(AnalysisError::InvalidValue {
            field: "max_size".into(),
            value: "0".into(),
            reason: "subset size must be at least 1".into(),
        });
    }
    let mut sorted = candidates.to_vec();
    sorted.sort_unstable();
    if let Some(dup) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(AnalysisError::InvalidValue {
            field: "candidates".into(),
            value: dup[0].to_string(),
            reason: "duplicate candidate predictor".into(),
        });
    }

    let y = frame.column(response)?;
    let columns = candidates
        .iter()
        .map(|name| frame.column(name))
        .collect::<Result<Vec<&Vector<f64>>>>()?;

    let n = y.len();
    let m = candidates.len();
    let max_size = max_size.min(m).min(n.saturating_sub(2));
    if max_size == 0 {
        return Err(AnalysisError::InsufficientData {
            needed: 3,
            actual: n,
        });
    }

    let y_mean = y.mean();
    let tss: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let full_sigma2 = full_model_variance(&columns, y, n, m);

    tracing::info!(
        response,
        candidates = m,
        max_size,
        "running best-subset search"
    );

    let mut results = Vec::with_capacity(max_size);
    let mut models_evaluated = 0;
    for size in 1..=max_size {
        let mut indices: Vec<usize> = (0..size).collect();
        let mut best: Option<(f64, Vec<usize>)> = None;
        loop {
            let chosen: Vec<&Vector<f64>> = indices.iter().map(|&j| columns[j]).collect();
            let x = Matrix::from_columns(&chosen, false)?;
            let mut model = LinearRegression::new();
            match model.fit(&x, y) {
                Ok(()) => {
                    models_evaluated += 1;
                    let rss = model.rss()?;
                    if best.as_ref().map_or(true, |(b, _)| rss < *b) {
                        best = Some((rss, indices.clone()));
                    }
                }
                Err(AnalysisError::SingularMatrix { .. }) => {
                    tracing::debug!(?indices, "skipping singular subset");
                }
                Err(e) => return Err(e),
            }
            if !next_combination(&mut indices, m) {
                break;
            }
        }

        let Some((rss, indices)) = best else {
            tracing::debug!(size, "every subset of this size was singular");
            continue;
        };
        let predictors: Vec<String> = indices.iter().map(|&j| candidates[j].to_string()).collect();
        let params = (size + 1) as f64;
        let nf = n as f64;
        let r_squared = 1.0 - rss / tss;
        let result = SubsetResult {
            size,
            r_squared,
            adj_r_squared: 1.0 - (1.0 - r_squared) * (nf - 1.0) / (nf - params),
            bic: nf * (rss / nf).ln() + params * nf.ln(),
            cp: full_sigma2.map_or(f64::NAN, |s2| rss / s2 - nf + 2.0 * params),
            rss,
            predictors,
        };
        tracing::debug!(size, predictors = ?result.predictors, rss, "best subset of size");
        results.push(result);
    }

    if results.is_empty() {
        return Err(AnalysisError::SingularMatrix {
            context: format!("every subset of {response} ~ {}", candidates.join(" + ")),
        });
    }

    Ok(SubsetSearch {
        response: response.to_string(),
        candidates: candidates.iter().map(|s| (*s).to_string()).collect(),
        n_observations: n,
        models_evaluated,
        results,
    })
}

/// Residual variance of the all-candidates model, if it can be fitted.
fn full_model_variance(columns: &[&Vector<f64>], y: &Vector<f64>, n: usize, m: usize) -> Option<f64> {
    if n <= m + 1 {
        return None;
    }
    let x = Matrix::from_columns(columns, false).ok()?;
    let mut model = LinearRegression::new();
    model.fit(&x, y).ok()?;
    Some(model.rss().ok()? / (n - m - 1) as f64)
}

#[cfg(test)]
#[path = "subset_tests.rs"]
mod tests;
