//! Out-of-sample validation on a held-out table.
//!
//! Candidates are fitted once on the road-test table and only asked to
//! predict here; nothing is refitted on the held-out rows.

use crate::data::DataFrame;
use crate::error::{AnalysisError, Result};
use crate::linear_model::LinearRegression;
use crate::metrics::rmse;
use serde::{Deserialize, Serialize};

/// A named, fitted model competing in validation.
#[derive(Debug, Clone)]
pub struct CandidateModel {
    pub name: String,
    pub predictors: Vec<String>,
    pub model: LinearRegression,
    /// Fitted on the table with the outlier removed.
    pub reduced: bool,
}

impl CandidateModel {
    /// Fits `response ~ predictors` on `frame` and wraps the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or the fit fails.
    pub fn fit(
        name: impl Into<String>,
        frame: &DataFrame,
        response: &str,
        predictors: &[&str],
        reduced: bool,
    ) -> Result<Self> {
        let mut model = LinearRegression::new();
        model.fit_frame(frame, response, predictors)?;
        Ok(Self {
            name: name.into(),
            predictors: predictors.iter().map(|s| (*s).to_string()).collect(),
            model,
            reduced,
        })
    }
}

/// Held-out error of one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationScore {
    pub name: String,
    pub predictors: Vec<String>,
    pub reduced: bool,
    pub rmse: f64,
}

/// Held-out errors of every candidate, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub response: String,
    pub n_observations: usize,
    pub scores: Vec<ValidationScore>,
    /// Name of the candidate with the lowest RMSE (first on ties).
    pub best: String,
}

impl ValidationReport {
    /// Score of the winning candidate.
    #[must_use]
    pub fn best_score(&self) -> Option<&ValidationScore> {
        self.scores.iter().find(|s| s.name == self.best)
    }

    /// Score of the candidate called `name`.
    #[must_use]
    pub fn score(&self, name: &str) -> Option<&ValidationScore> {
        self.scores.iter().find(|s| s.name == name)
    }
}

/// Scores every candidate by RMSE on `held_out[response]`.
///
/// # Errors
///
/// Returns an error if there are no candidates, the held-out table is empty,
/// or a response or predictor column is missing from it.
pub fn validate(
    candidates: &[CandidateModel],
    held_out: &DataFrame,
    response: &str,
) -> Result<ValidationReport> {
    if candidates.is_empty() {
        return Err(AnalysisError::InvalidValue {
            field: "candidates".into(),
            value: "[]".into(),
            reason: "nothing to validate".into(),
        });
    }
    if held_out.n_rows() == 0 {
        return Err(AnalysisError::InsufficientData {
            needed: 1,
            actual: 0,
        });
    }
    let y = held_out.column(response)?;

    let mut scores = Vec::with_capacity(candidates.len());
    let mut best: Option<(usize, f64)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let predictions = candidate.model.predict_frame(held_out)?;
        let error = rmse(&predictions, y);
        tracing::debug!(candidate = %candidate.name, rmse = error, "validated");
        if best.map_or(true, |(_, b)| error < b) {
            best = Some((i, error));
        }
        scores.push(ValidationScore {
            name: candidate.name.clone(),
            predictors: candidate.predictors.clone(),
            reduced: candidate.reduced,
            rmse: error,
        });
    }

    let best = best.map_or_else(String::new, |(i, _)| scores[i].name.clone());
    tracing::info!(best = %best, rows = held_out.n_rows(), "validation complete");
    Ok(ValidationReport {
        response: response.to_string(),
        n_observations: held_out.n_rows(),
        scores,
        best,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{auto_mpg, mtcars};

    fn candidates() -> Vec<CandidateModel> {
        let full = mtcars::frame().expect("bundled mtcars");
        let reduced = full
            .drop_row_by_label("Chrysler Imperial")
            .expect("present");
        vec![
            CandidateModel::fit("wt", &full, "gp100m", &["wt"], false).expect("fit"),
            CandidateModel::fit("wt+hp", &full, "gp100m", &["wt", "hp"], false).expect("fit"),
            CandidateModel::fit("wt+wthp", &full, "gp100m", &["wt", "wthp"], false).expect("fit"),
            CandidateModel::fit("wt+wthp (reduced)", &reduced, "gp100m", &["wt", "wthp"], true)
                .expect("fit"),
        ]
    }

    fn held_out() -> DataFrame {
        let records = auto_mpg::load_bundled().expect("bundled excerpt");
        auto_mpg::to_frame(&records).expect("mapped")
    }

    #[test]
    fn test_reduced_model_validates_best() {
        let report = validate(&candidates(), &held_out(), "gp100m").expect("validate");
        assert_eq!(report.n_observations, 56);
        assert_eq!(report.scores.len(), 4);
        assert_eq!(report.best, "wt+wthp (reduced)");

        let best = report.best_score().expect("best present");
        assert!(best.reduced);
        assert!((best.rmse - 0.8176).abs() < 1e-3);
        assert!((report.score("wt").expect("wt").rmse - 0.8564).abs() < 1e-3);
        assert!((report.score("wt+hp").expect("wt+hp").rmse - 0.8843).abs() < 1e-3);
        assert!((report.score("wt+wthp").expect("wt+wthp").rmse - 0.8793).abs() < 1e-3);
    }

    #[test]
    fn test_missing_predictor_column() {
        let narrow = held_out().select(&["gp100m", "wt"]).expect("subset");
        let err = validate(&candidates(), &narrow, "gp100m").expect_err("hp absent");
        assert!(matches!(err, AnalysisError::MissingColumn(ref c) if c == "hp"));
    }

    #[test]
    fn test_no_candidates() {
        assert!(validate(&[], &held_out(), "gp100m").is_err());
    }

    #[test]
    fn test_missing_response() {
        let err = validate(&candidates(), &held_out(), "kpl").expect_err("no such column");
        assert!(matches!(err, AnalysisError::MissingColumn(_)));
    }
}
