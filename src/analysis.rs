//! The end-to-end pipeline: load, explore, select, fit, diagnose, drop the
//! outlier, refit, validate, conclude.
//!
//! # Examples
//!
//! ```
//! use mpg_analysis::analysis::Analysis;
//! use mpg_analysis::config::AnalysisConfig;
//!
//! let report = Analysis::new(AnalysisConfig::default()).run().expect("bundled data");
//! assert_eq!(report.validation.best, "wt + wthp (outlier removed)");
//! assert!(!report.transmission_effect.significant);
//! ```

use crate::config::{AnalysisConfig, ValidationSource};
use crate::data::{auto_mpg, mtcars, DataFrame};
use crate::error::{AnalysisError, Result};
use crate::explore::{explore, Exploration, TRANSMISSION_COLUMN};
use crate::linear_model::{
    ConfidenceInterval, Diagnostics, LinearRegression, ModelSummary, ObservationDiagnostics,
    ResidualPanels,
};
use crate::model_selection::{best_subset, validate, CandidateModel, SubsetSearch, ValidationReport};
use crate::stats::ShapiroWilkResult;
use serde::{Deserialize, Serialize};

/// Significance level for the transmission and normality tests.
pub const ALPHA: f64 = 0.05;

/// Derived predictor appended for the second subset search.
pub const RATIO_PREDICTOR: &str = "wthp";

/// Models fitted on the full table and compared on held-out data.
pub const FULL_DATA_MODELS: [(&str, &[&str]); 3] = [
    ("wt", &["wt"]),
    ("wt + hp", &["wt", "hp"]),
    ("wt + wthp", &["wt", "wthp"]),
];

/// Predictors of the final model, refitted without the outlier.
pub const FINAL_PREDICTORS: [&str; 2] = ["wt", "wthp"];

/// Name under which the refitted final model is reported.
pub const FINAL_MODEL: &str = "wt + wthp (outlier removed)";

/// One fitted model as it appears in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    pub name: String,
    pub reduced: bool,
    pub summary: ModelSummary,
    pub intervals: Vec<ConfidenceInterval>,
}

impl ModelReport {
    fn from_candidate(candidate: &CandidateModel, level: f64) -> Result<Self> {
        Ok(Self {
            name: candidate.name.clone(),
            reduced: candidate.reduced,
            summary: candidate.model.summary()?,
            intervals: candidate.model.confint(level)?,
        })
    }
}

/// Influence diagnostics of one fit of the final predictors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluenceReport {
    pub model: String,
    pub n_observations: usize,
    pub cooks_threshold: f64,
    pub leverage_threshold: f64,
    pub flagged: Vec<ObservationDiagnostics>,
    /// Diagnostics of the configured outlier; `None` once it is removed.
    pub outlier: Option<ObservationDiagnostics>,
    pub outlier_flagged: bool,
    pub panels: ResidualPanels,
}

/// The transmission term added to the final model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmissionEffect {
    pub model: ModelSummary,
    /// Change in gallons per 100 miles for a manual gearbox.
    pub estimate: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
    pub interval: ConfidenceInterval,
    pub significant: bool,
}

/// Everything one run produces; rendered by [`crate::report`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub config: AnalysisConfig,
    pub n_cars: usize,
    pub exploration: Exploration,
    pub raw_search: SubsetSearch,
    pub ratio_search: SubsetSearch,
    pub models: Vec<ModelReport>,
    /// Full-data fit, before the outlier is removed.
    pub influence: InfluenceReport,
    /// The refit without the outlier.
    pub reduced_influence: InfluenceReport,
    pub adj_r_squared_full: f64,
    pub adj_r_squared_reduced: f64,
    pub residual_normality: ShapiroWilkResult,
    pub validation: ValidationReport,
    pub transmission_effect: TransmissionEffect,
    pub conclusion: String,
}

/// A configured run of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    config: AnalysisConfig,
}

impl Analysis {
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Runs every step once, in order. Any error aborts the run.
    ///
    /// # Errors
    ///
    /// Returns the first error from configuration checks, data loading,
    /// fitting or validation; there is no partial report.
    pub fn run(&self) -> Result<AnalysisReport> {
        let config = &self.config;
        config.validate()?;
        let response = config.response.as_str();

        let cars = mtcars::frame()?;
        tracing::info!(rows = cars.n_rows(), "loaded road-test table");

        let exploration = explore(&cars, "mpg", &mtcars::NUMERIC_COLUMNS)?;

        let (raw_search, ratio_search) = self.subset_searches(&cars)?;

        let reduced = cars.drop_row_by_label(&config.outlier)?;
        tracing::info!(outlier = %config.outlier, rows = reduced.n_rows(), "removed outlier");

        let candidates = fit_candidates(&cars, &reduced, response)?;
        let models = candidates
            .iter()
            .map(|c| ModelReport::from_candidate(c, config.confidence_level))
            .collect::<Result<Vec<_>>>()?;

        let full_final = find_candidate(&candidates, "wt + wthp")?;
        let reduced_final = find_candidate(&candidates, FINAL_MODEL)?;
        let influence = influence_report(&full_final.model, &config.outlier)?;

        let adj_r_squared_full = full_final.model.summary()?.adj_r_squared;
        let adj_r_squared_reduced = reduced_final.model.summary()?.adj_r_squared;
        tracing::info!(
            before = adj_r_squared_full,
            after = adj_r_squared_reduced,
            "refitted without outlier"
        );

        let reduced_influence = influence_report(&reduced_final.model, &config.outlier)?;
        tracing::info!(
            flagged = reduced_influence.flagged.len(),
            "re-checked influence after refit"
        );
        let residual_normality = Diagnostics::compute(&reduced_final.model)?.residual_normality()?;
        if residual_normality.rejects_normality(ALPHA) {
            tracing::warn!(
                p = residual_normality.p_value,
                "final model residuals depart from normality"
            );
        }

        let held_out = load_held_out(&config.validation)?;
        let validation = validate(&candidates, &held_out, response)?;

        let transmission_effect =
            transmission_effect(&reduced, response, config.confidence_level)?;
        let conclusion = conclude(&exploration, &transmission_effect);
        tracing::info!(p = transmission_effect.p_value, "transmission effect estimated");

        Ok(AnalysisReport {
            config: config.clone(),
            n_cars: cars.n_rows(),
            exploration,
            raw_search,
            ratio_search,
            models,
            influence,
            reduced_influence,
            adj_r_squared_full,
            adj_r_squared_reduced,
            residual_normality,
            validation,
            transmission_effect,
            conclusion,
        })
    }

    /// Best-subset search over the raw candidates and again with `wthp`.
    ///
    /// # Errors
    ///
    /// Returns an error if a candidate column is missing.
    pub fn subset_searches(&self, cars: &DataFrame) -> Result<(SubsetSearch, SubsetSearch)> {
        let config = &self.config;
        let raw = config.candidate_refs();
        let max_size = |m: usize| config.max_subset_size.unwrap_or(m);
        let raw_search = best_subset(cars, &config.response, &raw, max_size(raw.len()))?;

        let mut with_ratio = raw.clone();
        if !with_ratio.contains(&RATIO_PREDICTOR) {
            with_ratio.push(RATIO_PREDICTOR);
        }
        let ratio_search =
            best_subset(cars, &config.response, &with_ratio, max_size(with_ratio.len()))?;
        Ok((raw_search, ratio_search))
    }
}

/// Fits the three full-data models and the outlier-removed final model.
///
/// # Errors
///
/// Returns an error if a column is missing or a fit fails.
pub fn fit_candidates(
    full: &DataFrame,
    reduced: &DataFrame,
    response: &str,
) -> Result<Vec<CandidateModel>> {
    let mut candidates = FULL_DATA_MODELS
        .iter()
        .map(|(name, predictors)| CandidateModel::fit(*name, full, response, predictors, false))
        .collect::<Result<Vec<_>>>()?;
    candidates.push(CandidateModel::fit(
        FINAL_MODEL,
        reduced,
        response,
        &FINAL_PREDICTORS,
        true,
    )?);
    Ok(candidates)
}

/// Loads and maps the held-out table.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_held_out(source: &ValidationSource) -> Result<DataFrame> {
    let records = match source {
        ValidationSource::Bundled => auto_mpg::load_bundled()?,
        ValidationSource::Path(path) => auto_mpg::load_path(path)?,
    };
    auto_mpg::to_frame(&records)
}

fn find_candidate<'a>(candidates: &'a [CandidateModel], name: &str) -> Result<&'a CandidateModel> {
    candidates
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| AnalysisError::Other(format!("no candidate named {name}")))
}

/// Influence diagnostics for `fit`, with `outlier` looked up by label.
///
/// # Errors
///
/// Returns an error if the model is unfitted.
pub fn influence_report(fit: &LinearRegression, outlier: &str) -> Result<InfluenceReport> {
    let diagnostics = Diagnostics::compute(fit)?;
    let flagged: Vec<ObservationDiagnostics> =
        diagnostics.flag_influential().into_iter().cloned().collect();
    for obs in &flagged {
        tracing::warn!(
            label = %obs.label,
            cooks = obs.cooks_distance,
            leverage = obs.leverage,
            "influential observation"
        );
    }
    Ok(InfluenceReport {
        model: fit.formula(),
        n_observations: diagnostics.len(),
        cooks_threshold: diagnostics.cooks_threshold(),
        leverage_threshold: diagnostics.leverage_threshold(),
        outlier_flagged: flagged.iter().any(|o| o.label == outlier),
        flagged,
        outlier: diagnostics.get(outlier).cloned(),
        panels: diagnostics.residual_panels(),
    })
}

/// Adds the transmission code to the final predictors on `reduced`.
///
/// # Errors
///
/// Returns an error if the fit fails.
pub fn transmission_effect(reduced: &DataFrame, response: &str, level: f64) -> Result<TransmissionEffect> {
    let mut predictors = FINAL_PREDICTORS.to_vec();
    predictors.push(TRANSMISSION_COLUMN);
    let mut model = LinearRegression::new();
    model.fit_frame(reduced, response, &predictors)?;

    let summary = model.summary()?;
    let term = summary
        .term(TRANSMISSION_COLUMN)
        .cloned()
        .ok_or_else(|| AnalysisError::MissingColumn(TRANSMISSION_COLUMN.to_string()))?;
    let interval = model
        .confint(level)?
        .into_iter()
        .find(|ci| ci.name == TRANSMISSION_COLUMN)
        .ok_or_else(|| AnalysisError::MissingColumn(TRANSMISSION_COLUMN.to_string()))?;

    Ok(TransmissionEffect {
        model: summary,
        estimate: term.estimate,
        std_error: term.std_error,
        t_value: term.t_value,
        p_value: term.p_value,
        interval,
        significant: term.p_value <= ALPHA,
    })
}

fn conclude(exploration: &Exploration, effect: &TransmissionEffect) -> String {
    let gap = exploration
        .groups
        .get(1)
        .zip(exploration.groups.first())
        .map_or(f64::NAN, |(manual, automatic)| manual.mean - automatic.mean);
    let naive = format!(
        "Unadjusted, manual cars average {gap:.1} mpg more than automatics (Welch p = {:.4}).",
        exploration.transmission_test.pvalue
    );
    let adjusted = if effect.significant {
        format!(
            "After adjusting for weight and weight-to-power ratio, a manual gearbox changes \
             consumption by {:+.3} gallons per 100 miles (p = {:.4}); transmission type does \
             affect fuel economy.",
            effect.estimate, effect.p_value
        )
    } else {
        format!(
            "After adjusting for weight and weight-to-power ratio, the transmission term is \
             {:+.3} gallons per 100 miles with p = {:.4}, so there is no evidence that \
             transmission type affects fuel economy; the raw gap reflects manual cars being \
             lighter.",
            effect.estimate, effect.p_value
        )
    };
    format!("{naive} {adjusted}")
}
