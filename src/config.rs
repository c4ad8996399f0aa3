//! Analysis configuration.
//!
//! [`AnalysisConfig::default`] reproduces the documented analysis; the
//! `with_*` builders override individual settings.

use crate::data::mtcars::RAW_PREDICTORS;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Car removed before the final refit (row 17 of the road-test table).
pub const DEFAULT_OUTLIER: &str = "Chrysler Imperial";

/// Regression response: gallons per 100 miles.
pub const DEFAULT_RESPONSE: &str = "gp100m";

/// Where the held-out validation table comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationSource {
    /// The Auto MPG excerpt compiled into the binary.
    #[default]
    Bundled,
    /// A CSV in the UCI Auto MPG layout.
    Path(PathBuf),
}

/// Settings for one run of [`crate::analysis::Analysis`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub response: String,
    /// Raw best-subset candidates; `wthp` is appended for the second search.
    pub candidates: Vec<String>,
    pub outlier: String,
    /// Largest subset size searched; `None` searches every size.
    pub max_subset_size: Option<usize>,
    pub validation: ValidationSource,
    /// Level for coefficient intervals, in (0, 1).
    pub confidence_level: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            response: DEFAULT_RESPONSE.to_string(),
            candidates: RAW_PREDICTORS.iter().map(|s| (*s).to_string()).collect(),
            outlier: DEFAULT_OUTLIER.to_string(),
            max_subset_size: None,
            validation: ValidationSource::Bundled,
            confidence_level: 0.95,
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    #[must_use]
    pub fn with_candidates(mut self, candidates: &[&str]) -> Self {
        self.candidates = candidates.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Sets the row label removed before the final refit.
    #[must_use]
    pub fn with_outlier(mut self, label: impl Into<String>) -> Self {
        self.outlier = label.into();
        self
    }

    #[must_use]
    pub fn with_max_subset_size(mut self, size: usize) -> Self {
        self.max_subset_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_validation(mut self, source: ValidationSource) -> Self {
        self.validation = source;
        self
    }

    #[must_use]
    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    /// Candidate names as string slices.
    #[must_use]
    pub fn candidate_refs(&self) -> Vec<&str> {
        self.candidates.iter().map(String::as_str).collect()
    }

    /// Checks the settings that can be checked without data.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidValue`] for an empty candidate list,
    /// a zero subset size or a confidence level outside (0, 1).
    pub fn validate(&self) -> Result<()> {
        if self.candidates.is_empty() {
            return Err(invalid("candidates", "[]", "at least one candidate is required"));
        }
        if self.max_subset_size == Some(0) {
            return Err(invalid("max_subset_size", "0", "must be at least 1"));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(invalid(
                "confidence_level",
                &self.confidence_level.to_string(),
                "must lie strictly between 0 and 1",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> AnalysisError {
    AnalysisError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_documented_analysis() {
        let config = AnalysisConfig::default();
        assert_eq!(config.response, "gp100m");
        assert_eq!(config.outlier, "Chrysler Imperial");
        assert_eq!(config.candidates.len(), 10);
        assert!(!config.candidates.iter().any(|c| c == "mpg"));
        assert_eq!(config.validation, ValidationSource::Bundled);
        assert_eq!(config.max_subset_size, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = AnalysisConfig::new()
            .with_outlier("Lincoln Continental")
            .with_candidates(&["wt", "hp"])
            .with_max_subset_size(2)
            .with_confidence_level(0.9)
            .with_validation(ValidationSource::Path("auto.csv".into()));
        assert_eq!(config.outlier, "Lincoln Continental");
        assert_eq!(config.candidate_refs(), vec!["wt", "hp"]);
        assert_eq!(config.max_subset_size, Some(2));
        assert_eq!(
            config.validation,
            ValidationSource::Path(PathBuf::from("auto.csv"))
        );
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(AnalysisConfig::new().with_candidates(&[]).validate().is_err());
        assert!(AnalysisConfig::new().with_max_subset_size(0).validate().is_err());
        assert!(AnalysisConfig::new().with_confidence_level(1.0).validate().is_err());
        assert!(AnalysisConfig::new()
            .with_confidence_level(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_string(&AnalysisConfig::default()).expect("serializable");
        assert!(json.contains("\"outlier\":\"Chrysler Imperial\""));
        assert!(json.contains("\"validation\":\"Bundled\""));
    }
}
