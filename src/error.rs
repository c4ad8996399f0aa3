//! Error types for the analysis pipeline.
//!
//! Every step of the pipeline returns [`Result`]; the first error aborts the
//! whole run.

use thiserror::Error;

/// Main error type for analysis operations.
///
/// # Examples
///
/// ```
/// use mpg_analysis::error::AnalysisError;
///
/// let err = AnalysisError::DimensionMismatch {
///     expected: "32 rows".to_string(),
///     actual: "31 rows".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Matrix/vector dimensions don't match for the operation.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// XᵀX is not positive definite (collinear or constant predictors).
    #[error("singular design matrix: {context}")]
    SingularMatrix {
        /// What was being solved
        context: String,
    },

    /// Too few observations for the requested computation.
    #[error("insufficient data: need at least {needed} observations, got {actual}")]
    InsufficientData {
        /// Minimum number of observations
        needed: usize,
        /// Observations available
        actual: usize,
    },

    /// A named column is absent from a data frame.
    #[error("column not found: {0}")]
    MissingColumn(String),

    /// A labelled row is absent from a data frame.
    #[error("row not found: {0}")]
    MissingRow(String),

    /// A value is outside the domain of the operation.
    #[error("invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        /// Field or parameter name
        field: String,
        /// Offending value
        value: String,
        /// Constraint description
        reason: String,
    },

    /// A dataset record could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number (header is line 1)
        line: usize,
        /// Error details
        message: String,
    },

    /// I/O error (validation file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Generic error with string message.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for AnalysisError {
    fn from(msg: &str) -> Self {
        AnalysisError::Other(msg.to_string())
    }
}

impl From<String> for AnalysisError {
    fn from(msg: String) -> Self {
        AnalysisError::Other(msg)
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Serialization(err.to_string())
    }
}

impl AnalysisError {
    /// Process exit status for this error; 0 is never returned.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidValue { .. } => 2,
            Self::Io(_) => 3,
            Self::Parse { .. } => 4,
            Self::MissingColumn(_) | Self::MissingRow(_) => 5,
            Self::DimensionMismatch { .. }
            | Self::SingularMatrix { .. }
            | Self::InsufficientData { .. } => 6,
            Self::Serialization(_) => 7,
            Self::Other(_) => 1,
        }
    }
}

/// Convenience type alias for analysis results.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = AnalysisError::DimensionMismatch {
            expected: "3 columns".to_string(),
            actual: "2 columns".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("dimension mismatch"));
        assert!(msg.contains("3 columns"));
        assert!(msg.contains("2 columns"));
    }

    #[test]
    fn test_singular_matrix_display() {
        let err = AnalysisError::SingularMatrix {
            context: "gp100m ~ wt + wt".to_string(),
        };
        assert!(err.to_string().contains("singular"));
        assert!(err.to_string().contains("gp100m ~ wt + wt"));
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = AnalysisError::InsufficientData {
            needed: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 3 observations, got 2"
        );
    }

    #[test]
    fn test_missing_column_and_row() {
        assert_eq!(
            AnalysisError::MissingColumn("wthp".into()).to_string(),
            "column not found: wthp"
        );
        assert_eq!(
            AnalysisError::MissingRow("Ford T".into()).to_string(),
            "row not found: Ford T"
        );
    }

    #[test]
    fn test_from_str_and_string() {
        let err: AnalysisError = "boom".into();
        assert!(matches!(err, AnalysisError::Other(ref m) if m == "boom"));
        let err: AnalysisError = String::from("bang").into();
        assert_eq!(err.to_string(), "bang");
    }

    #[test]
    fn test_io_source_is_preserved() {
        use std::error::Error as _;
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "auto-mpg.data");
        let err: AnalysisError = io.into();
        assert!(err.to_string().contains("auto-mpg.data"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_exit_codes_are_nonzero() {
        let errors = [
            AnalysisError::MissingRow("x".into()),
            AnalysisError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "x")),
            AnalysisError::Other("x".into()),
            AnalysisError::Parse {
                line: 2,
                message: "x".into(),
            },
        ];
        for err in &errors {
            assert_ne!(err.exit_code(), 0);
        }
        assert_eq!(errors[1].exit_code(), 3);
    }

    #[test]
    fn test_serde_json_conversion() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json");
        let err: AnalysisError = bad.expect_err("invalid json").into();
        assert!(matches!(err, AnalysisError::Serialization(_)));
    }
}
