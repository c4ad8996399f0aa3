//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use mpg_analysis::prelude::*;
//! ```

pub use crate::analysis::{Analysis, AnalysisReport};
pub use crate::config::{AnalysisConfig, ValidationSource};
pub use crate::data::{auto_mpg, mtcars, DataFrame, EngineShape, Transmission};
pub use crate::linear_model::{Diagnostics, LinearRegression};
pub use crate::metrics::{mae, mse, r_squared, rmse};
pub use crate::model_selection::{best_subset, validate, CandidateModel};
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::Estimator;
