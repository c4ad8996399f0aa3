//! Does a manual gearbox save fuel? An OLS analysis of the 1974 Motor Trend
//! road tests.
//!
//! The pipeline loads the 32-car `mtcars` table, explores fuel economy by
//! transmission, runs exhaustive best-subset selection on gallons per 100
//! miles, fits and diagnoses the candidate models, refits without the one
//! documented outlier, validates every candidate on held-out UCI Auto MPG
//! cars, and finally tests whether transmission type matters once weight and
//! power are accounted for.
//!
//! # Quick Start
//!
//! ```
//! use mpg_analysis::prelude::*;
//!
//! let cars = mtcars::frame().expect("bundled data");
//! let mut model = LinearRegression::new();
//! model.fit_frame(&cars, "gp100m", &["wt", "wthp"]).expect("fit");
//!
//! let summary = model.summary().expect("fitted");
//! assert!(summary.adj_r_squared > 0.84);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`data`]: DataFrame, bundled datasets and derived variables
//! - [`explore`]: Group summaries, correlations and the naive t-test
//! - [`linear_model`]: OLS with inference and diagnostics
//! - [`model_selection`]: Best-subset search and held-out validation
//! - [`metrics`]: Regression metrics
//! - [`stats`]: Quantiles, distributions, hypothesis and normality tests
//! - [`analysis`]: The end-to-end pipeline
//! - [`plot`]: Character-grid scatter plots
//! - [`report`]: Markdown and JSON rendering

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod explore;
pub mod linear_model;
pub mod metrics;
pub mod model_selection;
pub mod plot;
pub mod prelude;
pub mod primitives;
pub mod report;
pub mod stats;
pub mod traits;

pub use error::{AnalysisError, Result};
pub use primitives::{Matrix, Vector};
pub use traits::Estimator;
