//! Model selection: exhaustive best-subset search on the fitting table and
//! out-of-sample validation on a held-out table.

pub mod subset;
pub mod validation;

pub use subset::{best_subset, SubsetResult, SubsetSearch};
pub use validation::{validate, CandidateModel, ValidationReport, ValidationScore};
