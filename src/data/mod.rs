//! `DataFrame` module for named column containers, plus the two bundled
//! datasets the analysis reads.
//!
//! The frame is deliberately small: named `f64` columns, one string label per
//! row, and the handful of operations the pipeline needs (select, derive,
//! drop a labelled row, build a design matrix).

pub mod auto_mpg;
pub mod mtcars;
pub mod transform;

pub use transform::{EngineShape, Transmission};

use crate::error::{AnalysisError, Result};
use crate::primitives::{Matrix, Vector};
use crate::stats::DescriptiveStats;
use serde::{Deserialize, Serialize};

/// A minimal `DataFrame` with named columns and labelled rows.
///
/// # Examples
///
/// ```
/// use mpg_analysis::data::DataFrame;
/// use mpg_analysis::primitives::Vector;
///
/// let columns = vec![
///     ("x".to_string(), Vector::from_slice(&[1.0, 2.0, 3.0])),
///     ("y".to_string(), Vector::from_slice(&[4.0, 5.0, 6.0])),
/// ];
/// let df = DataFrame::new(columns).expect("DataFrame creation should succeed with valid columns");
/// assert_eq!(df.shape(), (3, 2));
/// assert_eq!(df.labels()[0], "1");
/// ```
#[derive(Debug, Clone)]
pub struct DataFrame {
    columns: Vec<(String, Vector<f64>)>,
    labels: Vec<String>,
    n_rows: usize,
}

impl DataFrame {
    /// Creates a new `DataFrame` from named columns, labelling rows `"1"..="n"`.
    ///
    /// # Errors
    ///
    /// Returns an error if columns have different lengths, if empty, or if a
    /// name is empty or duplicated.
    pub fn new(columns: Vec<(String, Vector<f64>)>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, |(_, c)| c.len());
        let labels = (1..=n_rows).map(|i| i.to_string()).collect();
        Self::with_labels(columns, labels)
    }

    /// Creates a new `DataFrame` with explicit row labels.
    ///
    /// # Errors
    ///
    /// Same as [`DataFrame::new`], plus a label count that differs from the
    /// row count.
    pub fn with_labels(columns: Vec<(String, Vector<f64>)>, labels: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err("DataFrame must have at least one column".into());
        }

        let n_rows = columns[0].1.len();

        for (name, col) in &columns {
            if col.len() != n_rows {
                return Err(AnalysisError::DimensionMismatch {
                    expected: format!("{n_rows} rows"),
                    actual: format!("{} rows in column '{name}'", col.len()),
                });
            }
            if name.is_empty() {
                return Err("Column names cannot be empty".into());
            }
        }

        let mut names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|w| w[0] == w[1]) {
            return Err("Duplicate column names not allowed".into());
        }

        if labels.len() != n_rows {
            return Err(AnalysisError::DimensionMismatch {
                expected: format!("{n_rows} row labels"),
                actual: format!("{} row labels", labels.len()),
            });
        }

        Ok(Self {
            columns,
            labels,
            n_rows,
        })
    }

    /// Returns the shape as (`n_rows`, `n_cols`).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column names.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Returns the row labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns a reference to a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingColumn`] if the column doesn't exist.
    pub fn column(&self, name: &str) -> Result<&Vector<f64>> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
    }

    /// Selects multiple columns by name, returning a new `DataFrame`.
    ///
    /// # Errors
    ///
    /// Returns an error if any column doesn't exist.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        if names.is_empty() {
            return Err("Must select at least one column".into());
        }

        let mut selected = Vec::with_capacity(names.len());

        for &name in names {
            let col = self.column(name)?;
            selected.push((name.to_string(), col.clone()));
        }

        Self::with_labels(selected, self.labels.clone())
    }

    /// Returns a row as a Vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds.
    pub fn row(&self, idx: usize) -> Result<Vector<f64>> {
        if idx >= self.n_rows {
            return Err("Row index out of bounds".into());
        }

        let data: Vec<f64> = self.columns.iter().map(|(_, col)| col[idx]).collect();
        Ok(Vector::from_vec(data))
    }

    /// Position of the row carrying `label`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingRow`] if no row has that label.
    pub fn row_index(&self, label: &str) -> Result<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| AnalysisError::MissingRow(label.to_string()))
    }

    /// Converts the `DataFrame` to a row-major Matrix of shape
    /// (`n_rows`, `n_cols`).
    #[must_use]
    pub fn to_matrix(&self) -> Matrix<f64> {
        let cols: Vec<&Vector<f64>> = self.columns.iter().map(|(_, v)| v).collect();
        Matrix::from_columns(&cols, false).unwrap_or_else(|_| Matrix::zeros(self.n_rows, 0))
    }

    /// Builds a design matrix from the named predictors, optionally with a
    /// leading column of ones.
    ///
    /// # Errors
    ///
    /// Returns an error if a predictor is missing.
    pub fn design_matrix(&self, predictors: &[&str], intercept: bool) -> Result<Matrix<f64>> {
        let cols = predictors
            .iter()
            .map(|name| self.column(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Matrix::from_columns(&cols, intercept)?)
    }

    /// Returns an iterator over columns as (name, vector) pairs.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &Vector<f64>)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Adds a new column to the `DataFrame`.
    ///
    /// # Errors
    ///
    /// Returns an error if column length doesn't match or name already exists.
    pub fn add_column(&mut self, name: String, data: Vector<f64>) -> Result<()> {
        if data.len() != self.n_rows {
            return Err(AnalysisError::DimensionMismatch {
                expected: format!("{} rows", self.n_rows),
                actual: format!("{} rows in column '{name}'", data.len()),
            });
        }

        if self.columns.iter().any(|(n, _)| n == &name) {
            return Err("Column name already exists".into());
        }

        if name.is_empty() {
            return Err("Column name cannot be empty".into());
        }

        self.columns.push((name, data));
        Ok(())
    }

    /// Drops a column by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the column doesn't exist or is the last column.
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        if self.columns.len() == 1 {
            return Err("Cannot drop the last column".into());
        }

        let idx = self
            .columns
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))?;

        self.columns.remove(idx);
        Ok(())
    }

    /// Returns a copy without the row labelled `label`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingRow`] if the label is absent.
    pub fn drop_row_by_label(&self, label: &str) -> Result<Self> {
        let target = self.row_index(label)?;
        self.filter_rows(|i| i != target)
    }

    /// Returns a copy keeping only the rows whose index satisfies `keep`.
    ///
    /// # Errors
    ///
    /// Returns an error if no rows survive.
    pub fn filter_rows(&self, keep: impl Fn(usize) -> bool) -> Result<Self> {
        let rows: Vec<usize> = (0..self.n_rows).filter(|&i| keep(i)).collect();
        if rows.is_empty() {
            return Err(AnalysisError::InsufficientData {
                needed: 1,
                actual: 0,
            });
        }

        let columns: Vec<(String, Vector<f64>)> = self
            .columns
            .iter()
            .map(|(name, col)| (name.clone(), rows.iter().map(|&i| col[i]).collect()))
            .collect();
        let labels = rows.iter().map(|&i| self.labels[i].clone()).collect();
        Self::with_labels(columns, labels)
    }

    /// Returns descriptive statistics for all columns.
    #[must_use]
    pub fn describe(&self) -> Vec<ColumnStats> {
        self.columns
            .iter()
            .map(|(name, col)| {
                let summary = DescriptiveStats::new(col).five_number_summary().ok();
                ColumnStats {
                    name: name.clone(),
                    count: col.len(),
                    mean: col.mean(),
                    std: col.std(),
                    min: summary.as_ref().map_or(f64::NAN, |s| s.min),
                    median: summary.as_ref().map_or(f64::NAN, |s| s.median),
                    max: summary.as_ref().map_or(f64::NAN, |s| s.max),
                }
            })
            .collect()
    }
}

/// Descriptive statistics for a column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Column name.
    pub name: String,
    /// Number of elements.
    pub count: usize,
    /// Mean value.
    pub mean: f64,
    /// Sample standard deviation.
    pub std: f64,
    /// Minimum value.
    pub min: f64,
    /// Median value.
    pub median: f64,
    /// Maximum value.
    pub max: f64,
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
