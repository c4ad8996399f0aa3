//! Traditional descriptive and inferential statistics for vector data.
//!
//! - Quantiles and percentiles using R-7 method (Hyndman & Fan 1996)
//! - Five-number summary (min, Q1, median, Q3, max) with Tukey fences
//! - Welch and pooled two-sample t-tests
//! - Shapiro-Wilk normality test
//! - Covariance and correlation matrices
//! - Student t, F and normal distribution functions backing the p-values
//!
//! # Examples
//!
//! ```
//! use mpg_analysis::stats::DescriptiveStats;
//! use mpg_analysis::primitives::Vector;
//!
//! let data = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
//! let stats = DescriptiveStats::new(&data);
//!
//! assert_eq!(stats.quantile(0.5).expect("median should be computable for valid data"), 3.0);
//! assert_eq!(stats.quantile(0.0).expect("min quantile should be computable for valid data"), 1.0);
//! assert_eq!(stats.quantile(1.0).expect("max quantile should be computable for valid data"), 5.0);
//! ```

pub mod covariance;
pub mod distribution;
pub mod hypothesis;
pub mod normality;

pub use covariance::{corr, corr_matrix, cov};
pub use hypothesis::{ttest_ind, TTestResult};
pub use normality::{shapiro_wilk, ShapiroWilkResult};

use crate::primitives::Vector;
use serde::{Deserialize, Serialize};

/// Descriptive statistics computed on a vector of f64 values.
///
/// Holds a reference to the data vector to avoid unnecessary copying.
#[derive(Debug)]
pub struct DescriptiveStats<'a> {
    data: &'a Vector<f64>,
}

/// Five-number summary: minimum, Q1, median, Q3, maximum.
///
/// This is the foundation for box plots and outlier detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// Interquartile range, `q3 - q1`.
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Tukey fences `(q1 - 1.5 IQR, q3 + 1.5 IQR)`.
    #[must_use]
    pub fn fences(&self) -> (f64, f64) {
        let step = 1.5 * self.iqr();
        (self.q1 - step, self.q3 + step)
    }
}

impl<'a> DescriptiveStats<'a> {
    /// Create a new `DescriptiveStats` instance from a data vector.
    #[must_use]
    pub fn new(data: &'a Vector<f64>) -> Self {
        Self { data }
    }

    /// Compute quantile using linear interpolation (R-7 method).
    ///
    /// # Errors
    /// Returns error if:
    /// - Data vector is empty
    /// - Quantile q is not in [0, 1]
    /// - Data contains NaN
    pub fn quantile(&self, q: f64) -> Result<f64, String> {
        if !(0.0..=1.0).contains(&q) {
            return Err(format!("Quantile must be in [0, 1], got {q}"));
        }
        let sorted = self.sorted()?;
        Ok(interpolate(&sorted, q))
    }

    /// Compute multiple percentiles efficiently (single sort).
    ///
    /// # Errors
    /// Returns error for empty data or a percentile outside [0, 100].
    ///
    /// # Examples
    /// ```
    /// use mpg_analysis::stats::DescriptiveStats;
    /// use mpg_analysis::primitives::Vector;
    ///
    /// let data = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    /// let stats = DescriptiveStats::new(&data);
    /// let p = stats.percentiles(&[25.0, 50.0, 75.0]).expect("percentiles should be computable for valid data");
    /// assert_eq!(p, vec![2.0, 3.0, 4.0]);
    /// ```
    pub fn percentiles(&self, percentiles: &[f64]) -> Result<Vec<f64>, String> {
        for &p in percentiles {
            if !(0.0..=100.0).contains(&p) {
                return Err(format!("Percentile must be in [0, 100], got {p}"));
            }
        }
        let sorted = self.sorted()?;
        Ok(percentiles
            .iter()
            .map(|&p| interpolate(&sorted, p / 100.0))
            .collect())
    }

    /// Compute five-number summary: min, Q1, median, Q3, max.
    ///
    /// # Errors
    /// Returns error for empty data.
    pub fn five_number_summary(&self) -> Result<FiveNumberSummary, String> {
        let values = self.percentiles(&[0.0, 25.0, 50.0, 75.0, 100.0])?;

        Ok(FiveNumberSummary {
            min: values[0],
            q1: values[1],
            median: values[2],
            q3: values[3],
            max: values[4],
        })
    }

    /// Compute interquartile range (IQR = Q3 - Q1).
    ///
    /// # Errors
    /// Returns error for empty data.
    pub fn iqr(&self) -> Result<f64, String> {
        Ok(self.five_number_summary()?.iqr())
    }

    fn sorted(&self) -> Result<Vec<f64>, String> {
        if self.data.is_empty() {
            return Err("Cannot compute quantile of empty vector".to_string());
        }
        if self.data.iter().any(|v| v.is_nan()) {
            return Err("Cannot compute quantile of data containing NaN".to_string());
        }
        let mut sorted = self.data.as_slice().to_vec();
        sorted.sort_by(f64::total_cmp);
        Ok(sorted)
    }
}

/// R-7: `h = (n - 1) q`, linear between the neighbouring order statistics.
fn interpolate(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_empty() {
        let v = Vector::from_vec(Vec::new());
        let stats = DescriptiveStats::new(&v);
        assert!(stats.quantile(0.5).is_err());
    }

    #[test]
    fn test_quantile_single_element() {
        let v = Vector::from_slice(&[42.0]);
        let stats = DescriptiveStats::new(&v);
        for q in [0.0, 0.5, 1.0] {
            assert_eq!(
                stats
                    .quantile(q)
                    .expect("quantile should succeed for single element"),
                42.0
            );
        }
    }

    #[test]
    fn test_quantile_even_length() {
        let v = Vector::from_slice(&[4.0, 1.0, 3.0, 2.0]);
        let stats = DescriptiveStats::new(&v);
        assert_eq!(
            stats
                .quantile(0.5)
                .expect("quantile should succeed for even length data"),
            2.5
        ); // interpolated median
    }

    #[test]
    fn test_quantile_invalid() {
        let v = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let stats = DescriptiveStats::new(&v);
        assert!(stats.quantile(-0.1).is_err());
        assert!(stats.quantile(1.1).is_err());

        let nan = Vector::from_slice(&[1.0, f64::NAN]);
        assert!(DescriptiveStats::new(&nan).quantile(0.5).is_err());
    }

    #[test]
    fn test_five_number_summary() {
        let v = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let stats = DescriptiveStats::new(&v);
        let summary = stats
            .five_number_summary()
            .expect("five-number summary should succeed for valid data");

        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.fences(), (-1.0, 7.0));
    }

    #[test]
    fn test_r7_matches_r_quantile() {
        // R: quantile(c(10.4, 14.7, 15.2, 19.2, 24.4), 0.3) -> 14.8
        let v = Vector::from_slice(&[19.2, 10.4, 24.4, 15.2, 14.7]);
        let q = DescriptiveStats::new(&v).quantile(0.3).expect("valid");
        assert!((q - 14.8).abs() < 1e-12);
    }

    #[test]
    fn test_iqr() {
        let v = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let stats = DescriptiveStats::new(&v);
        assert_eq!(stats.iqr().expect("IQR should succeed for valid data"), 2.0);
    }
}
