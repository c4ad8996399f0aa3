//! Two-sample hypothesis testing.
//!
//! Used by the exploratory step to compare fuel economy between the
//! automatic and manual groups before any adjustment for weight or power.
//!
//! # Example
//!
//! ```
//! use mpg_analysis::stats::hypothesis::ttest_ind;
//!
//! let group1 = vec![2.3, 2.5, 2.7, 2.9, 3.1];
//! let group2 = vec![3.2, 3.4, 3.6, 3.8, 4.0];
//!
//! let result = ttest_ind(&group1, &group2, false).expect("valid t-test inputs");
//! assert!(result.statistic < 0.0);
//! assert!(result.pvalue < 0.05);
//! ```

use super::distribution::{student_t_quantile, student_t_two_sided};
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Result of a t-test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TTestResult {
    /// t-statistic
    pub statistic: f64,

    /// p-value (two-tailed)
    pub pvalue: f64,

    /// Degrees of freedom (fractional for Welch's test)
    pub df: f64,

    /// Mean of the first sample
    pub mean1: f64,

    /// Mean of the second sample
    pub mean2: f64,

    /// 95% confidence interval for `mean1 - mean2`
    pub conf_int: (f64, f64),
}

/// Independent two-sample t-test: Tests if two independent samples have different means.
///
/// H₀: μ₁ = μ₂
/// H₁: μ₁ ≠ μ₂
///
/// # Arguments
///
/// * `sample1` - First sample
/// * `sample2` - Second sample
/// * `equal_var` - Assume equal variances (pooled t-test) or not (Welch's t-test)
///
/// # Errors
///
/// Returns an error if either sample has fewer than two observations or both
/// samples have zero variance.
pub fn ttest_ind(sample1: &[f64], sample2: &[f64], equal_var: bool) -> Result<TTestResult> {
    let n1 = sample1.len();
    let n2 = sample2.len();

    if n1 < 2 || n2 < 2 {
        return Err(AnalysisError::InsufficientData {
            needed: 2,
            actual: n1.min(n2),
        });
    }

    let mean1 = sample1.iter().sum::<f64>() / n1 as f64;
    let mean2 = sample2.iter().sum::<f64>() / n2 as f64;

    let var1 = sample1.iter().map(|&x| (x - mean1).powi(2)).sum::<f64>() / (n1 - 1) as f64;
    let var2 = sample2.iter().map(|&x| (x - mean2).powi(2)).sum::<f64>() / (n2 - 1) as f64;

    let (se, df) = if equal_var {
        // Pooled t-test (Student's t-test)
        let pooled_var = ((n1 - 1) as f64 * var1 + (n2 - 1) as f64 * var2) / (n1 + n2 - 2) as f64;
        let se = (pooled_var * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
        (se, (n1 + n2 - 2) as f64)
    } else {
        // Welch's t-test with Welch-Satterthwaite degrees of freedom
        let a = var1 / n1 as f64;
        let b = var2 / n2 as f64;
        let se = (a + b).sqrt();
        let df = (a + b).powi(2) / (a.powi(2) / (n1 - 1) as f64 + b.powi(2) / (n2 - 1) as f64);
        (se, df)
    };

    if se == 0.0 {
        return Err(AnalysisError::InvalidValue {
            field: "samples".into(),
            value: "0".into(),
            reason: "both samples have zero variance".into(),
        });
    }

    let diff = mean1 - mean2;
    let statistic = diff / se;
    let pvalue = student_t_two_sided(statistic, df);
    let t_crit = student_t_quantile(0.975, df);

    Ok(TTestResult {
        statistic,
        pvalue,
        df,
        mean1,
        mean2,
        conf_int: (diff - t_crit * se, diff + t_crit * se),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welch_reference_values() {
        // R: t.test(c(1, 2, 3, 4, 5), c(2, 4, 6, 8, 10))
        // t = -1.8974, df = 5.8824, p-value = 0.1075
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0];
        let result = ttest_ind(&a, &b, false).expect("valid samples");
        assert!((result.statistic + 1.897_367).abs() < 1e-5);
        assert!((result.df - 5.882_353).abs() < 1e-5);
        assert!((result.pvalue - 0.1075).abs() < 1e-4);
        assert!(result.conf_int.0 < 0.0 && result.conf_int.1 > 0.0);
    }

    #[test]
    fn test_pooled_df() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0];
        let result = ttest_ind(&a, &b, true).expect("valid samples");
        assert!((result.df - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_identical_means_give_p_one() {
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 2.0, 1.0];
        let result = ttest_ind(&a, &b, false).expect("valid samples");
        assert!(result.statistic.abs() < 1e-12);
        assert!((result.pvalue - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_too_few_observations() {
        let err = ttest_ind(&[1.0], &[1.0, 2.0], false).expect_err("needs two per group");
        assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    }

    #[test]
    fn test_zero_variance_rejected() {
        let err = ttest_ind(&[1.0, 1.0], &[2.0, 2.0], false).expect_err("no spread");
        assert!(matches!(err, AnalysisError::InvalidValue { .. }));
    }
}
