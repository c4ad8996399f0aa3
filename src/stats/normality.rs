//! Shapiro-Wilk test of normality.
//!
//! Royston (1995), "Remark AS R94: A remark on algorithm AS 181". The
//! coefficients `a` come from the normal order-statistic approximation and the
//! p-value from Royston's normalising transformation of `W`.
//!
//! H₀: the sample was drawn from a normal distribution.

use super::distribution::{normal_quantile, normal_sf};
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

const SMALL: f64 = 1e-19;

const C1: [f64; 6] = [0.0, 0.221_157, -0.147_981, -2.071_19, 4.434_685, -2.706_056];
const C2: [f64; 6] = [0.0, 0.042_981, -0.293_762, -1.752_461, 5.682_633, -3.582_633];
const C3: [f64; 4] = [0.544, -0.399_78, 0.025_054, -6.714e-4];
const C4: [f64; 4] = [1.382_2, -0.778_57, 0.062_767, -0.002_032_2];
const C5: [f64; 4] = [-1.586_1, -0.310_82, -0.083_751, 0.003_891_5];
const C6: [f64; 3] = [-0.480_3, -0.082_676, 0.003_030_2];
const G: [f64; 2] = [-2.273, 0.459];

/// Result of a Shapiro-Wilk test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapiroWilkResult {
    /// The W statistic, in (0, 1]; values near 1 look normal.
    pub w: f64,
    /// p-value for H₀ (normality).
    pub p_value: f64,
    /// Sample size.
    pub n: usize,
}

impl ShapiroWilkResult {
    /// True when normality is rejected at level `alpha`.
    #[must_use]
    pub fn rejects_normality(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

fn poly(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Half of the antisymmetric Shapiro-Wilk coefficient vector, `a[0]` pairing
/// the extreme order statistics.
fn coefficients(n: usize) -> Vec<f64> {
    let half = n / 2;
    if n == 3 {
        return vec![std::f64::consts::FRAC_1_SQRT_2];
    }

    let an = n as f64;
    let an25 = an + 0.25;
    let m: Vec<f64> = (1..=half)
        .map(|i| normal_quantile((i as f64 - 0.375) / an25))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();

    let mut a = vec![0.0; half];
    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    a[0] = a1;

    let (first_regular, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        a[1] = a2;
        let fac = ((summ2 - 2.0 * m[0].powi(2) - 2.0 * m[1].powi(2))
            / (1.0 - 2.0 * a1.powi(2) - 2.0 * a2.powi(2)))
        .sqrt();
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0].powi(2)) / (1.0 - 2.0 * a1.powi(2))).sqrt();
        (1, fac)
    };

    for i in first_regular..half {
        a[i] = -m[i] / fac;
    }
    a
}

/// Shapiro-Wilk W statistic and p-value.
///
/// # Errors
///
/// Returns an error if `n < 3`, `n > 5000`, the data contain non-finite
/// values, or all values are identical.
///
/// # Examples
///
/// ```
/// use mpg_analysis::stats::normality::shapiro_wilk;
///
/// let data: Vec<f64> = (1..=10).map(f64::from).collect();
/// let result = shapiro_wilk(&data).expect("valid sample");
/// assert!(result.w > 0.9);
/// assert!(result.p_value > 0.05);
/// ```
pub fn shapiro_wilk(data: &[f64]) -> Result<ShapiroWilkResult> {
    let n = data.len();
    if n < 3 {
        return Err(AnalysisError::InsufficientData {
            needed: 3,
            actual: n,
        });
    }
    if n > 5000 {
        return Err(AnalysisError::InvalidValue {
            field: "n".into(),
            value: n.to_string(),
            reason: "Shapiro-Wilk approximation is valid for at most 5000 observations".into(),
        });
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::InvalidValue {
            field: "data".into(),
            value: "non-finite".into(),
            reason: "sample must contain only finite values".into(),
        });
    }

    let mut x = data.to_vec();
    x.sort_by(f64::total_cmp);
    let range = x[n - 1] - x[0];
    if range < SMALL {
        return Err(AnalysisError::InvalidValue {
            field: "data".into(),
            value: format!("{}", x[0]),
            reason: "all values are identical".into(),
        });
    }

    let a = coefficients(n);
    let mean = x.iter().sum::<f64>() / n as f64;
    let ssq: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    let numerator: f64 = a
        .iter()
        .enumerate()
        .map(|(i, ai)| ai * (x[n - 1 - i] - x[i]))
        .sum();
    let w = (numerator * numerator / ssq).min(1.0);

    Ok(ShapiroWilkResult {
        w,
        p_value: p_value(w, n),
        n,
    })
}

fn p_value(w: f64, n: usize) -> f64 {
    if n == 3 {
        const PI6: f64 = 6.0 / std::f64::consts::PI;
        const STQR: f64 = std::f64::consts::FRAC_PI_3;
        return (PI6 * (w.sqrt().asin() - STQR)).max(0.0);
    }
    if w >= 1.0 {
        return 1.0;
    }

    let an = n as f64;
    let mut y = (1.0 - w).ln();
    let (mean, sd) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return 1e-99;
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let ln_n = an.ln();
        (poly(&C5, ln_n), poly(&C6, ln_n).exp())
    };
    normal_sf((y - mean) / sd)
}
