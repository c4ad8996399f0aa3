//! Tidying and derived variables.
//!
//! `vs` and `am` arrive as 0/1 codes and become proper categories; the
//! regression response is fuel *consumption* rather than economy, and the
//! weight-to-power ratio is added as a candidate predictor.

use super::DataFrame;
use crate::error::{AnalysisError, Result};
use crate::primitives::Vector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine configuration (`vs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineShape {
    /// `vs = 0`
    VShaped,
    /// `vs = 1`
    Straight,
}

/// Transmission type (`am`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transmission {
    /// `am = 0`
    Automatic,
    /// `am = 1`
    Manual,
}

impl EngineShape {
    /// Decodes the `vs` column.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidValue`] for anything but 0 or 1.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::VShaped),
            1 => Ok(Self::Straight),
            other => Err(invalid_code("vs", other)),
        }
    }

    /// Numeric code for use as a regressor.
    #[must_use]
    pub fn code(self) -> f64 {
        match self {
            Self::VShaped => 0.0,
            Self::Straight => 1.0,
        }
    }
}

impl Transmission {
    /// Both levels, automatic first.
    pub const ALL: [Self; 2] = [Self::Automatic, Self::Manual];

    /// Decodes the `am` column.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidValue`] for anything but 0 or 1.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Automatic),
            1 => Ok(Self::Manual),
            other => Err(invalid_code("am", other)),
        }
    }

    /// Numeric code for use as a regressor (manual = 1).
    #[must_use]
    pub fn code(self) -> f64 {
        match self {
            Self::Automatic => 0.0,
            Self::Manual => 1.0,
        }
    }
}

impl fmt::Display for EngineShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VShaped => write!(f, "V-shaped"),
            Self::Straight => write!(f, "straight"),
        }
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Automatic => write!(f, "automatic"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

fn invalid_code(field: &str, code: u8) -> AnalysisError {
    AnalysisError::InvalidValue {
        field: field.to_string(),
        value: code.to_string(),
        reason: "expected 0 or 1".to_string(),
    }
}

/// Gallons per 100 miles, `100 / mpg`.
///
/// # Errors
///
/// Returns an error when `mpg` is zero, negative or not finite.
///
/// # Examples
///
/// ```
/// use mpg_analysis::data::transform::gp100m;
///
/// assert_eq!(gp100m(25.0).expect("positive mpg"), 4.0);
/// assert!(gp100m(0.0).is_err());
/// ```
pub fn gp100m(mpg: f64) -> Result<f64> {
    if !(mpg.is_finite() && mpg > 0.0) {
        return Err(AnalysisError::InvalidValue {
            field: "mpg".to_string(),
            value: mpg.to_string(),
            reason: "gp100m needs a positive, finite mpg".to_string(),
        });
    }
    Ok(100.0 / mpg)
}

/// Weight per horsepower, `wt / hp` (1000 lb per hp).
///
/// # Errors
///
/// Returns an error when `hp` is zero, negative or not finite.
pub fn wthp(wt: f64, hp: f64) -> Result<f64> {
    if !(hp.is_finite() && hp > 0.0) {
        return Err(AnalysisError::InvalidValue {
            field: "hp".to_string(),
            value: hp.to_string(),
            reason: "wthp needs a positive, finite horsepower".to_string(),
        });
    }
    Ok(wt / hp)
}

/// Appends `gp100m` (from `mpg`) and `wthp` (from `wt` and `hp`) to a frame.
///
/// # Errors
///
/// Returns an error when a source column is missing, a derived column already
/// exists, or a row has a zero `mpg` or `hp`.
pub fn add_derived_columns(frame: &mut DataFrame) -> Result<()> {
    let consumption = frame
        .column("mpg")?
        .iter()
        .map(|&mpg| gp100m(mpg))
        .collect::<Result<Vec<f64>>>()?;

    let ratio = frame
        .column("wt")?
        .iter()
        .zip(frame.column("hp")?.iter())
        .map(|(&wt, &hp)| wthp(wt, hp))
        .collect::<Result<Vec<f64>>>()?;

    frame.add_column("gp100m".to_string(), Vector::from_vec(consumption))?;
    frame.add_column("wthp".to_string(), Vector::from_vec(ratio))?;
    Ok(())
}
