//! UCI Auto MPG, used only as held-out data for validation.
//!
//! Columns are mapped onto the fitting schema: `weight` (lb) / 1000 becomes
//! `wt`, `horsepower` becomes `hp`, `displacement` becomes `disp`, `cylinders`
//! becomes `cyl`. Rows with the `?` horsepower marker are dropped.

use super::transform::{gp100m, wthp};
use super::DataFrame;
use crate::error::{AnalysisError, Result};
use crate::primitives::Vector;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

const AUTO_MPG_CSV: &str = include_str!("../../data/auto-mpg.csv");

/// Missing-value marker used by the UCI file.
pub const MISSING_MARKER: &str = "?";

/// One car from the Auto MPG table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoRecord {
    pub mpg: f64,
    pub cylinders: u8,
    pub displacement: f64,
    /// `None` where the source has the `?` marker.
    pub horsepower: Option<f64>,
    /// Pounds.
    pub weight: f64,
    pub acceleration: f64,
    pub model_year: u16,
    pub origin: u8,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct RawAuto {
    mpg: f64,
    cylinders: u8,
    displacement: f64,
    horsepower: String,
    weight: f64,
    acceleration: f64,
    model_year: u16,
    origin: u8,
    name: String,
}

impl TryFrom<RawAuto> for AutoRecord {
    type Error = AnalysisError;

    fn try_from(raw: RawAuto) -> Result<Self> {
        let horsepower = match raw.horsepower.as_str() {
            MISSING_MARKER => None,
            text => Some(text.parse::<f64>().map_err(|e| AnalysisError::InvalidValue {
                field: "horsepower".to_string(),
                value: text.to_string(),
                reason: e.to_string(),
            })?),
        };
        Ok(Self {
            mpg: raw.mpg,
            cylinders: raw.cylinders,
            displacement: raw.displacement,
            horsepower,
            weight: raw.weight,
            acceleration: raw.acceleration,
            model_year: raw.model_year,
            origin: raw.origin,
            name: raw.name,
        })
    }
}

/// Parses the bundled excerpt.
///
/// # Errors
///
/// Returns an error if the bundled file is malformed.
pub fn load_bundled() -> Result<Vec<AutoRecord>> {
    parse(AUTO_MPG_CSV.as_bytes())
}

/// Parses a user-supplied Auto MPG CSV with the same header as the bundled one.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if the file cannot be opened, otherwise as
/// [`parse`].
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Vec<AutoRecord>> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading validation data");
    let file = std::fs::File::open(path)?;
    parse(file)
}

/// Parses Auto MPG records from any CSV source.
///
/// # Errors
///
/// Returns [`AnalysisError::Parse`] with the 1-based line of the first bad
/// record.
pub fn parse<R: Read>(source: R) -> Result<Vec<AutoRecord>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<RawAuto>().enumerate() {
        let line = idx + 2;
        let raw = result.map_err(|e| AnalysisError::Parse {
            line,
            message: e.to_string(),
        })?;
        let record = AutoRecord::try_from(raw).map_err(|e| AnalysisError::Parse {
            line,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Maps records onto the fitting schema (`mpg, cyl, disp, hp, wt, gp100m,
/// wthp`), labelled by car name. Rows without horsepower are dropped.
///
/// # Errors
///
/// Returns an error if no complete rows remain or a row has zero `mpg`/`hp`.
pub fn to_frame(records: &[AutoRecord]) -> Result<DataFrame> {
    let complete: Vec<(&AutoRecord, f64)> = records
        .iter()
        .filter_map(|r| r.horsepower.map(|hp| (r, hp)))
        .collect();

    let dropped = records.len() - complete.len();
    if dropped > 0 {
        tracing::debug!(dropped, "dropped validation rows with missing horsepower");
    }
    if complete.is_empty() {
        return Err(AnalysisError::InsufficientData {
            needed: 1,
            actual: 0,
        });
    }

    let mut mpg = Vec::with_capacity(complete.len());
    let mut cyl = Vec::with_capacity(complete.len());
    let mut disp = Vec::with_capacity(complete.len());
    let mut hp = Vec::with_capacity(complete.len());
    let mut wt = Vec::with_capacity(complete.len());
    let mut consumption = Vec::with_capacity(complete.len());
    let mut ratio = Vec::with_capacity(complete.len());
    let mut labels = Vec::with_capacity(complete.len());

    for (record, horsepower) in complete {
        let weight = record.weight / 1000.0;
        mpg.push(record.mpg);
        cyl.push(f64::from(record.cylinders));
        disp.push(record.displacement);
        hp.push(horsepower);
        wt.push(weight);
        consumption.push(gp100m(record.mpg)?);
        ratio.push(wthp(weight, horsepower)?);
        labels.push(record.name.clone());
    }

    DataFrame::with_labels(
        vec![
            ("mpg".to_string(), Vector::from_vec(mpg)),
            ("cyl".to_string(), Vector::from_vec(cyl)),
            ("disp".to_string(), Vector::from_vec(disp)),
            ("hp".to_string(), Vector::from_vec(hp)),
            ("wt".to_string(), Vector::from_vec(wt)),
            ("gp100m".to_string(), Vector::from_vec(consumption)),
            ("wthp".to_string(), Vector::from_vec(ratio)),
        ],
        labels,
    )
}
