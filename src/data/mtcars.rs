//! The 1974 Motor Trend road-test table (32 cars, 11 variables).
//!
//! The CSV is compiled into the binary; [`load`] parses it into typed
//! [`CarRecord`]s and [`to_frame`] lays them out as the analysis frame with
//! `gp100m` and `wthp` already derived.

use super::transform::{add_derived_columns, EngineShape, Transmission};
use super::DataFrame;
use crate::error::{AnalysisError, Result};
use crate::primitives::Vector;
use serde::{Deserialize, Serialize};
use std::io::Read;

const MTCARS_CSV: &str = include_str!("../../data/mtcars.csv");

/// Number of cars in the road-test table.
pub const N_CARS: usize = 32;

/// Numeric columns of the analysis frame, in source order.
pub const NUMERIC_COLUMNS: [&str; 11] = [
    "mpg", "cyl", "disp", "hp", "drat", "wt", "qsec", "vs", "am", "gear", "carb",
];

/// Every source column except `mpg`: the raw best-subset candidates.
pub const RAW_PREDICTORS: [&str; 10] = [
    "cyl", "disp", "hp", "drat", "wt", "qsec", "vs", "am", "gear", "carb",
];

/// One road-tested car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    /// Make and model; unique within the table.
    pub model: String,
    /// Miles per US gallon.
    pub mpg: f64,
    /// Number of cylinders.
    pub cyl: u8,
    /// Displacement (cu. in.).
    pub disp: f64,
    /// Gross horsepower.
    pub hp: f64,
    /// Rear axle ratio.
    pub drat: f64,
    /// Weight (1000 lb).
    pub wt: f64,
    /// Quarter-mile time (s).
    pub qsec: f64,
    /// Engine configuration.
    pub engine: EngineShape,
    /// Transmission type.
    pub transmission: Transmission,
    /// Number of forward gears.
    pub gear: u8,
    /// Number of carburetors.
    pub carb: u8,
}

#[derive(Debug, Deserialize)]
struct RawCar {
    model: String,
    mpg: f64,
    cyl: u8,
    disp: f64,
    hp: f64,
    drat: f64,
    wt: f64,
    qsec: f64,
    vs: u8,
    am: u8,
    gear: u8,
    carb: u8,
}

impl TryFrom<RawCar> for CarRecord {
    type Error = AnalysisError;

    fn try_from(raw: RawCar) -> Result<Self> {
        Ok(Self {
            model: raw.model,
            mpg: raw.mpg,
            cyl: raw.cyl,
            disp: raw.disp,
            hp: raw.hp,
            drat: raw.drat,
            wt: raw.wt,
            qsec: raw.qsec,
            engine: EngineShape::from_code(raw.vs)?,
            transmission: Transmission::from_code(raw.am)?,
            gear: raw.gear,
            carb: raw.carb,
        })
    }
}

/// Parses the bundled table.
///
/// # Errors
///
/// Returns an error if the bundled file is malformed or does not hold
/// exactly [`N_CARS`] rows.
pub fn load() -> Result<Vec<CarRecord>> {
    let cars = parse(MTCARS_CSV.as_bytes())?;
    if cars.len() != N_CARS {
        return Err(AnalysisError::DimensionMismatch {
            expected: format!("{N_CARS} cars"),
            actual: format!("{} cars", cars.len()),
        });
    }
    tracing::debug!(rows = cars.len(), "parsed mtcars");
    Ok(cars)
}

/// Parses car records from any CSV source with the `mtcars` header.
///
/// # Errors
///
/// Returns [`AnalysisError::Parse`] with the 1-based line of the first bad
/// record.
pub fn parse<R: Read>(source: R) -> Result<Vec<CarRecord>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);

    let mut cars = Vec::new();
    for (idx, result) in reader.deserialize::<RawCar>().enumerate() {
        let line = idx + 2;
        let raw = result.map_err(|e| AnalysisError::Parse {
            line,
            message: e.to_string(),
        })?;
        let car = CarRecord::try_from(raw).map_err(|e| AnalysisError::Parse {
            line,
            message: e.to_string(),
        })?;
        cars.push(car);
    }
    Ok(cars)
}

/// Lays records out as a frame labelled by model, with the 11 numeric columns
/// followed by `gp100m` and `wthp`.
///
/// # Errors
///
/// Returns an error for an empty slice or a car with zero `mpg` or `hp`.
pub fn to_frame(cars: &[CarRecord]) -> Result<DataFrame> {
    if cars.is_empty() {
        return Err(AnalysisError::InsufficientData {
            needed: 1,
            actual: 0,
        });
    }

    let extract = |f: fn(&CarRecord) -> f64| -> Vector<f64> { cars.iter().map(f).collect() };
    let columns = vec![
        ("mpg".to_string(), extract(|c| c.mpg)),
        ("cyl".to_string(), extract(|c| f64::from(c.cyl))),
        ("disp".to_string(), extract(|c| c.disp)),
        ("hp".to_string(), extract(|c| c.hp)),
        ("drat".to_string(), extract(|c| c.drat)),
        ("wt".to_string(), extract(|c| c.wt)),
        ("qsec".to_string(), extract(|c| c.qsec)),
        ("vs".to_string(), extract(|c| c.engine.code())),
        ("am".to_string(), extract(|c| c.transmission.code())),
        ("gear".to_string(), extract(|c| f64::from(c.gear))),
        ("carb".to_string(), extract(|c| f64::from(c.carb))),
    ];
    let labels = cars.iter().map(|c| c.model.clone()).collect();

    let mut frame = DataFrame::with_labels(columns, labels)?;
    add_derived_columns(&mut frame)?;
    Ok(frame)
}

/// The bundled table as an analysis frame.
///
/// # Errors
///
/// See [`load`] and [`to_frame`].
pub fn frame() -> Result<DataFrame> {
    to_frame(&load()?)
}
