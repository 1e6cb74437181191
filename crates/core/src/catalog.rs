//! Car record store backed by a flat, header-driven CSV file.
//!
//! The file is re-read on every lookup so edits to the catalog show up
//! without a restart. Numeric columns that fail to parse become `0`, flag
//! columns are `true` for any non-zero integer.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::car::CarRecord;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read car catalog `{path}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("car catalog `{0}` has no header row")]
    MissingHeader(PathBuf),
}

#[derive(Clone, Debug)]
pub struct CarCatalog {
    path: PathBuf,
}

impl CarCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every record, degrading to an empty list when the file is
    /// missing or unreadable.
    pub fn load(&self) -> Vec<CarRecord> {
        match self.try_load() {
            Ok(cars) => {
                debug!(
                    event_name = "catalog.load.completed",
                    path = %self.path.display(),
                    record_count = cars.len(),
                    "car catalog loaded"
                );
                cars
            }
            Err(error) => {
                warn!(
                    event_name = "catalog.load.failed",
                    path = %self.path.display(),
                    error = %error,
                    "car catalog unavailable, continuing with empty catalog"
                );
                Vec::new()
            }
        }
    }

    pub fn try_load(&self) -> Result<Vec<CarRecord>, CatalogError> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|source| CatalogError::Read { path: self.path.clone(), source })?;
        if raw.trim().is_empty() {
            return Err(CatalogError::MissingHeader(self.path.clone()));
        }
        Ok(parse_catalog(&raw))
    }
}

/// Parses catalog text. The first non-empty line is the header; rows that
/// cannot be read are skipped.
pub fn parse_catalog(raw: &str) -> Vec<CarRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.trim().as_bytes());
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(error) => {
            debug!(event_name = "catalog.header.unreadable", error = %error, "no usable header");
            return Vec::new();
        }
    };

    reader
        .records()
        .filter_map(|row| match row {
            Ok(record) => Some(record),
            Err(error) => {
                debug!(event_name = "catalog.row.skipped", error = %error, "unreadable row");
                None
            }
        })
        .map(|record| {
            let mut car = CarRecord::default();
            for (index, header) in headers.iter().enumerate() {
                apply_column(&mut car, header, record.get(index).unwrap_or(""));
            }
            car
        })
        .collect()
}

fn apply_column(car: &mut CarRecord, header: &str, value: &str) {
    match header {
        "brand" => car.brand = value.to_string(),
        "model" => car.model = value.to_string(),
        "car_name" => car.car_name = value.to_string(),
        "fuel_type" => car.fuel_type = value.to_string(),
        "brand_normalized" => car.brand_normalized = value.to_string(),
        "brand_group" => car.brand_group = value.to_string(),
        "price" => car.price = parse_number(value),
        "year" => car.year = parse_number(value),
        "hand_num" => car.hand_num = parse_number(value),
        "horse_power" => car.horse_power = parse_number(value),
        "engine_volume" => car.engine_volume = parse_number(value),
        "4x4" => car.four_by_four = parse_flag(value),
        "valid_test" => car.valid_test = parse_flag(value),
        "magnesium_wheels" => car.magnesium_wheels = parse_flag(value),
        "distance_control" => car.distance_control = parse_flag(value),
        "economical" => car.economical = parse_flag(value),
        "adaptive_cruise_control" => car.adaptive_cruise_control = parse_flag(value),
        "cruise_control" => car.cruise_control = parse_flag(value),
        _ => {}
    }
}

fn parse_number(value: &str) -> f64 {
    value.parse::<f64>().ok().filter(|number| number.is_finite()).unwrap_or(0.0)
}

fn parse_flag(value: &str) -> bool {
    let integer = value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n.trunc() as i64))
        .unwrap_or(0);
    integer != 0
}
