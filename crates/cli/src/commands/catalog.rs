use std::collections::BTreeMap;
use std::path::PathBuf;

use carmatch_core::catalog::CarCatalog;
use carmatch_core::config::{AppConfig, LoadOptions};
use carmatch_core::domain::car::CarRecord;
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Debug, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub path: String,
    pub record_count: usize,
    pub brand_count: usize,
    pub fuel_types: BTreeMap<String, usize>,
    pub price_range: Option<(f64, f64)>,
    pub year_range: Option<(f64, f64)>,
}

/// Parses the catalog the server would read and reports its shape. An
/// explicit path skips config loading entirely.
pub fn run(path: Option<PathBuf>) -> CommandResult {
    let path = match path {
        Some(path) => path,
        None => match AppConfig::load(LoadOptions::default()) {
            Ok(config) => config.catalog.csv_path,
            Err(error) => {
                return CommandResult::failure(
                    "catalog",
                    "config_validation",
                    format!("configuration issue: {error}"),
                    2,
                );
            }
        },
    };

    let catalog = CarCatalog::new(path);
    let cars = match catalog.try_load() {
        Ok(cars) => cars,
        Err(error) => {
            return CommandResult::failure("catalog", "catalog_read", error.to_string(), 7);
        }
    };

    let summary = summarize(&catalog.path().display().to_string(), &cars);
    let message = format!(
        "{} cars across {} brands in {}",
        summary.record_count, summary.brand_count, summary.path
    );
    CommandResult::success_with_details("catalog", message, serde_json::to_value(&summary).ok())
}

pub fn summarize(path: &str, cars: &[CarRecord]) -> CatalogSummary {
    let mut brands: Vec<&str> = cars
        .iter()
        .map(|car| {
            if car.brand_normalized.is_empty() {
                car.brand.as_str()
            } else {
                car.brand_normalized.as_str()
            }
        })
        .filter(|brand| !brand.is_empty())
        .collect();
    brands.sort_unstable();
    brands.dedup();

    let mut fuel_types = BTreeMap::new();
    for car in cars {
        let fuel = if car.fuel_type.is_empty() { "unknown" } else { car.fuel_type.as_str() };
        *fuel_types.entry(fuel.to_string()).or_insert(0) += 1;
    }

    CatalogSummary {
        path: path.to_string(),
        record_count: cars.len(),
        brand_count: brands.len(),
        fuel_types,
        price_range: range(cars.iter().map(|car| car.price).filter(|price| *price > 0.0)),
        year_range: range(cars.iter().map(|car| car.year).filter(|year| *year > 0.0)),
    }
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, value| match acc {
        None => Some((value, value)),
        Some((low, high)) => Some((low.min(value), high.max(value))),
    })
}

#[cfg(test)]
mod tests {
    use carmatch_core::catalog::parse_catalog;

    use super::summarize;

    #[test]
    fn summary_counts_brands_and_ranges() {
        let cars = parse_catalog(
            "brand,model,car_name,price,year,fuel_type,brand_normalized\n\
             toyota,corolla,Toyota Corolla,85000,2019,hybrid,TOYOTA\n\
             Toyota,yaris,Toyota Yaris,62000,2017,gasoline,TOYOTA\n\
             kia,niro,Kia Niro,,2021,hybrid,KIA\n",
        );

        let summary = summarize("cars.csv", &cars);

        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.brand_count, 2);
        assert_eq!(summary.fuel_types.get("hybrid"), Some(&2));
        assert_eq!(summary.price_range, Some((62000.0, 85000.0)));
        assert_eq!(summary.year_range, Some((2017.0, 2021.0)));
    }

    #[test]
    fn empty_catalog_has_no_ranges() {
        let summary = summarize("cars.csv", &[]);

        assert_eq!(summary.record_count, 0);
        assert!(summary.price_range.is_none());
    }
}
