use serde::{Deserialize, Serialize};

use crate::domain::contact::ContactEntry;

/// One row of the vehicle catalog file.
///
/// Field names follow the catalog header so a record serializes back under
/// the same keys it was read from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct CarRecord {
    pub brand: String,
    pub model: String,
    pub car_name: String,
    pub price: f64,
    pub year: f64,
    pub hand_num: f64,
    pub horse_power: f64,
    #[serde(rename = "4x4")]
    pub four_by_four: bool,
    pub fuel_type: String,
    pub engine_volume: f64,
    pub valid_test: bool,
    pub magnesium_wheels: bool,
    pub distance_control: bool,
    pub economical: bool,
    pub adaptive_cruise_control: bool,
    pub cruise_control: bool,
    pub brand_normalized: String,
    pub brand_group: String,
}

impl CarRecord {
    pub fn display_name(&self) -> &str {
        if self.car_name.trim().is_empty() {
            &self.model
        } else {
            &self.car_name
        }
    }
}

/// A matched car with the seller contact attached to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarRecommendation {
    #[serde(flatten)]
    pub car: CarRecord,
    pub contact: ContactEntry,
}
