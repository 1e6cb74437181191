use serde::{Deserialize, Serialize};

use crate::geo::{distance_km, round_one_decimal};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

pub const UNKNOWN_DISTANCE: &str = "לא ידוע";
pub const UNKNOWN_PHONE: &str = "אין מידע";
pub const DISTANCE_UNIT: &str = "ק\"מ";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairShop {
    pub name: String,
    pub rating: f64,
    pub address: String,
    pub phone: String,
    pub distance_km: Option<f64>,
    pub distance: String,
    pub is_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

impl RepairShop {
    /// Builds a shop whose distance is measured from `origin` when the shop
    /// location is known.
    pub fn measured_from(
        origin: GeoPoint,
        name: impl Into<String>,
        rating: f64,
        address: impl Into<String>,
        phone: Option<String>,
        is_open: bool,
        location: Option<GeoPoint>,
    ) -> Self {
        let measured = location.map(|point| round_one_decimal(distance_km(origin, point)));
        Self {
            name: name.into(),
            rating,
            address: address.into(),
            phone: phone
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_PHONE.to_string()),
            distance_km: measured,
            distance: distance_label(measured),
            is_open,
            location,
        }
    }
}

pub fn distance_label(distance_km: Option<f64>) -> String {
    match distance_km {
        Some(km) => format!("{km:.1} {DISTANCE_UNIT}"),
        None => UNKNOWN_DISTANCE.to_string(),
    }
}

/// Orders shops nearest first; shops without a known distance go last.
pub fn sort_by_distance(shops: &mut [RepairShop]) {
    shops.sort_by(|left, right| match (left.distance_km, right.distance_km) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
