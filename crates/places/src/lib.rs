//! Repair-shop discovery around a buyer's location.
//!
//! Two finders share the `ShopFinder` seam: `GooglePlacesFinder` geocodes and
//! runs a nearby search against the Google Maps web services, and
//! `FixtureShopFinder` serves a fixed set of sample garages without network
//! access. Both return shops sorted nearest first.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use carmatch_core::config::{PlacesConfig, PlacesMode};
use carmatch_core::domain::repair_shop::{GeoPoint, RepairShop};

pub mod fixture;
pub mod google;

pub use fixture::FixtureShopFinder;
pub use google::GooglePlacesFinder;

/// Searched when the buyer leaves the location empty.
pub const DEFAULT_LOCATION: &str = "תל אביב";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
}

impl LookupRequest {
    pub fn for_location(location: impl Into<String>) -> Self {
        Self { location: Some(location.into()), coordinates: None }
    }

    pub fn at(point: GeoPoint) -> Self {
        Self { location: None, coordinates: Some(point) }
    }

    /// The address to geocode, falling back to the default city.
    pub fn location_or_default(&self) -> &str {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_LOCATION)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("location `{0}` could not be found")]
    LocationNotFound(String),
    #[error("places lookup failed: {0}")]
    Integration(String),
}

#[async_trait]
pub trait ShopFinder: Send + Sync {
    fn name(&self) -> &'static str;
    async fn find_nearby(&self, request: &LookupRequest) -> Result<Vec<RepairShop>, LookupError>;
}

pub fn finder_from_config(config: &PlacesConfig) -> Result<Arc<dyn ShopFinder>, LookupError> {
    match config.mode {
        PlacesMode::Fixture => Ok(Arc::new(FixtureShopFinder::new(config.max_results))),
        PlacesMode::Live => Ok(Arc::new(GooglePlacesFinder::from_config(config)?)),
    }
}
