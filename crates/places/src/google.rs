use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, warn};

use carmatch_core::config::PlacesConfig;
use carmatch_core::domain::repair_shop::{sort_by_distance, GeoPoint, RepairShop};

use crate::{LookupError, LookupRequest, ShopFinder};

const UNKNOWN_NAME: &str = "unknown";

pub struct GooglePlacesFinder {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    radius_meters: u32,
    keyword: String,
    max_results: usize,
    region: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    vicinity: Option<String>,
    #[serde(default)]
    formatted_phone_number: Option<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    opening_hours: Option<OpeningHours>,
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    #[serde(default)]
    open_now: Option<bool>,
}

impl GooglePlacesFinder {
    pub fn from_config(config: &PlacesConfig) -> Result<Self, LookupError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            LookupError::Integration("places.api_key is required in live mode".to_string())
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| LookupError::Integration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            radius_meters: config.radius_meters,
            keyword: config.keyword.clone(),
            max_results: config.max_results,
            region: config.region.clone(),
        })
    }

    async fn geocode(&self, address: &str) -> Result<GeoPoint, LookupError> {
        let url = format!("{}/geocode/json", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("address", address),
                ("region", self.region.as_str()),
                ("key", self.api_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| LookupError::Integration(format!("geocode request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(LookupError::Integration(format!(
                "geocode returned {}",
                response.status()
            )));
        }

        let payload: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Integration(format!("geocode response invalid: {e}")))?;

        match payload.status.as_str() {
            "OK" => payload
                .results
                .first()
                .map(|result| {
                    GeoPoint::new(result.geometry.location.lat, result.geometry.location.lng)
                })
                .ok_or_else(|| LookupError::LocationNotFound(address.to_string())),
            "ZERO_RESULTS" => Err(LookupError::LocationNotFound(address.to_string())),
            status => Err(LookupError::Integration(format!(
                "geocode status {status}: {}",
                payload.error_message.unwrap_or_default()
            ))),
        }
    }

    async fn nearby(&self, origin: GeoPoint) -> Result<Vec<PlaceResult>, LookupError> {
        let url = format!("{}/place/nearbysearch/json", self.base_url);
        let location = format!("{},{}", origin.lat, origin.lng);
        let radius = self.radius_meters.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("keyword", self.keyword.as_str()),
                ("key", self.api_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| LookupError::Integration(format!("nearby search request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(LookupError::Integration(format!(
                "nearby search returned {}",
                response.status()
            )));
        }

        let payload: NearbyResponse = response.json().await.map_err(|e| {
            LookupError::Integration(format!("nearby search response invalid: {e}"))
        })?;

        match payload.status.as_str() {
            "OK" => Ok(payload.results),
            "ZERO_RESULTS" => Ok(Vec::new()),
            status => Err(LookupError::Integration(format!(
                "nearby search status {status}: {}",
                payload.error_message.unwrap_or_default()
            ))),
        }
    }
}

fn to_shop(origin: GeoPoint, place: PlaceResult) -> RepairShop {
    let location = place
        .geometry
        .map(|geometry| GeoPoint::new(geometry.location.lat, geometry.location.lng));
    RepairShop::measured_from(
        origin,
        place
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        place.rating.unwrap_or(0.0),
        place.vicinity.unwrap_or_default(),
        place.formatted_phone_number,
        place.opening_hours.and_then(|hours| hours.open_now).unwrap_or(false),
        location,
    )
}

#[async_trait]
impl ShopFinder for GooglePlacesFinder {
    fn name(&self) -> &'static str {
        "google_places"
    }

    async fn find_nearby(&self, request: &LookupRequest) -> Result<Vec<RepairShop>, LookupError> {
        let origin = match request.coordinates {
            Some(point) => point,
            None => self.geocode(request.location_or_default()).await.map_err(|error| {
                warn!(
                    event_name = "places.geocode.failed",
                    location = request.location_or_default(),
                    error = %error,
                    "could not resolve search location"
                );
                error
            })?,
        };

        let places = self.nearby(origin).await?;
        let mut shops: Vec<RepairShop> = places
            .into_iter()
            .take(self.max_results)
            .map(|place| to_shop(origin, place))
            .collect();
        sort_by_distance(&mut shops);

        info!(
            event_name = "places.lookup.completed",
            finder = self.name(),
            shop_count = shops.len(),
            "repair shop lookup completed"
        );
        Ok(shops)
    }
}
