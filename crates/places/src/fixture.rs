use async_trait::async_trait;
use tracing::{debug, info};

use carmatch_core::domain::repair_shop::{sort_by_distance, GeoPoint, RepairShop};

use crate::{LookupError, LookupRequest, ShopFinder};

struct SampleShop {
    name: &'static str,
    rating: f64,
    address: &'static str,
    phone: Option<&'static str>,
    is_open: bool,
    lat: f64,
    lng: f64,
}

const SAMPLE_SHOPS: &[SampleShop] = &[
    SampleShop {
        name: "מוסך השלום",
        rating: 4.6,
        address: "דרך השלום 53, תל אביב",
        phone: Some("03-5612345"),
        is_open: true,
        lat: 32.0707,
        lng: 34.7930,
    },
    SampleShop {
        name: "מוסך אלון",
        rating: 4.2,
        address: "הרכבת 12, תל אביב",
        phone: Some("03-6871234"),
        is_open: true,
        lat: 32.0621,
        lng: 34.7795,
    },
    SampleShop {
        name: "פנצ'ריית הדרום",
        rating: 3.9,
        address: "שדרות ירושלים 40, יפו",
        phone: None,
        is_open: false,
        lat: 32.0480,
        lng: 34.7600,
    },
    SampleShop {
        name: "מרכז שירות רמת גן",
        rating: 4.4,
        address: "ז'בוטינסקי 100, רמת גן",
        phone: Some("03-7521111"),
        is_open: true,
        lat: 32.0860,
        lng: 34.8110,
    },
    SampleShop {
        name: "מוסך גבעתיים",
        rating: 4.0,
        address: "כצנלסון 80, גבעתיים",
        phone: None,
        is_open: true,
        lat: 32.0720,
        lng: 34.8100,
    },
];

/// Known city centres so distances stay meaningful without a geocoder.
const CITY_CENTRES: &[(&str, f64, f64)] = &[
    ("תל אביב", 32.0853, 34.7818),
    ("tel aviv", 32.0853, 34.7818),
    ("רמת גן", 32.0823, 34.8107),
    ("חיפה", 32.7940, 34.9896),
    ("ירושלים", 31.7683, 35.2137),
    ("באר שבע", 31.2520, 34.7915),
    ("נתניה", 32.3215, 34.8532),
];

/// Serves hard-coded garages around Tel Aviv. Unknown place names are
/// measured from the Tel Aviv centre.
#[derive(Clone, Debug)]
pub struct FixtureShopFinder {
    max_results: usize,
}

impl FixtureShopFinder {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    fn origin(request: &LookupRequest) -> GeoPoint {
        if let Some(point) = request.coordinates {
            return point;
        }

        let wanted = request.location_or_default().to_lowercase();
        let centre = CITY_CENTRES
            .iter()
            .find(|(city, _, _)| wanted.contains(city))
            .copied()
            .unwrap_or(CITY_CENTRES[0]);
        debug!(location = %wanted, matched = centre.0, "fixture origin resolved");
        GeoPoint::new(centre.1, centre.2)
    }
}

impl Default for FixtureShopFinder {
    fn default() -> Self {
        Self::new(10)
    }
}

#[async_trait]
impl ShopFinder for FixtureShopFinder {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn find_nearby(&self, request: &LookupRequest) -> Result<Vec<RepairShop>, LookupError> {
        let origin = Self::origin(request);
        let mut shops: Vec<RepairShop> = SAMPLE_SHOPS
            .iter()
            .take(self.max_results)
            .map(|sample| {
                RepairShop::measured_from(
                    origin,
                    sample.name,
                    sample.rating,
                    sample.address,
                    sample.phone.map(str::to_string),
                    sample.is_open,
                    Some(GeoPoint::new(sample.lat, sample.lng)),
                )
            })
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

#[cfg(test)]
mod tests {
    use carmatch_core::domain::repair_shop::{GeoPoint, DISTANCE_UNIT, UNKNOWN_PHONE};

    use super::FixtureShopFinder;
    use crate::{LookupRequest, ShopFinder};

    #[tokio::test]
    async fn fixture_shops_are_sorted_by_distance() {
        let shops = FixtureShopFinder::default()
            .find_nearby(&LookupRequest::default())
            .await
            .expect("fixture shops");

        assert_eq!(shops.len(), 5);
        let distances: Vec<f64> =
            shops.iter().map(|shop| shop.distance_km.expect("known distance")).collect();
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(shops.iter().all(|shop| shop.distance.ends_with(DISTANCE_UNIT)));
    }

    #[tokio::test]
    async fn missing_phone_is_marked() {
        let shops = FixtureShopFinder::default()
            .find_nearby(&LookupRequest::for_location("תל אביב"))
            .await
            .expect("fixture shops");

        let tyre_shop =
            shops.iter().find(|shop| shop.name == "פנצ'ריית הדרום").expect("sample shop");
        assert_eq!(tyre_shop.phone, UNKNOWN_PHONE);
        assert!(!tyre_shop.is_open);
    }

    #[tokio::test]
    async fn coordinates_take_precedence_over_location() {
        let at_ramat_gan = LookupRequest {
            location: Some("חיפה".to_string()),
            coordinates: Some(GeoPoint::new(32.0860, 34.8110)),
        };

        let shops =
            FixtureShopFinder::default().find_nearby(&at_ramat_gan).await.expect("fixture shops");
        assert_eq!(shops[0].name, "מרכז שירות רמת גן");
        assert_eq!(shops[0].distance_km, Some(0.0));
    }

    #[tokio::test]
    async fn max_results_caps_the_list() {
        let shops = FixtureShopFinder::new(2)
            .find_nearby(&LookupRequest::default())
            .await
            .expect("fixture shops");
        assert_eq!(shops.len(), 2);
    }
}
