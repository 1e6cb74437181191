use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SellerId(pub String);

/// Car listing data as the seller assistant emits it.
///
/// Every field is optional on the wire because the model output is only
/// prompted for this shape, never guaranteed to produce it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub mileage: Option<f64>,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredListing {
    pub id: ListingId,
    pub seller_id: SellerId,
    #[serde(flatten)]
    pub record: ListingRecord,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingStats {
    pub count: usize,
    pub total_value: f64,
    pub average_price: f64,
}

impl StoredListing {
    pub fn new(seller_id: SellerId, record: ListingRecord) -> Self {
        Self {
            id: ListingId(Uuid::new_v4().to_string()),
            seller_id,
            record,
            created_at: Utc::now(),
        }
    }
}

impl ListingStats {
    pub fn from_listings(listings: &[StoredListing]) -> Self {
        let count = listings.len();
        let total_value: f64 =
            listings.iter().map(|listing| listing.record.price.unwrap_or(0.0)).sum();
        let average_price = if count > 0 { total_value / count as f64 } else { 0.0 };
        Self { count, total_value, average_price }
    }
}

impl ListingRecord {
    /// Plain-text card used when a seller shares the listing over a messenger.
    pub fn share_text(&self) -> String {
        let mut sections = Vec::new();

        let year = self.year.map(|year| format!("{year} ")).unwrap_or_default();
        sections.push(format!("🚗 *{year}{} {}*", self.make, self.model).replace("  ", " "));

        let mut facts = Vec::new();
        if let Some(price) = self.price {
            facts.push(format!("💰 Price: ${}", group_thousands(price)));
        }
        if let Some(mileage) = self.mileage {
            facts.push(format!("📏 Mileage: {} miles", group_thousands(mileage)));
        }
        if !self.condition.is_empty() {
            facts.push(format!("⭐ Condition: {}", self.condition));
        }
        if !facts.is_empty() {
            sections.push(facts.join("\n"));
        }

        if !self.description.is_empty() {
            sections.push(format!("📝 {}", self.description));
        }
        if !self.features.is_empty() {
            sections.push(format!("🔧 Features: {}", self.features.join(", ")));
        }
        if let Some(image_url) = self.image_url.as_deref().filter(|url| !url.is_empty()) {
            sections.push(format!("📸 Image: {image_url}"));
        }

        sections.push("Contact me for more details!".to_string());
        sections.join("\n\n")
    }
}

fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{group_thousands, ListingId, ListingRecord, ListingStats, SellerId, StoredListing};

    fn stored(price: Option<f64>) -> StoredListing {
        StoredListing {
            id: ListingId("L-1".to_string()),
            seller_id: SellerId("seller-1".to_string()),
            record: ListingRecord { price, ..ListingRecord::default() },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn stats_treat_missing_price_as_zero() {
        let stats = ListingStats::from_listings(&[stored(Some(20_000.0)), stored(None)]);

        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_value, 20_000.0);
        assert_eq!(stats.average_price, 10_000.0);
    }

    #[test]
    fn stats_for_empty_dashboard_are_zero() {
        assert_eq!(ListingStats::from_listings(&[]), ListingStats::default());
    }

    #[test]
    fn share_text_includes_known_fields_only() {
        let record = ListingRecord {
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: Some(2020),
            price: Some(25_000.0),
            mileage: Some(45_000.0),
            condition: "Excellent".to_string(),
            features: vec!["Sunroof".to_string(), "Navigation".to_string()],
            ..ListingRecord::default()
        };

        let text = record.share_text();
        assert!(text.starts_with("🚗 *2020 Toyota Camry*"));
        assert!(text.contains("💰 Price: $25,000"));
        assert!(text.contains("📏 Mileage: 45,000 miles"));
        assert!(text.contains("🔧 Features: Sunroof, Navigation"));
        assert!(!text.contains("📸"));
        assert!(text.ends_with("Contact me for more details!"));
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_234_567.0), "1,234,567");
    }

    #[test]
    fn listing_json_uses_camel_case_image_url() {
        let record: ListingRecord = serde_json::from_str(
            r#"{"make":"Kia","model":"Rio","imageUrl":"https://example.com/rio.jpg"}"#,
        )
        .expect("parse listing");

        assert_eq!(record.image_url.as_deref(), Some("https://example.com/rio.jpg"));
        assert!(record.features.is_empty());
        assert_eq!(record.year, None);
    }
}
