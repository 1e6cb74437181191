//! Best-effort recovery of the structured listing block the seller persona is
//! prompted to emit. Model output is never guaranteed to contain it, so every
//! failure path yields `None`.
//!
//! Only JSON syntax and the `carListing` object itself are required. Field
//! values are coerced leniently: numbers may arrive as strings ("25,000",
//! "45000 km") or floats, and `null` or mistyped fields fall back to defaults.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::listing::ListingRecord;

pub const LISTING_KEY: &str = "carListing";

static LISTING_BLOCK: OnceLock<Regex> = OnceLock::new();

fn listing_block() -> &'static Regex {
    LISTING_BLOCK.get_or_init(|| {
        Regex::new(r#"(?s)\{.*"carListing".*\}"#).expect("listing block pattern is valid")
    })
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ListingExtractor;

impl ListingExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> Option<ListingRecord> {
        let block = listing_block().find(text)?;

        let envelope = match serde_json::from_str::<Value>(block.as_str()) {
            Ok(value) => value,
            Err(error) => {
                debug!(
                    event_name = "chat.seller.listing_parse_skipped",
                    error = %error,
                    "listing block found but could not be parsed"
                );
                return None;
            }
        };

        match envelope.get(LISTING_KEY) {
            Some(Value::Object(fields)) => Some(record_from_fields(fields)),
            _ => {
                debug!(
                    event_name = "chat.seller.listing_parse_skipped",
                    "listing block has no carListing object"
                );
                None
            }
        }
    }
}

fn record_from_fields(fields: &Map<String, Value>) -> ListingRecord {
    ListingRecord {
        make: text_field(fields, "make").unwrap_or_default(),
        model: text_field(fields, "model").unwrap_or_default(),
        year: number_field(fields, "year").map(|year| year.round() as i32),
        price: number_field(fields, "price"),
        mileage: number_field(fields, "mileage"),
        condition: text_field(fields, "condition").unwrap_or_default(),
        features: features_field(fields),
        description: text_field(fields, "description").unwrap_or_default(),
        image_url: text_field(fields, "imageUrl").filter(|url| !url.is_empty()),
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn number_field(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    match fields.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_loose_number(text),
        _ => None,
    }
}

/// Reads the leading number out of free text, ignoring thousands separators
/// and trailing units.
fn parse_loose_number(text: &str) -> Option<f64> {
    let digits: String = text
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-')
        .chars()
        .filter(|c| *c != ',')
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    digits.parse().ok()
}

fn features_field(fields: &Map<String, Value>) -> Vec<String> {
    match fields.get("features") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(text)) if !text.trim().is_empty() => vec![text.trim().to_string()],
        _ => Vec::new(),
    }
}
