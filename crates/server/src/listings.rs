use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use carmatch_core::domain::listing::{ListingId, ListingStats, SellerId, StoredListing};
use carmatch_core::errors::{ApplicationError, DomainError};

use crate::app::AppState;
use crate::error::{application_error, correlation_id, repository_error, ErrorBody, HandlerError};

pub const SHARE_BASE_URL: &str = "https://wa.me/";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerQuery {
    pub seller_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
    pub text: String,
    pub url: String,
}

pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<SellerQuery>,
) -> Result<Json<Vec<StoredListing>>, HandlerError> {
    let correlation_id = correlation_id();
    let seller_id = seller_id(&query, &correlation_id)?;

    state
        .listings
        .list_for_seller(&seller_id)
        .await
        .map(Json)
        .map_err(|error| repository_error(error, &correlation_id))
}

pub async fn listing_stats(
    State(state): State<AppState>,
    Query(query): Query<SellerQuery>,
) -> Result<Json<ListingStats>, HandlerError> {
    let correlation_id = correlation_id();
    let seller_id = seller_id(&query, &correlation_id)?;

    let listings = state
        .listings
        .list_for_seller(&seller_id)
        .await
        .map_err(|error| repository_error(error, &correlation_id))?;
    Ok(Json(ListingStats::from_listings(&listings)))
}

pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredListing>, HandlerError> {
    let correlation_id = correlation_id();
    find_listing(&state, id, &correlation_id).await.map(Json)
}

/// Messenger share link for a listing. The text is the same card the seller
/// sees in the dashboard.
pub async fn share_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShareLink>, HandlerError> {
    let correlation_id = correlation_id();
    let listing = find_listing(&state, id, &correlation_id).await?;
    let text = listing.record.share_text();

    let url = reqwest::Url::parse_with_params(SHARE_BASE_URL, &[("text", text.as_str())])
        .map_err(|error| {
            application_error(
                ApplicationError::Configuration(format!("invalid share url: {error}")),
                &correlation_id,
            )
        })?;

    Ok(Json(ShareLink { text, url: url.to_string() }))
}

fn seller_id(query: &SellerQuery, correlation_id: &str) -> Result<SellerId, HandlerError> {
    let seller_id = query.seller_id.trim();
    if seller_id.is_empty() {
        return Err(application_error(
            DomainError::InvariantViolation("sellerId is required".to_string()).into(),
            correlation_id,
        ));
    }
    Ok(SellerId(seller_id.to_string()))
}

async fn find_listing(
    state: &AppState,
    id: String,
    correlation_id: &str,
) -> Result<StoredListing, HandlerError> {
    let listing_id = ListingId(id);
    match state.listings.find_by_id(&listing_id).await {
        Ok(Some(listing)) => Ok(listing),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: format!("listing `{}` not found", listing_id.0),
                correlation_id: Some(correlation_id.to_string()),
            }),
        )),
        Err(error) => Err(repository_error(error, correlation_id)),
    }
}
