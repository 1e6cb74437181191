use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use carmatch_core::domain::repair_shop::RepairShop;
use carmatch_core::errors::ApplicationError;
use carmatch_core::inspection::{inspection_checklist, validate_selection, InspectionCheck};
use carmatch_places::{LookupError, LookupRequest};

use crate::app::AppState;
use crate::error::{application_error, body_rejection, correlation_id, HandlerError};

pub const NO_SHOPS_NOTICE: &str = "לא נמצאו מוסכים באזור זה.";

#[derive(Clone, Debug, Deserialize)]
pub struct RepairShopQuery {
    #[serde(flatten)]
    pub lookup: LookupRequest,
    #[serde(default)]
    pub checks: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairShopResponse {
    pub shops: Vec<RepairShop>,
    pub selected_checks: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

pub async fn inspection_checks() -> Json<Vec<InspectionCheck>> {
    Json(inspection_checklist())
}

pub async fn find_repair_shops(
    State(state): State<AppState>,
    payload: Result<Json<RepairShopQuery>, JsonRejection>,
) -> Result<Json<RepairShopResponse>, HandlerError> {
    let correlation_id = correlation_id();
    let Json(query) = payload.map_err(|rejection| body_rejection(rejection, &correlation_id))?;
    let selected_checks = validate_selection(&query.checks)
        .map_err(|error| application_error(error.into(), &correlation_id))?;

    let shops = state.finder.find_nearby(&query.lookup).await.map_err(|error| {
        warn!(
            event_name = "places.lookup.failed",
            correlation_id = %correlation_id,
            finder = state.finder.name(),
            error = %error,
            "repair shop lookup failed"
        );
        let mapped = match &error {
            LookupError::LocationNotFound(_) => ApplicationError::NotFound(error.to_string()),
            LookupError::Integration(detail) => ApplicationError::Integration(detail.clone()),
        };
        application_error(mapped, &correlation_id)
    })?;

    info!(
        event_name = "places.request.completed",
        correlation_id = %correlation_id,
        shop_count = shops.len(),
        check_count = selected_checks.len(),
        "repair shop request served"
    );

    let notice = shops.is_empty().then_some(NO_SHOPS_NOTICE);
    Ok(Json(RepairShopResponse { shops, selected_checks, notice }))
}
