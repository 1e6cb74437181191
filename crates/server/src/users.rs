use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use carmatch_core::domain::user::{UserId, UserProfile, UserRole};
use carmatch_core::errors::ApplicationError;

use crate::app::AppState;
use crate::error::{
    application_error, body_rejection, correlation_id, repository_error, HandlerError,
};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub home_path: &'static str,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        let home_path = profile.role.home_path();
        Self { profile, home_path }
    }
}

/// Creates or replaces a profile. Re-registering keeps the original
/// creation time.
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUser>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), HandlerError> {
    let correlation_id = correlation_id();
    let Json(request) = payload.map_err(|rejection| body_rejection(rejection, &correlation_id))?;
    let role = request
        .role
        .parse::<UserRole>()
        .map_err(|error| application_error(error.into(), &correlation_id))?;

    let user_id = UserId(request.user_id.trim().to_string());
    let existing = state
        .users
        .find_by_id(&user_id)
        .await
        .map_err(|error| repository_error(error, &correlation_id))?;

    let profile = UserProfile {
        user_id,
        name: request.name.trim().to_string(),
        email: request.email.trim().to_string(),
        role,
        created_at: existing.as_ref().map(|profile| profile.created_at).unwrap_or_else(Utc::now),
    };
    profile.validate().map_err(|error| application_error(error.into(), &correlation_id))?;

    state
        .users
        .save(profile.clone())
        .await
        .map_err(|error| repository_error(error, &correlation_id))?;

    info!(
        event_name = "users.profile.saved",
        correlation_id = %correlation_id,
        role = profile.role.as_str(),
        created = existing.is_none(),
        "user profile saved"
    );

    let status = if existing.is_none() { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(profile.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, HandlerError> {
    let correlation_id = correlation_id();
    let user_id = UserId(id);

    match state.users.find_by_id(&user_id).await {
        Ok(Some(profile)) => Ok(Json(profile.into())),
        Ok(None) => Err(application_error(
            ApplicationError::NotFound(format!("user `{}` not found", user_id.0)),
            &correlation_id,
        )),
        Err(error) => Err(repository_error(error, &correlation_id)),
    }
}
