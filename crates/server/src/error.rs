use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use carmatch_core::errors::{ApplicationError, InterfaceError};
use carmatch_db::RepositoryError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

pub type HandlerError = (StatusCode, Json<ErrorBody>);

pub fn correlation_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Client errors keep their message; server-side failures only expose the
/// user-safe text.
pub fn interface_error(error: InterfaceError) -> HandlerError {
    let (status, message) = match &error {
        InterfaceError::BadRequest { message, .. } => (StatusCode::BAD_REQUEST, message.clone()),
        InterfaceError::NotFound { message, .. } => (StatusCode::NOT_FOUND, message.clone()),
        InterfaceError::ServiceUnavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, error.user_message().to_string())
        }
        InterfaceError::Internal { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, error.user_message().to_string())
        }
    };

    (
        status,
        Json(ErrorBody {
            error: message,
            correlation_id: Some(error.correlation_id().to_string()),
        }),
    )
}

pub fn application_error(error: ApplicationError, correlation_id: &str) -> HandlerError {
    interface_error(error.into_interface(correlation_id))
}

/// Unreadable or mistyped request bodies keep axum's status but use the
/// same JSON shape as every other error.
pub fn body_rejection(rejection: JsonRejection, correlation_id: &str) -> HandlerError {
    let status = rejection.status();
    let message = rejection.body_text();
    warn!(
        event_name = "system.request.rejected",
        correlation_id,
        status = %status,
        error = %message,
        "request body rejected"
    );
    (status, Json(ErrorBody { error: message, correlation_id: Some(correlation_id.to_string()) }))
}

/// Storage failures surface as a retryable persistence error; the
/// repository detail only reaches the log.
pub fn repository_error(error: RepositoryError, correlation_id: &str) -> HandlerError {
    error!(
        event_name = "system.repository.error",
        correlation_id,
        error = %error,
        "repository call failed"
    );
    application_error(ApplicationError::Persistence(error.to_string()), correlation_id)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use carmatch_core::errors::{ApplicationError, DomainError};

    use super::{application_error, repository_error};

    #[test]
    fn bad_request_keeps_domain_message() {
        let (status, body) = application_error(
            DomainError::InvariantViolation("name is required".to_string()).into(),
            "req-1",
        );

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.0.error, "name is required");
        assert_eq!(body.0.correlation_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn integration_failure_hides_upstream_detail() {
        let (status, body) = application_error(
            ApplicationError::Integration("api key sk-123 rejected".to_string()),
            "req-2",
        );

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.0.error.contains("sk-123"));
    }

    #[test]
    fn repository_failure_is_retryable_persistence_error() {
        let (status, body) = repository_error(
            carmatch_db::RepositoryError::Decode("bad row".to_string()),
            "req-3",
        );

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.0.error.contains("bad row"));
        assert_eq!(body.0.correlation_id.as_deref(), Some("req-3"));
    }
}
