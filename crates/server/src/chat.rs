use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use tracing::error;

use carmatch_agent::{BuyerReply, BuyerTurn, SellerReply, SellerTurn};
use carmatch_core::errors::ApplicationError;

use crate::app::AppState;
use crate::error::{application_error, body_rejection, correlation_id, ErrorBody, HandlerError};

pub const CHAT_FAILURE_MESSAGE: &str = "Failed to generate response";

pub async fn buyer_chat(
    State(state): State<AppState>,
    payload: Result<Json<BuyerTurn>, JsonRejection>,
) -> Result<Json<BuyerReply>, HandlerError> {
    let correlation_id = correlation_id();
    let Json(turn) = payload.map_err(|rejection| body_rejection(rejection, &correlation_id))?;
    state
        .agent
        .handle_buyer_turn(turn)
        .await
        .map(Json)
        .map_err(|error| chat_error(error, &correlation_id, "buyer"))
}

pub async fn seller_chat(
    State(state): State<AppState>,
    payload: Result<Json<SellerTurn>, JsonRejection>,
) -> Result<Json<SellerReply>, HandlerError> {
    let correlation_id = correlation_id();
    let Json(turn) = payload.map_err(|rejection| body_rejection(rejection, &correlation_id))?;
    state
        .agent
        .handle_seller_turn(turn)
        .await
        .map(Json)
        .map_err(|error| chat_error(error, &correlation_id, "seller"))
}

/// Malformed turns are the caller's fault; anything else is reported as a
/// generic generation failure.
fn chat_error(error: ApplicationError, correlation_id: &str, persona: &str) -> HandlerError {
    if matches!(error, ApplicationError::Domain(_)) {
        return application_error(error, correlation_id);
    }

    error!(
        event_name = "chat.turn.failed",
        correlation_id,
        persona,
        error = %error,
        "chat turn failed"
    );
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: CHAT_FAILURE_MESSAGE.to_string(),
            correlation_id: Some(correlation_id.to_string()),
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use axum::{extract::State, http::StatusCode, Json};
    use carmatch_agent::{BuyerTurn, SellerTurn};
    use carmatch_core::domain::conversation::ConversationMessage;
    use carmatch_core::domain::listing::SellerId;
    use carmatch_core::quota::UPSELL_MESSAGE;
    use tempfile::TempDir;

    use super::{buyer_chat, seller_chat, CHAT_FAILURE_MESSAGE};
    use crate::app::test_support::{state, CannedClient, SAMPLE_CATALOG};

    fn questionnaire(user_turns: usize) -> Vec<ConversationMessage> {
        let mut messages = vec![ConversationMessage::assistant("שלום! אני דני")];
        for turn in 0..user_turns {
            messages.push(ConversationMessage::user(format!("תשובה {turn}")));
            messages.push(ConversationMessage::assistant("שאלה הבאה"));
        }
        messages
    }

    #[tokio::test]
    async fn completed_questionnaire_returns_one_recommendation() {
        let dir = TempDir::new().expect("temp dir");
        let catalog = dir.path().join("cars.csv");
        fs::write(&catalog, SAMPLE_CATALOG).expect("write catalog");
        let client = CannedClient::replying("unused");

        let Json(reply) = buyer_chat(
            State(state(client.clone(), &catalog)),
            Ok(Json(BuyerTurn { messages: questionnaire(9), recommendations_count: 0 })),
        )
        .await
        .expect("buyer reply");

        let cars = reply.car_recommendations.expect("recommendations");
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].car.car_name, "Mazda 3");
        assert_eq!(reply.recommendations_count, Some(1));
        assert_eq!(reply.found_cars, Some(true));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn exhausted_quota_returns_upsell_without_model_call() {
        let dir = TempDir::new().expect("temp dir");
        let client = CannedClient::replying("unused");

        let Json(reply) = buyer_chat(
            State(state(client.clone(), &dir.path().join("cars.csv"))),
            Ok(Json(BuyerTurn { messages: questionnaire(12), recommendations_count: 2 })),
        )
        .await
        .expect("buyer reply");

        assert_eq!(reply.message, UPSELL_MESSAGE);
        assert_eq!(reply.is_limit_reached, Some(true));
        assert!(reply.car_recommendations.is_none());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn empty_transcript_is_bad_request() {
        let dir = TempDir::new().expect("temp dir");

        let result = buyer_chat(
            State(state(CannedClient::replying("hi"), &dir.path().join("cars.csv"))),
            Ok(Json(BuyerTurn { messages: Vec::new(), recommendations_count: 0 })),
        )
        .await;

        let (status, _) = result.expect_err("empty transcript");
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn model_failure_is_generic_server_error() {
        let dir = TempDir::new().expect("temp dir");

        let result = seller_chat(
            State(state(CannedClient::failing(), &dir.path().join("cars.csv"))),
            Ok(Json(SellerTurn {
                messages: vec![ConversationMessage::user("I want to sell my car")],
                seller_id: None,
            })),
        )
        .await;

        let (status, Json(body)) = result.expect_err("model failure");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, CHAT_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn seller_listing_is_persisted_for_known_seller() {
        let dir = TempDir::new().expect("temp dir");
        let reply = r#"Here is your listing!
```json
{"carListing": {"make": "Honda", "model": "Civic", "year": 2018, "price": 15000, "mileage": 60000, "condition": "Good", "features": ["Bluetooth"], "description": "Reliable commuter"}}
```"#;
        let app_state = state(CannedClient::replying(reply), &dir.path().join("cars.csv"));
        let seller = SellerId("seller-7".to_string());

        let Json(response) = seller_chat(
            State(app_state.clone()),
            Ok(Json(SellerTurn {
                messages: vec![ConversationMessage::user("Honda Civic 2018")],
                seller_id: Some(seller.clone()),
            })),
        )
        .await
        .expect("seller reply");

        let listing = response.car_listing.expect("extracted listing");
        assert_eq!(listing.make, "Honda");
        let listing_id = response.listing_id.expect("persisted listing id");

        let stored = app_state.listings.list_for_seller(&seller).await.expect("list listings");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, listing_id);
    }
}
