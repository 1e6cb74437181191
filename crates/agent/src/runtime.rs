use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use carmatch_core::catalog::CarCatalog;
use carmatch_core::domain::car::{CarRecommendation, CarRecord};
use carmatch_core::domain::contact::{contact_directory, ContactEntry};
use carmatch_core::domain::conversation::{ConversationMessage, SessionCounters};
use carmatch_core::domain::listing::{ListingId, ListingRecord, SellerId, StoredListing};
use carmatch_core::errors::{ApplicationError, DomainError};
use carmatch_core::extraction::ListingExtractor;
use carmatch_core::matching::RandomMatcher;
use carmatch_core::quota::UPSELL_MESSAGE;
use carmatch_db::ListingRepository;

use crate::guardrails::{TurnDecision, TurnPolicy};
use crate::personas::Persona;
use crate::relay::ConversationalRelay;

pub const MATCH_FOUND_MESSAGE: &str =
    "מצאתי עבורך רכב מתאים בהתבסס על הצרכים שלך! 🚗 מה דעתך על האפשרות הזו?";

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerTurn {
    pub messages: Vec<ConversationMessage>,
    #[serde(default)]
    pub recommendations_count: u32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerTurn {
    pub messages: Vec<ConversationMessage>,
    #[serde(default)]
    pub seller_id: Option<SellerId>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerReply {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_recommendations: Option<Vec<CarRecommendation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_cars: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_limit_reached: Option<bool>,
}

impl BuyerReply {
    fn conversation(message: String) -> Self {
        Self {
            message,
            car_recommendations: None,
            recommendations_count: None,
            found_cars: None,
            is_limit_reached: None,
        }
    }

    fn upsell() -> Self {
        Self { is_limit_reached: Some(true), ..Self::conversation(UPSELL_MESSAGE.to_string()) }
    }

    fn matched(recommendations: Vec<CarRecommendation>, counters: SessionCounters) -> Self {
        Self {
            car_recommendations: Some(recommendations),
            recommendations_count: Some(counters.recommendations_count),
            found_cars: Some(true),
            ..Self::conversation(MATCH_FOUND_MESSAGE.to_string())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerReply {
    pub message: String,
    pub car_listing: Option<ListingRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<ListingId>,
}

pub struct AgentRuntime {
    relay: ConversationalRelay,
    policy: TurnPolicy,
    catalog: CarCatalog,
    matcher: RandomMatcher,
    extractor: ListingExtractor,
    contacts: Vec<ContactEntry>,
    listings: Option<Arc<dyn ListingRepository>>,
    rng: Mutex<StdRng>,
}

impl AgentRuntime {
    pub fn new(relay: ConversationalRelay, policy: TurnPolicy, catalog: CarCatalog) -> Self {
        Self {
            relay,
            policy,
            catalog,
            matcher: RandomMatcher::new(),
            extractor: ListingExtractor::new(),
            contacts: contact_directory(),
            listings: None,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Extracted listings are saved here when the seller is identified.
    pub fn with_listing_repository(mut self, listings: Arc<dyn ListingRepository>) -> Self {
        self.listings = Some(listings);
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn policy(&self) -> TurnPolicy {
        self.policy
    }

    pub fn catalog(&self) -> &CarCatalog {
        &self.catalog
    }

    pub async fn handle_buyer_turn(
        &self,
        turn: BuyerTurn,
    ) -> Result<BuyerReply, ApplicationError> {
        let counters = SessionCounters::new(turn.recommendations_count);
        let decision = self.policy.evaluate(&turn.messages, counters);

        if decision == TurnDecision::Upsell {
            info!(
                event_name = "chat.buyer.limit_reached",
                recommendations_count = counters.recommendations_count,
                cap = self.policy.quota().cap(),
                "free recommendations exhausted"
            );
            return Ok(BuyerReply::upsell());
        }

        if turn.messages.is_empty() {
            return Err(
                DomainError::InvalidTranscript("messages must not be empty".to_string()).into()
            );
        }

        if let TurnDecision::Match { .. } = decision {
            let recommendations = self.recommend(&turn.messages).await;
            if !recommendations.is_empty() {
                let advanced = counters.advanced();
                info!(
                    event_name = "chat.buyer.match_returned",
                    reason_code = decision.reason_code(),
                    car = recommendations[0].car.display_name(),
                    recommendations_count = advanced.recommendations_count,
                    "car recommendation returned"
                );
                return Ok(BuyerReply::matched(recommendations, advanced));
            }
            warn!(
                event_name = "chat.buyer.match_empty",
                catalog = %self.catalog.path().display(),
                "questionnaire complete but no car could be matched, continuing conversation"
            );
        }

        let reply = self
            .relay
            .relay(Persona::Buyer, &turn.messages)
            .await
            .map_err(|error| ApplicationError::Integration(format!("{error:#}")))?;

        Ok(BuyerReply::conversation(reply))
    }

    pub async fn handle_seller_turn(
        &self,
        turn: SellerTurn,
    ) -> Result<SellerReply, ApplicationError> {
        if turn.messages.is_empty() {
            return Err(
                DomainError::InvalidTranscript("messages must not be empty".to_string()).into()
            );
        }

        let reply = self
            .relay
            .relay(Persona::Seller, &turn.messages)
            .await
            .map_err(|error| ApplicationError::Integration(format!("{error:#}")))?;

        let car_listing = self.extractor.extract(&reply);
        let listing_id = match (&car_listing, turn.seller_id) {
            (Some(record), Some(seller_id)) => {
                self.persist_listing(seller_id, record.clone()).await
            }
            _ => None,
        };

        if car_listing.is_some() {
            info!(
                event_name = "chat.seller.listing_extracted",
                persisted = listing_id.is_some(),
                "listing extracted from assistant reply"
            );
        }

        Ok(SellerReply { message: reply, car_listing, listing_id })
    }

    async fn recommend(&self, messages: &[ConversationMessage]) -> Vec<CarRecommendation> {
        let cars = self.load_catalog().await;
        let preferences = serde_json::to_string(messages).unwrap_or_default();

        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.matcher.recommend(&cars, &self.contacts, &preferences, &mut *rng)
    }

    async fn load_catalog(&self) -> Vec<CarRecord> {
        let catalog = self.catalog.clone();
        match tokio::task::spawn_blocking(move || catalog.load()).await {
            Ok(cars) => cars,
            Err(error) => {
                warn!(
                    event_name = "catalog.load.failed",
                    error = %error,
                    "catalog load task did not complete"
                );
                Vec::new()
            }
        }
    }

    /// Persistence failures are logged and the reply still goes out.
    async fn persist_listing(
        &self,
        seller_id: SellerId,
        record: ListingRecord,
    ) -> Option<ListingId> {
        let repository = self.listings.as_ref()?;
        let listing = StoredListing::new(seller_id, record);
        let id = listing.id.clone();

        match repository.save(listing).await {
            Ok(()) => Some(id),
            Err(error) => {
                warn!(
                    event_name = "chat.seller.listing_persist_failed",
                    listing_id = %id.0,
                    error = %error,
                    "could not save extracted listing"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use tempfile::TempDir;

    use carmatch_core::catalog::CarCatalog;
    use carmatch_core::domain::contact::contact_directory;
    use carmatch_core::domain::conversation::ConversationMessage;
    use carmatch_core::domain::listing::SellerId;
    use carmatch_core::errors::ApplicationError;
    use carmatch_core::quota::UPSELL_MESSAGE;
    use carmatch_db::{InMemoryListingRepository, ListingRepository};

    use super::{AgentRuntime, BuyerTurn, SellerTurn, MATCH_FOUND_MESSAGE};
    use crate::guardrails::TurnPolicy;
    use crate::llm::LlmClient;
    use crate::relay::ConversationalRelay;

    const CATALOG: &str = "brand,model,car_name,price,year,hand_num,horse_power,4x4,fuel_type,engine_volume,valid_test,magnesium_wheels,distance_control,economical,adaptive_cruise_control,cruise_control,brand_normalized,brand_group
Toyota,Corolla,Toyota Corolla,85000,2019,2,132,0,petrol,1.6,1,1,0,1,0,1,toyota,japanese
Kia,Sportage,Kia Sportage,120000,2021,1,177,1,hybrid,1.6,1,1,1,0,1,1,kia,korean
";

    struct ScriptedClient {
        reply: String,
        fail: bool,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self { reply: reply.to_string(), fail: false, calls: AtomicUsize::new(0) })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { reply: String::new(), fail: true, calls: AtomicUsize::new(0) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn complete(
            &self,
            _system: &str,
            _messages: &[ConversationMessage],
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                bail!("provider unavailable");
            }
            Ok(self.reply.clone())
        }
    }

    struct Fixture {
        _dir: TempDir,
        catalog: CarCatalog,
    }

    fn fixture(contents: &str) -> Fixture {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("cars.csv");
        fs::write(&path, contents).expect("write catalog");
        Fixture { catalog: CarCatalog::new(path), _dir: dir }
    }

    fn runtime(client: Arc<ScriptedClient>, catalog: CarCatalog) -> AgentRuntime {
        AgentRuntime::new(ConversationalRelay::new(client), TurnPolicy::default(), catalog)
            .with_rng_seed(7)
    }

    fn transcript(user_turns: usize) -> Vec<ConversationMessage> {
        let mut messages = Vec::new();
        for turn in 0..user_turns {
            messages.push(ConversationMessage::assistant(format!("question {turn}")));
            messages.push(ConversationMessage::user(format!("answer {turn}")));
        }
        messages
    }

    #[tokio::test]
    async fn incomplete_questionnaire_relays_to_model() {
        let fixture = fixture(CATALOG);
        let client = ScriptedClient::replying("מה סגנון הנהיגה שלך?");
        let runtime = runtime(client.clone(), fixture.catalog.clone());

        let reply = runtime
            .handle_buyer_turn(BuyerTurn { messages: transcript(8), recommendations_count: 0 })
            .await
            .expect("buyer reply");

        assert_eq!(reply.message, "מה סגנון הנהיגה שלך?");
        assert!(reply.car_recommendations.is_none());
        assert!(reply.recommendations_count.is_none());
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn complete_questionnaire_returns_one_car_with_contact() {
        let fixture = fixture(CATALOG);
        let client = ScriptedClient::replying("unused");
        let runtime = runtime(client.clone(), fixture.catalog.clone());

        let reply = runtime
            .handle_buyer_turn(BuyerTurn { messages: transcript(9), recommendations_count: 1 })
            .await
            .expect("buyer reply");

        let recommendations = reply.car_recommendations.expect("recommendations");
        assert_eq!(recommendations.len(), 1);
        assert!(contact_directory().contains(&recommendations[0].contact));
        assert!(["Corolla", "Sportage"].contains(&recommendations[0].car.model.as_str()));
        assert_eq!(reply.message, MATCH_FOUND_MESSAGE);
        assert_eq!(reply.recommendations_count, Some(2));
        assert_eq!(reply.found_cars, Some(true));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn exhausted_quota_upsells_without_model_call() {
        let fixture = fixture(CATALOG);
        let client = ScriptedClient::replying("unused");
        let runtime = runtime(client.clone(), fixture.catalog.clone());

        let reply = runtime
            .handle_buyer_turn(BuyerTurn { messages: transcript(9), recommendations_count: 2 })
            .await
            .expect("buyer reply");

        assert_eq!(reply.message, UPSELL_MESSAGE);
        assert_eq!(reply.is_limit_reached, Some(true));
        assert!(reply.car_recommendations.is_none());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn empty_catalog_falls_back_to_conversation() {
        let fixture = fixture("brand,model\n");
        let client = ScriptedClient::replying("בוא נמשיך לדבר");
        let runtime = runtime(client.clone(), fixture.catalog.clone());

        let reply = runtime
            .handle_buyer_turn(BuyerTurn { messages: transcript(10), recommendations_count: 0 })
            .await
            .expect("buyer reply");

        assert!(reply.car_recommendations.is_none());
        assert_eq!(reply.message, "בוא נמשיך לדבר");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn provider_failure_is_an_integration_error() {
        let fixture = fixture(CATALOG);
        let runtime = runtime(ScriptedClient::failing(), fixture.catalog.clone());

        let error = runtime
            .handle_buyer_turn(BuyerTurn { messages: transcript(1), recommendations_count: 0 })
            .await
            .expect_err("should fail");

        assert!(matches!(error, ApplicationError::Integration(_)));
    }

    #[tokio::test]
    async fn empty_transcript_is_rejected() {
        let fixture = fixture(CATALOG);
        let runtime = runtime(ScriptedClient::replying("unused"), fixture.catalog.clone());

        let error = runtime
            .handle_seller_turn(SellerTurn { messages: Vec::new(), seller_id: None })
            .await
            .expect_err("should fail");

        assert!(matches!(error, ApplicationError::Domain(_)));
    }

    #[tokio::test]
    async fn seller_listing_is_extracted_and_saved_for_known_seller() {
        let fixture = fixture(CATALOG);
        let client = ScriptedClient::replying(
            "Your listing has been saved!\n{\"carListing\": {\"make\": \"Mazda\", \"model\": \"3\", \"year\": 2018, \"price\": 64000}}",
        );
        let repository = Arc::new(InMemoryListingRepository::default());
        let runtime = runtime(client, fixture.catalog.clone())
            .with_listing_repository(repository.clone());

        let reply = runtime
            .handle_seller_turn(SellerTurn {
                messages: transcript(10),
                seller_id: Some(SellerId("seller-1".to_string())),
            })
            .await
            .expect("seller reply");

        let listing = reply.car_listing.expect("listing");
        assert_eq!(listing.make, "Mazda");
        let listing_id = reply.listing_id.expect("listing id");

        let stored =
            repository.find_by_id(&listing_id).await.expect("find").expect("stored listing");
        assert_eq!(stored.seller_id, SellerId("seller-1".to_string()));
        assert_eq!(stored.record.price, Some(64_000.0));
    }

    #[tokio::test]
    async fn anonymous_seller_listing_is_returned_but_not_saved() {
        let fixture = fixture(CATALOG);
        let client =
            ScriptedClient::replying("{\"carListing\": {\"make\": \"Kia\", \"model\": \"Rio\"}}");
        let repository = Arc::new(InMemoryListingRepository::default());
        let runtime = runtime(client, fixture.catalog.clone())
            .with_listing_repository(repository.clone());

        let reply = runtime
            .handle_seller_turn(SellerTurn { messages: transcript(3), seller_id: None })
            .await
            .expect("seller reply");

        assert!(reply.car_listing.is_some());
        assert!(reply.listing_id.is_none());
    }

    #[test]
    fn buyer_reply_omits_absent_fields() {
        let json = serde_json::to_value(super::BuyerReply::conversation("hi".to_string()))
            .expect("serialize");
        assert_eq!(json, serde_json::json!({"message": "hi"}));

        let upsell = serde_json::to_value(super::BuyerReply::upsell()).expect("serialize");
        assert_eq!(upsell["isLimitReached"], serde_json::json!(true));
    }
}
