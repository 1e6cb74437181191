pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod extraction;
pub mod geo;
pub mod inspection;
pub mod matching;
pub mod questionnaire;
pub mod quota;

pub use catalog::{CarCatalog, CatalogError};
pub use domain::car::{CarRecommendation, CarRecord};
pub use domain::contact::{contact_directory, ContactEntry};
pub use domain::conversation::{ConversationMessage, MessageRole, SessionCounters};
pub use domain::listing::{ListingId, ListingRecord, ListingStats, SellerId, StoredListing};
pub use domain::plan::{plan_catalog, SubscriptionPlan};
pub use domain::repair_shop::{GeoPoint, RepairShop};
pub use domain::user::{UserId, UserProfile, UserRole};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use extraction::ListingExtractor;
pub use matching::RandomMatcher;
pub use questionnaire::{GateOutcome, QuestionnaireGate};
pub use quota::{QuotaDecision, RecommendationQuota};
