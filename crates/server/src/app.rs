use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use carmatch_agent::AgentRuntime;
use carmatch_db::{DbPool, ListingRepository, UserProfileRepository};
use carmatch_places::ShopFinder;

use crate::{chat, health, listings, plans, repair, users};

/// Shared handles every API handler reads from.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<AgentRuntime>,
    pub listings: Arc<dyn ListingRepository>,
    pub users: Arc<dyn UserProfileRepository>,
    pub finder: Arc<dyn ShopFinder>,
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat/buyer", post(chat::buyer_chat))
        .route("/api/chat/seller", post(chat::seller_chat))
        .route("/api/listings", get(listings::list_listings))
        .route("/api/listings/stats", get(listings::listing_stats))
        .route("/api/listings/{id}", get(listings::get_listing))
        .route("/api/listings/{id}/share", get(listings::share_listing))
        .route("/api/users", post(users::register_user))
        .route("/api/users/{id}", get(users::get_user))
        .route("/api/inspection/checks", get(repair::inspection_checks))
        .route("/api/repair-shops", post(repair::find_repair_shops))
        .route("/api/plans", get(plans::list_plans))
        .with_state(state)
}

pub fn router(state: AppState, db_pool: DbPool) -> Router {
    let catalog = state.agent.catalog().clone();
    api_router(state).merge(health::router(db_pool, catalog)).layer(TraceLayer::new_for_http())
}
