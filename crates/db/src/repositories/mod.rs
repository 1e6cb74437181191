use async_trait::async_trait;
use thiserror::Error;

use carmatch_core::domain::listing::{ListingId, SellerId, StoredListing};
use carmatch_core::domain::user::{UserId, UserProfile};

pub mod listing;
pub mod memory;
pub mod user_profile;

pub use listing::SqlListingRepository;
pub use memory::{InMemoryListingRepository, InMemoryUserProfileRepository};
pub use user_profile::SqlUserProfileRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn find_by_id(&self, id: &ListingId) -> Result<Option<StoredListing>, RepositoryError>;
    async fn save(&self, listing: StoredListing) -> Result<(), RepositoryError>;
    /// Listings owned by the seller, newest first.
    async fn list_for_seller(
        &self,
        seller_id: &SellerId,
    ) -> Result<Vec<StoredListing>, RepositoryError>;
}

#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;
    async fn save(&self, profile: UserProfile) -> Result<(), RepositoryError>;
}
