use std::collections::HashMap;

use tokio::sync::RwLock;

use carmatch_core::domain::listing::{ListingId, SellerId, StoredListing};
use carmatch_core::domain::user::{UserId, UserProfile};

use super::{ListingRepository, RepositoryError, UserProfileRepository};

#[derive(Default)]
pub struct InMemoryListingRepository {
    listings: RwLock<HashMap<String, StoredListing>>,
}

#[async_trait::async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn find_by_id(&self, id: &ListingId) -> Result<Option<StoredListing>, RepositoryError> {
        let listings = self.listings.read().await;
        Ok(listings.get(&id.0).cloned())
    }

    async fn save(&self, listing: StoredListing) -> Result<(), RepositoryError> {
        let mut listings = self.listings.write().await;
        listings.insert(listing.id.0.clone(), listing);
        Ok(())
    }

    async fn list_for_seller(
        &self,
        seller_id: &SellerId,
    ) -> Result<Vec<StoredListing>, RepositoryError> {
        let listings = self.listings.read().await;
        let mut owned: Vec<StoredListing> =
            listings.values().filter(|listing| &listing.seller_id == seller_id).cloned().collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }
}

#[derive(Default)]
pub struct InMemoryUserProfileRepository {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

#[async_trait::async_trait]
impl UserProfileRepository for InMemoryUserProfileRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&id.0).cloned())
    }

    async fn save(&self, profile: UserProfile) -> Result<(), RepositoryError> {
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.user_id.0.clone(), profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use carmatch_core::domain::listing::{ListingRecord, SellerId, StoredListing};
    use carmatch_core::domain::user::{UserId, UserProfile, UserRole};

    use crate::repositories::{
        InMemoryListingRepository, InMemoryUserProfileRepository, ListingRepository,
        UserProfileRepository,
    };

    #[tokio::test]
    async fn in_memory_listing_repo_orders_newest_first() {
        let repo = InMemoryListingRepository::default();
        let seller = SellerId("seller-1".to_string());

        let mut older = StoredListing::new(seller.clone(), ListingRecord::default());
        older.created_at = Utc::now() - Duration::hours(2);
        let newer = StoredListing::new(seller.clone(), ListingRecord::default());

        repo.save(older.clone()).await.expect("save older");
        repo.save(newer.clone()).await.expect("save newer");
        repo.save(StoredListing::new(SellerId("other".to_string()), ListingRecord::default()))
            .await
            .expect("save other");

        let listings = repo.list_for_seller(&seller).await.expect("list");
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].id, newer.id);
        assert_eq!(listings[1].id, older.id);
        assert_eq!(repo.find_by_id(&older.id).await.expect("find"), Some(older));
    }

    #[tokio::test]
    async fn in_memory_profile_repo_round_trip() {
        let repo = InMemoryUserProfileRepository::default();
        let profile = UserProfile {
            user_id: UserId("uid-7".to_string()),
            name: "Avi".to_string(),
            email: "avi@example.com".to_string(),
            role: UserRole::Buyer,
            created_at: Utc::now(),
        };

        repo.save(profile.clone()).await.expect("save profile");
        let found = repo.find_by_id(&profile.user_id).await.expect("find profile");

        assert_eq!(found, Some(profile));
    }
}
