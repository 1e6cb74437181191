use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;

use carmatch_core::domain::listing::{ListingId, ListingRecord, SellerId, StoredListing};

use super::{ListingRepository, RepositoryError};
use crate::DbPool;

pub struct SqlListingRepository {
    pool: DbPool,
}

impl SqlListingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Fixed-width timestamps so `ORDER BY created_at` sorts chronologically.
pub(crate) fn timestamp_text(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("invalid timestamp `{value}`: {e}")))
}

fn row_to_listing(row: &sqlx::sqlite::SqliteRow) -> Result<StoredListing, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let seller_id: String =
        row.try_get("seller_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let make: String = row.try_get("make").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let model: String =
        row.try_get("model").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let year: Option<i64> =
        row.try_get("year").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price: Option<f64> =
        row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let mileage: Option<f64> =
        row.try_get("mileage").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let condition: String =
        row.try_get("condition").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let features_json: String =
        row.try_get("features_json").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let description: String =
        row.try_get("description").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let image_url: Option<String> =
        row.try_get("image_url").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let features: Vec<String> = serde_json::from_str(&features_json)
        .map_err(|e| RepositoryError::Decode(format!("invalid features for listing {id}: {e}")))?;
    let year = year
        .map(i32::try_from)
        .transpose()
        .map_err(|e| RepositoryError::Decode(format!("year out of range for listing {id}: {e}")))?;

    Ok(StoredListing {
        id: ListingId(id),
        seller_id: SellerId(seller_id),
        record: ListingRecord {
            make,
            model,
            year,
            price,
            mileage,
            condition,
            features,
            description,
            image_url,
        },
        created_at: parse_timestamp(&created_at_str)?,
    })
}

#[async_trait::async_trait]
impl ListingRepository for SqlListingRepository {
    async fn find_by_id(&self, id: &ListingId) -> Result<Option<StoredListing>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, seller_id, make, model, year, price, mileage, condition,
                    features_json, description, image_url, created_at
             FROM listing WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_listing(r)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, listing: StoredListing) -> Result<(), RepositoryError> {
        let features_json = serde_json::to_string(&listing.record.features)
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;
        let record = &listing.record;

        sqlx::query(
            "INSERT INTO listing (id, seller_id, make, model, year, price, mileage, condition,
                                  features_json, description, image_url, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 make = excluded.make,
                 model = excluded.model,
                 year = excluded.year,
                 price = excluded.price,
                 mileage = excluded.mileage,
                 condition = excluded.condition,
                 features_json = excluded.features_json,
                 description = excluded.description,
                 image_url = excluded.image_url",
        )
        .bind(&listing.id.0)
        .bind(&listing.seller_id.0)
        .bind(&record.make)
        .bind(&record.model)
        .bind(record.year)
        .bind(record.price)
        .bind(record.mileage)
        .bind(&record.condition)
        .bind(&features_json)
        .bind(&record.description)
        .bind(&record.image_url)
        .bind(timestamp_text(listing.created_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_seller(
        &self,
        seller_id: &SellerId,
    ) -> Result<Vec<StoredListing>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT id, seller_id, make, model, year, price, mileage, condition,
                    features_json, description, image_url, created_at
             FROM listing
             WHERE seller_id = ?
             ORDER BY created_at DESC, rowid DESC",
        )
        .bind(&seller_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_listing).collect::<Result<Vec<_>, _>>()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use carmatch_core::domain::listing::{ListingId, ListingRecord, SellerId, StoredListing};

    use super::SqlListingRepository;
    use crate::repositories::ListingRepository;
    use crate::{connect_with_settings, migrations};

    async fn repository() -> SqlListingRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SqlListingRepository::new(pool)
    }

    fn listing(id: &str, seller: &str, minutes_ago: i64) -> StoredListing {
        StoredListing {
            id: ListingId(id.to_string()),
            seller_id: SellerId(seller.to_string()),
            record: ListingRecord {
                make: "Toyota".to_string(),
                model: "Corolla".to_string(),
                year: Some(2019),
                price: Some(82_000.0),
                mileage: None,
                condition: "Good".to_string(),
                features: vec!["Reverse camera".to_string()],
                description: "Single owner".to_string(),
                image_url: None,
            },
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn sql_listing_round_trip() {
        let repo = repository().await;
        let stored = listing("L-1", "seller-1", 0);

        repo.save(stored.clone()).await.expect("save listing");
        let found = repo.find_by_id(&stored.id).await.expect("find listing").expect("exists");

        assert_eq!(found.record, stored.record);
        assert_eq!(found.seller_id, stored.seller_id);
        assert_eq!(
            found.created_at.timestamp_micros(),
            stored.created_at.timestamp_micros(),
            "timestamps are stored at microsecond precision"
        );
    }

    #[tokio::test]
    async fn missing_listing_is_none() {
        let repo = repository().await;
        let found = repo.find_by_id(&ListingId("nope".to_string())).await.expect("query");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn seller_listings_are_newest_first_and_scoped() {
        let repo = repository().await;
        repo.save(listing("L-old", "seller-1", 30)).await.expect("save");
        repo.save(listing("L-new", "seller-1", 1)).await.expect("save");
        repo.save(listing("L-mid", "seller-1", 10)).await.expect("save");
        repo.save(listing("L-other", "seller-2", 0)).await.expect("save");

        let listings =
            repo.list_for_seller(&SellerId("seller-1".to_string())).await.expect("list");
        let ids: Vec<&str> = listings.iter().map(|listing| listing.id.0.as_str()).collect();

        assert_eq!(ids, vec!["L-new", "L-mid", "L-old"]);
    }

    #[tokio::test]
    async fn saving_again_updates_listing_fields() {
        let repo = repository().await;
        let mut stored = listing("L-1", "seller-1", 0);
        repo.save(stored.clone()).await.expect("save");

        stored.record.price = Some(79_500.0);
        repo.save(stored.clone()).await.expect("update");

        let found = repo.find_by_id(&stored.id).await.expect("find").expect("exists");
        assert_eq!(found.record.price, Some(79_500.0));
    }
}
