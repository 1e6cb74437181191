use sqlx::Row;

use carmatch_core::domain::user::{UserId, UserProfile, UserRole};

use super::listing::{parse_timestamp, timestamp_text};
use super::{RepositoryError, UserProfileRepository};
use crate::DbPool;

pub struct SqlUserProfileRepository {
    pool: DbPool,
}

impl SqlUserProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> Result<UserProfile, RepositoryError> {
    let user_id: String =
        row.try_get("user_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let email: String =
        row.try_get("email").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let role_str: String =
        row.try_get("role").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let role = role_str.parse::<UserRole>().map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(UserProfile {
        user_id: UserId(user_id),
        name,
        email,
        role,
        created_at: parse_timestamp(&created_at_str)?,
    })
}

#[async_trait::async_trait]
impl UserProfileRepository for SqlUserProfileRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let row = sqlx::query(
            "SELECT user_id, name, email, role, created_at FROM user_profile WHERE user_id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_profile(r)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, profile: UserProfile) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO user_profile (user_id, name, email, role, created_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                 name = excluded.name,
                 email = excluded.email,
                 role = excluded.role",
        )
        .bind(&profile.user_id.0)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(profile.role.as_str())
        .bind(timestamp_text(profile.created_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use carmatch_core::domain::user::{UserId, UserProfile, UserRole};

    use super::SqlUserProfileRepository;
    use crate::repositories::UserProfileRepository;
    use crate::{connect_with_settings, migrations};

    async fn repository() -> SqlUserProfileRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SqlUserProfileRepository::new(pool)
    }

    fn profile(role: UserRole) -> UserProfile {
        UserProfile {
            user_id: UserId("uid-1".to_string()),
            name: "נועה".to_string(),
            email: "noa@example.com".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn sql_profile_round_trip() {
        let repo = repository().await;
        repo.save(profile(UserRole::Seller)).await.expect("save profile");

        let found = repo
            .find_by_id(&UserId("uid-1".to_string()))
            .await
            .expect("find profile")
            .expect("profile exists");

        assert_eq!(found.name, "נועה");
        assert_eq!(found.role, UserRole::Seller);
    }

    #[tokio::test]
    async fn re_registering_switches_role() {
        let repo = repository().await;
        repo.save(profile(UserRole::Buyer)).await.expect("save");
        repo.save(profile(UserRole::Seller)).await.expect("update");

        let found =
            repo.find_by_id(&UserId("uid-1".to_string())).await.expect("find").expect("exists");
        assert_eq!(found.role, UserRole::Seller);
    }
}
