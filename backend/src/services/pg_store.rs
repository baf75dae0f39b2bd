//! PostgreSQL Pet Store
//!
//! [`PetStore`] over the `pets` table. Schema lives in `migrations/`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::{NewPetListing, PetListing, PetStatus};
use crate::services::store::{PetStore, StoreError};

const LISTING_COLUMNS: &str = r#"
    pet_id, owner_id, name, pet_type, status, age, gender, primary_breed,
    health_condition, foster_start_date, foster_duration, phone_number,
    pickup_location, picture, created_at
"#;

#[derive(Debug, Clone)]
pub struct PgPetStore {
    pool: PgPool,
}

impl PgPetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PetStore for PgPetStore {
    async fn list_by_status(&self, status: PetStatus) -> Result<Vec<PetListing>, StoreError> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM pets WHERE status = $1 ORDER BY created_at, pet_id"
        );
        let listings = sqlx::query_as::<_, PetListing>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        debug!(%status, count = listings.len(), "Fetched listings by status");
        Ok(listings)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<PetListing>, StoreError> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM pets WHERE owner_id = $1 ORDER BY created_at, pet_id"
        );
        let listings = sqlx::query_as::<_, PetListing>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(owner_id, count = listings.len(), "Fetched listings by owner");
        Ok(listings)
    }

    async fn get(&self, pet_id: &str) -> Result<Option<PetListing>, StoreError> {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM pets WHERE pet_id = $1");
        let listing = sqlx::query_as::<_, PetListing>(&sql)
            .bind(pet_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(listing)
    }

    async fn insert(&self, listing: NewPetListing) -> Result<PetListing, StoreError> {
        let pet_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let sql = format!(
            r#"
            INSERT INTO pets (
                pet_id, owner_id, name, pet_type, status, age, gender, primary_breed,
                health_condition, foster_start_date, foster_duration, phone_number,
                pickup_location, picture, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {LISTING_COLUMNS}
            "#
        );

        let stored = sqlx::query_as::<_, PetListing>(&sql)
            .bind(&pet_id)
            .bind(&listing.owner_id)
            .bind(&listing.name)
            .bind(listing.pet_type)
            .bind(PetStatus::Pending)
            .bind(listing.age)
            .bind(&listing.gender)
            .bind(&listing.primary_breed)
            .bind(&listing.health_condition)
            .bind(listing.foster_start_date)
            .bind(listing.foster_duration)
            .bind(&listing.phone_number)
            .bind(&listing.pickup_location)
            .bind(&listing.picture)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(stored)
    }

    async fn update_status(
        &self,
        pet_id: &str,
        status: PetStatus,
    ) -> Result<Option<PetListing>, StoreError> {
        let sql = format!("UPDATE pets SET status = $2 WHERE pet_id = $1 RETURNING {LISTING_COLUMNS}");
        let listing = sqlx::query_as::<_, PetListing>(&sql)
            .bind(pet_id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;

        Ok(listing)
    }
}

// ============================================================================
// Integration Tests (require a PostgreSQL database)
// ============================================================================

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::models::PetType;
    use chrono::NaiveDate;

    /// Helper to create a migrated test pool - returns None if connection fails
    async fn try_create_test_pool() -> Option<PgPool> {
        let _ = dotenvy::from_filename("backend/.env");
        let _ = dotenvy::dotenv();

        let database_url = std::env::var("DATABASE_URL").ok()?;

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .ok()?;

        sqlx::migrate!("./migrations").run(&pool).await.ok()?;
        Some(pool)
    }

    async fn cleanup_owner(pool: &PgPool, owner_id: &str) {
        let _ = sqlx::query("DELETE FROM pets WHERE owner_id = $1")
            .bind(owner_id)
            .execute(pool)
            .await;
    }

    fn new_listing(owner_id: &str) -> NewPetListing {
        NewPetListing {
            owner_id: owner_id.to_string(),
            name: "Pepper".to_string(),
            pet_type: PetType::Dog,
            age: 5,
            gender: "Female".to_string(),
            primary_breed: "Collie".to_string(),
            health_condition: "Healthy".to_string(),
            foster_start_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            foster_duration: 21,
            phone_number: "555-0102".to_string(),
            pickup_location: "Somerville".to_string(),
            picture: "https://img.example/pepper.jpg".to_string(),
        }
    }

    #[tokio::test]
    #[ignore = "Requires database connection - run with: cargo test -- --ignored"]
    async fn integration_insert_and_status_round_trip() {
        let pool = match try_create_test_pool().await {
            Some(p) => p,
            None => {
                eprintln!("Skipping test: database not available");
                return;
            }
        };
        let store = PgPetStore::new(pool.clone());
        let owner_id = format!("owner-{}", Uuid::new_v4());

        let stored = store.insert(new_listing(&owner_id)).await.expect("insert failed");
        assert_eq!(stored.status, PetStatus::Pending);
        assert_eq!(stored.owner_id, owner_id);

        let fetched = store.get(&stored.pet_id).await.expect("get failed");
        assert_eq!(fetched.as_ref().map(|l| &l.pet_id), Some(&stored.pet_id));

        let updated = store
            .update_status(&stored.pet_id, PetStatus::Matched)
            .await
            .expect("update failed")
            .expect("listing should exist");
        assert_eq!(updated.status, PetStatus::Matched);
        assert_eq!(updated.pickup_location, stored.pickup_location);

        let mine = store.list_by_owner(&owner_id).await.expect("list failed");
        assert_eq!(mine.len(), 1);

        cleanup_owner(&pool, &owner_id).await;
    }

    #[tokio::test]
    #[ignore = "Requires database connection - run with: cargo test -- --ignored"]
    async fn integration_update_missing_listing_returns_none() {
        let pool = match try_create_test_pool().await {
            Some(p) => p,
            None => {
                eprintln!("Skipping test: database not available");
                return;
            }
        };
        let store = PgPetStore::new(pool);

        let result = store
            .update_status(&Uuid::new_v4().to_string(), PetStatus::Matched)
            .await
            .expect("update failed");
        assert!(result.is_none());
    }
}
