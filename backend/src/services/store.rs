//! Pet Store
//!
//! Storage abstraction over the `pets` collection. Services only talk to
//! [`PetStore`]; the PostgreSQL adapter lives in `pg_store`, and
//! [`InMemoryPetStore`] backs tests and database-less local runs.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{NewPetListing, PetListing, PetStatus};

/// Errors raised by a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Pet listing store backend
///
/// Every call is a single round trip. Listing methods return records in
/// creation order.
#[async_trait]
pub trait PetStore: Send + Sync {
    /// All listings with the given status
    async fn list_by_status(&self, status: PetStatus) -> Result<Vec<PetListing>, StoreError>;

    /// All listings created by `owner_id`, any status
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<PetListing>, StoreError>;

    /// Fetch one listing by id
    async fn get(&self, pet_id: &str) -> Result<Option<PetListing>, StoreError>;

    /// Persist a new listing, assigning its id and creation time
    async fn insert(&self, listing: NewPetListing) -> Result<PetListing, StoreError>;

    /// Overwrite the status field only.
    ///
    /// Returns `None` when no listing has this id.
    async fn update_status(
        &self,
        pet_id: &str,
        status: PetStatus,
    ) -> Result<Option<PetListing>, StoreError>;
}

/// Process-local store.
///
/// Listing methods sort by `created_at`; equal timestamps keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPetStore {
    listings: Arc<RwLock<Vec<PetListing>>>,
}

impl InMemoryPetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records (useful for testing)
    pub fn with_listings(listings: Vec<PetListing>) -> Self {
        Self {
            listings: Arc::new(RwLock::new(listings)),
        }
    }

    /// Number of stored listings
    pub async fn len(&self) -> usize {
        self.listings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.listings.read().await.is_empty()
    }

    async fn collect_sorted<F>(&self, keep: F) -> Vec<PetListing>
    where
        F: Fn(&PetListing) -> bool,
    {
        let mut selected: Vec<PetListing> = self
            .listings
            .read()
            .await
            .iter()
            .filter(|l| keep(*l))
            .cloned()
            .collect();
        selected.sort_by_key(|l| l.created_at);
        selected
    }
}

#[async_trait]
impl PetStore for InMemoryPetStore {
    async fn list_by_status(&self, status: PetStatus) -> Result<Vec<PetListing>, StoreError> {
        Ok(self.collect_sorted(|l| l.status == status).await)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<PetListing>, StoreError> {
        Ok(self.collect_sorted(|l| l.owner_id == owner_id).await)
    }

    async fn get(&self, pet_id: &str) -> Result<Option<PetListing>, StoreError> {
        let listings = self.listings.read().await;
        Ok(listings.iter().find(|l| l.pet_id == pet_id).cloned())
    }

    async fn insert(&self, listing: NewPetListing) -> Result<PetListing, StoreError> {
        let stored = listing.into_listing(Uuid::new_v4().to_string(), Utc::now());
        self.listings.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn update_status(
        &self,
        pet_id: &str,
        status: PetStatus,
    ) -> Result<Option<PetListing>, StoreError> {
        let mut listings = self.listings.write().await;
        Ok(listings.iter_mut().find(|l| l.pet_id == pet_id).map(|l| {
            l.status = status;
            l.clone()
        }))
    }
}
