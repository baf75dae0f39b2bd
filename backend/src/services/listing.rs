//! Listing Service
//!
//! Search, creation and the owner-only status change for pet listings.
//! The store is injected so tests can swap in fakes.

use std::ops::RangeInclusive;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::{
    CreatePetRequest, NewPetListing, PetListing, PetQuery, PetStatus, PetType,
};
use crate::services::filter::{FilterError, ListingFilter, parse_calendar_date};
use crate::services::store::{PetStore, StoreError};

/// Accepted range for `age`, in years
pub const AGE_RANGE: RangeInclusive<i64> = 0..=50;

/// Accepted range for `fosterDuration`, in days
pub const FOSTER_DURATION_RANGE: RangeInclusive<i64> = 1..=365;

/// Errors that can occur during listing operations
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid search parameter: {0}")]
    InvalidFilter(#[from] FilterError),

    #[error("Pet not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {requester} does not own pet {pet_id}")]
    NotOwner { pet_id: String, requester: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Service for pet listing operations
#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn PetStore>,
}

impl ListingService {
    pub fn new(store: Arc<dyn PetStore>) -> Self {
        Self { store }
    }

    /// Public search over pending listings.
    ///
    /// Parameters are validated before the store is queried. An empty vector
    /// means nothing matched; a store failure is an error.
    pub async fn search(&self, query: &PetQuery) -> Result<Vec<PetListing>, ListingError> {
        let filter = ListingFilter::from_query(query)?;

        let candidates = self
            .store
            .list_by_status(PetStatus::Pending)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch pending listings"))?;

        let total = candidates.len();
        let listings = filter.apply(candidates);
        debug!(?filter, total, matched = listings.len(), "Listing search");

        Ok(listings)
    }

    /// Every listing owned by `owner_id`, regardless of status
    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<PetListing>, ListingError> {
        let listings = self
            .store
            .list_by_owner(owner_id)
            .await
            .inspect_err(|e| error!(owner_id, error = %e, "Failed to fetch owner listings"))?;

        Ok(listings)
    }

    /// Post a new listing for `owner_id`.
    ///
    /// The stored status is always `pending`; client-supplied status and
    /// owner fields never reach the store.
    pub async fn create(
        &self,
        owner_id: &str,
        request: CreatePetRequest,
    ) -> Result<PetListing, ListingError> {
        let listing = validate_new_listing(owner_id, request)?;

        let stored = self
            .store
            .insert(listing)
            .await
            .inspect_err(|e| error!(owner_id, error = %e, "Failed to save pet listing"))?;

        info!(pet_id = %stored.pet_id, owner_id, "Pet listing created");
        Ok(stored)
    }

    /// Change the status of a listing on behalf of `requester`.
    ///
    /// Checks run in a fixed order: status value, then existence, then
    /// ownership. Nothing is written unless all three pass.
    pub async fn update_status(
        &self,
        pet_id: &str,
        status: Option<&str>,
        requester: &str,
    ) -> Result<PetListing, ListingError> {
        let status = parse_status(status)?;

        let listing = self
            .store
            .get(pet_id)
            .await?
            .ok_or_else(|| ListingError::NotFound(pet_id.to_string()))?;

        if listing.owner_id != requester {
            warn!(pet_id, requester, "Status change rejected: not the owner");
            return Err(ListingError::NotOwner {
                pet_id: pet_id.to_string(),
                requester: requester.to_string(),
            });
        }

        // Last write wins; there is no version check between read and write.
        let updated = self
            .store
            .update_status(pet_id, status)
            .await?
            .ok_or_else(|| ListingError::NotFound(pet_id.to_string()))?;

        info!(pet_id, %status, "Pet status updated");
        Ok(updated)
    }
}

fn parse_status(raw: Option<&str>) -> Result<PetStatus, ListingError> {
    let raw = raw.ok_or_else(|| ListingError::Validation("status is required".to_string()))?;
    raw.parse::<PetStatus>().map_err(ListingError::Validation)
}

/// Turn a raw creation request into a storable listing
pub fn validate_new_listing(
    owner_id: &str,
    request: CreatePetRequest,
) -> Result<NewPetListing, ListingError> {
    let picture = required_text("pictureUrl", request.picture_url)?;

    let pet_type = required_text("type", request.pet_type)?
        .parse::<PetType>()
        .map_err(ListingError::Validation)?;

    let foster_start_date = {
        let raw = required_text("fosterStartDate", request.foster_start_date)?;
        parse_calendar_date(&raw).ok_or_else(|| {
            ListingError::Validation(format!(
                "fosterStartDate must be a date in YYYY-MM-DD format, got {raw}"
            ))
        })?
    };

    let age = coerce_whole_number("age", request.age.as_ref(), AGE_RANGE)?;
    let foster_duration = coerce_whole_number(
        "fosterDuration",
        request.foster_duration.as_ref(),
        FOSTER_DURATION_RANGE,
    )?;

    Ok(NewPetListing {
        owner_id: owner_id.to_string(),
        name: optional_text(request.name),
        pet_type,
        age,
        gender: optional_text(request.gender),
        primary_breed: optional_text(request.primary_breed),
        health_condition: optional_text(request.health_condition),
        foster_start_date,
        foster_duration,
        phone_number: optional_text(request.phone_number),
        pickup_location: optional_text(request.pickup_location),
        picture,
    })
}

fn required_text(field: &str, value: Option<String>) -> Result<String, ListingError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ListingError::Validation(format!("{field} is required")))
}

fn optional_text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Accept a JSON integer or a numeric string within `range`
fn coerce_whole_number(
    field: &str,
    value: Option<&Value>,
    range: RangeInclusive<i64>,
) -> Result<i32, ListingError> {
    let number = match value {
        None | Some(Value::Null) => {
            return Err(ListingError::Validation(format!("{field} is required")));
        }
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    }
    .ok_or_else(|| ListingError::Validation(format!("{field} must be a whole number")))?;

    if !range.contains(&number) {
        return Err(ListingError::Validation(format!(
            "{field} must be between {} and {}",
            range.start(),
            range.end()
        )));
    }

    i32::try_from(number)
        .map_err(|_| ListingError::Validation(format!("{field} is out of range")))
}
