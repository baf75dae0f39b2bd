//! Pet listing model and related types
//!
//! A listing is a pet posted for short-term fostering. Listings are created
//! `pending` and flipped to `matched` by their owner.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Species accepted on the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pet_type")]
pub enum PetType {
    Dog,
    Cat,
}

impl fmt::Display for PetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dog => write!(f, "Dog"),
            Self::Cat => write!(f, "Cat"),
        }
    }
}

impl FromStr for PetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Dog" => Ok(Self::Dog),
            "Cat" => Ok(Self::Cat),
            _ => Err(format!("Invalid pet type: {s}. Valid values are: Dog, Cat")),
        }
    }
}

/// Match status of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pet_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    #[default]
    Pending,
    Matched,
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Matched => write!(f, "matched"),
        }
    }
}

impl FromStr for PetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "matched" => Ok(Self::Matched),
            _ => Err(format!(
                "Invalid status value: {s}. Valid values are: pending, matched"
            )),
        }
    }
}

/// Pet listing as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PetListing {
    pub pet_id: String,
    pub owner_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: PetType,
    pub status: PetStatus,
    pub age: i32,
    pub gender: String,
    pub primary_breed: String,
    pub health_condition: String,
    /// Serialized as `YYYY-MM-DD`
    pub foster_start_date: NaiveDate,
    /// Days
    pub foster_duration: i32,
    pub phone_number: String,
    pub pickup_location: String,
    pub picture: String,
    pub created_at: DateTime<Utc>,
}

/// Validated listing ready to be written by a store.
///
/// Carries no id, status or timestamp: the store assigns the first and last,
/// and every new listing starts `pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPetListing {
    pub owner_id: String,
    pub name: String,
    pub pet_type: PetType,
    pub age: i32,
    pub gender: String,
    pub primary_breed: String,
    pub health_condition: String,
    pub foster_start_date: NaiveDate,
    pub foster_duration: i32,
    pub phone_number: String,
    pub pickup_location: String,
    pub picture: String,
}

impl NewPetListing {
    /// Materialize the stored record with a store-assigned id and timestamp
    pub fn into_listing(self, pet_id: String, created_at: DateTime<Utc>) -> PetListing {
        PetListing {
            pet_id,
            owner_id: self.owner_id,
            name: self.name,
            pet_type: self.pet_type,
            status: PetStatus::Pending,
            age: self.age,
            gender: self.gender,
            primary_breed: self.primary_breed,
            health_condition: self.health_condition,
            foster_start_date: self.foster_start_date,
            foster_duration: self.foster_duration,
            phone_number: self.phone_number,
            pickup_location: self.pickup_location,
            picture: self.picture,
            created_at,
        }
    }
}

/// Request body for posting a new listing.
///
/// Numeric fields stay as raw JSON because form clients send them either as
/// numbers or as text. Fields such as `status` or `ownerId` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetRequest {
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub pet_type: Option<String>,
    #[serde(default)]
    pub age: Option<serde_json::Value>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub primary_breed: Option<String>,
    #[serde(default)]
    pub health_condition: Option<String>,
    #[serde(default)]
    pub foster_start_date: Option<String>,
    #[serde(default)]
    pub foster_duration: Option<serde_json::Value>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub pickup_location: Option<String>,
}

/// Request body for changing a listing's status
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

/// Query parameters for the public listing search
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetQuery {
    #[serde(default, rename = "type")]
    pub pet_type: Option<String>,
    #[serde(default)]
    pub foster_duration: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub foster_start_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_listing() -> PetListing {
        NewPetListing {
            owner_id: "owner-1".to_string(),
            name: "Biscuit".to_string(),
            pet_type: PetType::Dog,
            age: 3,
            gender: "Male".to_string(),
            primary_breed: "Beagle".to_string(),
            health_condition: "Healthy".to_string(),
            foster_start_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            foster_duration: 45,
            phone_number: "555-0100".to_string(),
            pickup_location: "Boston".to_string(),
            picture: "https://img.example/biscuit.jpg".to_string(),
        }
        .into_listing("pet-1".to_string(), Utc::now())
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("pending".parse::<PetStatus>(), Ok(PetStatus::Pending));
        assert_eq!("matched".parse::<PetStatus>(), Ok(PetStatus::Matched));
        assert!("Matched".parse::<PetStatus>().is_err());
        assert!("adopted".parse::<PetStatus>().is_err());
        assert!("".parse::<PetStatus>().is_err());
    }

    #[test]
    fn test_pet_type_parsing_is_exact() {
        assert_eq!("Dog".parse::<PetType>(), Ok(PetType::Dog));
        assert_eq!("Cat".parse::<PetType>(), Ok(PetType::Cat));
        assert!("dog".parse::<PetType>().is_err());
        assert!("Bird".parse::<PetType>().is_err());
    }

    #[test]
    fn test_new_listing_starts_pending() {
        let listing = sample_listing();
        assert_eq!(listing.status, PetStatus::Pending);
        assert_eq!(listing.pet_id, "pet-1");
    }

    #[test]
    fn test_listing_json_shape() {
        let json = serde_json::to_value(sample_listing()).unwrap();

        assert_eq!(json["petId"], "pet-1");
        assert_eq!(json["ownerId"], "owner-1");
        assert_eq!(json["type"], "Dog");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["fosterStartDate"], "2026-03-14");
        assert_eq!(json["fosterDuration"], 45);
        assert_eq!(json["pickupLocation"], "Boston");
        assert_eq!(json["primaryBreed"], "Beagle");
        assert!(json.get("pet_type").is_none());
    }

    #[test]
    fn test_create_request_ignores_client_status_and_owner() {
        let request: CreatePetRequest = serde_json::from_value(serde_json::json!({
            "pictureUrl": "https://img.example/a.jpg",
            "type": "Cat",
            "age": "4",
            "fosterDuration": 30,
            "status": "matched",
            "ownerId": "someone-else",
        }))
        .unwrap();

        assert_eq!(request.pet_type.as_deref(), Some("Cat"));
        assert_eq!(request.age, Some(serde_json::json!("4")));
        assert_eq!(request.foster_duration, Some(serde_json::json!(30)));
    }

    #[test]
    fn test_query_uses_camel_case_names() {
        let query: PetQuery = serde_json::from_value(serde_json::json!({
            "type": "Dog",
            "fosterDuration": "30",
            "fosterStartDate": "2026-04-01",
        }))
        .unwrap();

        assert_eq!(query.pet_type.as_deref(), Some("Dog"));
        assert_eq!(query.foster_duration.as_deref(), Some("30"));
        assert_eq!(query.foster_start_date.as_deref(), Some("2026-04-01"));
        assert!(query.location.is_none());
    }
}
