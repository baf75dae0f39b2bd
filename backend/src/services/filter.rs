//! Listing Filter
//!
//! Composable predicates applied to a fetched snapshot of pending listings.
//! Every predicate is optional and they combine with AND; the order of the
//! input is preserved.

use chrono::{DateTime, Months, NaiveDate};
use thiserror::Error;

use crate::models::{PetListing, PetQuery, PetType};

/// Errors raised while parsing search parameters
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("{0}")]
    InvalidType(String),

    #[error("Invalid fosterDuration: {0}. Expected a whole number of days")]
    InvalidDuration(String),

    #[error("Invalid fosterStartDate: {0}. Expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Typed search filter built from query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub pet_type: Option<PetType>,
    /// Inclusive ceiling on `fosterDuration`
    pub max_duration: Option<i32>,
    /// Case-insensitive substring of `pickupLocation`
    pub location: Option<String>,
    /// Centre of the +/- one month start date window
    pub start_date: Option<NaiveDate>,
}

impl ListingFilter {
    /// Parse raw query parameters. Blank parameters count as absent.
    pub fn from_query(query: &PetQuery) -> Result<Self, FilterError> {
        let pet_type = non_blank(query.pet_type.as_deref())
            .map(|t| t.parse::<PetType>().map_err(FilterError::InvalidType))
            .transpose()?;

        let max_duration = non_blank(query.foster_duration.as_deref())
            .map(|d| {
                d.parse::<i32>()
                    .map_err(|_| FilterError::InvalidDuration(d.to_string()))
            })
            .transpose()?;

        let location = non_blank(query.location.as_deref()).map(str::to_string);

        let start_date = non_blank(query.foster_start_date.as_deref())
            .map(|d| parse_calendar_date(d).ok_or_else(|| FilterError::InvalidDate(d.to_string())))
            .transpose()?;

        Ok(Self {
            pet_type,
            max_duration,
            location,
            start_date,
        })
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether a single listing passes every configured predicate
    pub fn matches(&self, listing: &PetListing) -> bool {
        self.matches_type(listing)
            && self.matches_duration(listing)
            && self.matches_location(listing)
            && self.matches_start_date(listing)
    }

    /// Narrow a snapshot, keeping its order
    pub fn apply(&self, listings: Vec<PetListing>) -> Vec<PetListing> {
        listings.into_iter().filter(|l| self.matches(l)).collect()
    }

    fn matches_type(&self, listing: &PetListing) -> bool {
        self.pet_type.is_none_or(|t| listing.pet_type == t)
    }

    fn matches_duration(&self, listing: &PetListing) -> bool {
        self.max_duration
            .is_none_or(|max| listing.foster_duration <= max)
    }

    fn matches_location(&self, listing: &PetListing) -> bool {
        self.location.as_deref().is_none_or(|needle| {
            listing
                .pickup_location
                .to_lowercase()
                .contains(&needle.to_lowercase())
        })
    }

    fn matches_start_date(&self, listing: &PetListing) -> bool {
        self.start_date.is_none_or(|target| {
            let (from, to) = month_window(target);
            listing.foster_start_date >= from && listing.foster_start_date <= to
        })
    }
}

/// Inclusive window of one calendar month either side of `target`.
///
/// Month arithmetic clamps to the last valid day, so Jan 31 + 1 month is
/// Feb 28 (or 29). Out-of-range results saturate to the calendar bounds.
pub fn month_window(target: NaiveDate) -> (NaiveDate, NaiveDate) {
    let one_month = Months::new(1);
    let from = target.checked_sub_months(one_month).unwrap_or(NaiveDate::MIN);
    let to = target.checked_add_months(one_month).unwrap_or(NaiveDate::MAX);
    (from, to)
}

/// Parse `YYYY-MM-DD`, or take the date part of an RFC 3339 timestamp
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
